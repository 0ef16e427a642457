/// Solve `a·t² + b·t + c = 0`, returning both real roots in ascending order.
///
/// Uses the cancellation-free form `q = -½(b + sign(b)·√Δ)`,
/// `t₁ = q/a`, `t₂ = c/q`. The discriminant is evaluated in double
/// precision. A vanishing `a` degrades to the linear root, reported twice.
pub fn solve_quadratic(a: f32, b: f32, c: f32) -> Option<(f32, f32)> {
    let (a, b, c) = (a as f64, b as f64, c as f64);

    if a == 0.0 {
        if b == 0.0 {
            return None;
        }
        let t = (-c / b) as f32;
        return Some((t, t));
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }
    let root = discriminant.sqrt();
    let q = if b < 0.0 { -0.5 * (b - root) } else { -0.5 * (b + root) };
    if q == 0.0 {
        // b == 0 and c == 0: double root at the origin
        return Some((0.0, 0.0));
    }

    let t0 = (q / a) as f32;
    let t1 = (c / q) as f32;
    if t0 <= t1 {
        Some((t0, t1))
    } else {
        Some((t1, t0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_simple_roots() {
        // (t - 1)(t - 3) = t² - 4t + 3
        let (t0, t1) = solve_quadratic(1.0, -4.0, 3.0).unwrap();
        assert!((t0 - 1.0).abs() < 1e-6);
        assert!((t1 - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_no_real_roots() {
        assert!(solve_quadratic(1.0, 0.0, 1.0).is_none());
    }

    #[test]
    fn test_degenerate_leading_coefficient() {
        let (t0, t1) = solve_quadratic(0.0, 2.0, -4.0).unwrap();
        assert_eq!((t0, t1), (2.0, 2.0));
        assert!(solve_quadratic(0.0, 0.0, 1.0).is_none());
    }

    #[test]
    fn test_cancellation_prone_roots() {
        // Roots 1e-4 and 1e4: the naive formula loses the small one in f32
        let (t0, t1) = solve_quadratic(1.0, -(1.0e4 + 1.0e-4), 1.0).unwrap();
        assert!((t0 - 1.0e-4).abs() / 1.0e-4 < 1e-4);
        assert!((t1 - 1.0e4).abs() / 1.0e4 < 1e-5);
    }

    #[test]
    fn test_roots_are_ordered_and_satisfy_equation() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut solved = 0;
        for _ in 0..10_000 {
            let a: f32 = rng.gen_range(0.1..10.0) * if rng.gen::<bool>() { 1.0 } else { -1.0 };
            let b: f32 = rng.gen_range(-10.0..10.0);
            let c: f32 = rng.gen_range(-10.0..10.0);
            if let Some((t0, t1)) = solve_quadratic(a, b, c) {
                solved += 1;
                assert!(t0 <= t1);
                for t in [t0, t1] {
                    let residual = a * t * t + b * t + c;
                    let scale = (a * t * t).abs() + (b * t).abs() + c.abs();
                    assert!(
                        residual.abs() <= 1e-4 * scale.max(1.0),
                        "a={a} b={b} c={c} t={t} residual={residual}"
                    );
                }
            }
        }
        assert!(solved > 1000);
    }
}
