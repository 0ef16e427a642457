use crate::{Direction, Interval, Vertex, EPSILON_T};

/// A ray in 3D space with origin, unit direction and an upper parameter bound.
///
/// A parameter `t` is valid for the ray iff `EPSILON_T <= t <= t_max`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vertex,
    pub direction: Direction,
    pub t_max: f32,
}

impl Ray {
    /// Create an unbounded ray.
    pub fn new(origin: Vertex, direction: Direction) -> Self {
        Self {
            origin,
            direction,
            t_max: f32::INFINITY,
        }
    }

    /// Create a ray that ends at parameter `t_max`.
    pub fn with_t_max(origin: Vertex, direction: Direction, t_max: f32) -> Self {
        Self {
            origin,
            direction,
            t_max,
        }
    }

    /// Create a ray from `from` towards `to` that stops just short of `to`.
    ///
    /// Used for shadow rays so the surface at `to` never occludes itself.
    pub fn between(from: Vertex, to: Vertex) -> Self {
        let offset = to - from;
        let distance = offset.length();
        Self {
            origin: from,
            direction: Direction::new(offset),
            t_max: distance * (1.0 - 1.0e-3),
        }
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vertex {
        self.origin + *self.direction * t
    }

    /// The interval of accepted hit parameters.
    #[inline]
    pub fn range(&self) -> Interval {
        Interval::new(EPSILON_T, self.t_max)
    }

    /// Whether `t` is an accepted hit parameter for this ray.
    #[inline]
    pub fn accepts(&self, t: f32) -> bool {
        self.range().contains(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vertex::ORIGIN, Direction::X);

        assert_eq!(ray.at(0.0), Vertex::ORIGIN);
        assert_eq!(ray.at(1.0), Vertex::new(1.0, 0.0, 0.0));
        assert_eq!(ray.at(2.0), Vertex::new(2.0, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Vertex::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_ray_copy() {
        let ray1 = Ray::new(Vertex::ORIGIN, Direction::Y);
        let ray2 = ray1; // Copy, not move

        assert_eq!(ray1.origin, ray2.origin);
        assert_eq!(ray1.at(1.0), ray2.at(1.0));
    }

    #[test]
    fn test_ray_accepts() {
        let ray = Ray::with_t_max(Vertex::ORIGIN, Direction::Z, 2.0);
        assert!(!ray.accepts(0.0));
        assert!(!ray.accepts(EPSILON_T * 0.5));
        assert!(ray.accepts(EPSILON_T));
        assert!(ray.accepts(2.0));
        assert!(!ray.accepts(2.5));
    }

    #[test]
    fn test_ray_between_stops_short() {
        let from = Vertex::new(1.0, 1.0, 1.0);
        let to = Vertex::new(1.0, 1.0, 4.0);
        let ray = Ray::between(from, to);

        assert!((ray.direction.length() - 1.0).abs() < 4.0 * f32::EPSILON);
        assert_eq!(ray.direction.vec(), Vec3::Z);
        assert!(ray.t_max < 3.0);
        assert!(ray.t_max > 2.99);
    }
}
