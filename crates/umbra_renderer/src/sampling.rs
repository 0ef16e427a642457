//! Warping functions from the unit square to sampling domains.
//!
//! Every warp has a matching density so estimators can divide by it.

use std::f32::consts::{FRAC_1_PI, FRAC_PI_2, FRAC_PI_4, PI};

use glam::{Vec2, Vec3};

/// Largest `f32` below one; remapped sample values are clamped to it.
pub const ONE_MINUS_EPSILON: f32 = 1.0 - f32::EPSILON / 2.0;

/// Shirley's concentric map from the square to the unit disc.
pub fn concentric_sample_disc(u: Vec2) -> Vec2 {
    let offset = 2.0 * u - Vec2::ONE;
    if offset.x == 0.0 && offset.y == 0.0 {
        return Vec2::ZERO;
    }

    let (r, theta) = if offset.x.abs() > offset.y.abs() {
        (offset.x, FRAC_PI_4 * (offset.y / offset.x))
    } else {
        (offset.y, FRAC_PI_2 - FRAC_PI_4 * (offset.x / offset.y))
    };
    r * Vec2::new(theta.cos(), theta.sin())
}

/// Polar map to the unit disc.
pub fn uniform_sample_disc(u: Vec2) -> Vec2 {
    let r = u.x.sqrt();
    let theta = 2.0 * PI * u.y;
    r * Vec2::new(theta.cos(), theta.sin())
}

/// Density of both disc maps with respect to area.
#[inline]
pub fn uniform_disc_pdf() -> f32 {
    FRAC_1_PI
}

/// Cosine-weighted direction about +z (Malley's method).
pub fn cosine_sample_hemisphere(u: Vec2) -> Vec3 {
    let d = concentric_sample_disc(u);
    let z = (1.0 - d.x * d.x - d.y * d.y).max(0.0).sqrt();
    Vec3::new(d.x, d.y, z)
}

#[inline]
pub fn cosine_hemisphere_pdf(cos_theta: f32) -> f32 {
    cos_theta.max(0.0) * FRAC_1_PI
}

pub fn uniform_sample_hemisphere(u: Vec2) -> Vec3 {
    let z = u.x;
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = 2.0 * PI * u.y;
    Vec3::new(r * phi.cos(), r * phi.sin(), z)
}

#[inline]
pub fn uniform_hemisphere_pdf() -> f32 {
    0.5 * FRAC_1_PI
}

pub fn uniform_sample_sphere(u: Vec2) -> Vec3 {
    let z = 1.0 - 2.0 * u.x;
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = 2.0 * PI * u.y;
    Vec3::new(r * phi.cos(), r * phi.sin(), z)
}

#[inline]
pub fn uniform_sphere_pdf() -> f32 {
    0.25 * FRAC_1_PI
}

/// Uniform direction inside the cone about +z whose half-angle has cosine
/// `cos_theta_max`.
pub fn uniform_sample_cone(u: Vec2, cos_theta_max: f32) -> Vec3 {
    let cos_theta = (1.0 - u.x) + u.x * cos_theta_max;
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let phi = 2.0 * PI * u.y;
    Vec3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta)
}

#[inline]
pub fn uniform_cone_pdf(cos_theta_max: f32) -> f32 {
    1.0 / (2.0 * PI * (1.0 - cos_theta_max))
}

/// Map a uniform scalar to an index in `0..n`.
#[inline]
pub fn choose(u: f32, n: usize) -> usize {
    ((u * n as f32) as usize).min(n.saturating_sub(1))
}

/// Multiple importance sampling weight with exponent two.
///
/// Evaluated as a ratio so that tiny or huge densities neither underflow
/// nor overflow.
pub fn power_heuristic(nf: u32, f_pdf: f32, ng: u32, g_pdf: f32) -> f32 {
    let f = nf as f32 * f_pdf;
    let g = ng as f32 * g_pdf;
    if f <= 0.0 {
        return 0.0;
    }
    if f >= g {
        let r = g / f;
        1.0 / (1.0 + r * r)
    } else {
        let r = f / g;
        let r2 = r * r;
        r2 / (1.0 + r2)
    }
}
