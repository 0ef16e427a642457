//! Helpers for vectors in shading coordinates, where the normal is +z,
//! and the dielectric optics built on them.

use glam::Vec3;

#[inline]
pub fn cos_theta(w: Vec3) -> f32 {
    w.z
}

#[inline]
pub fn abs_cos_theta(w: Vec3) -> f32 {
    w.z.abs()
}

#[inline]
pub fn sin2_theta(w: Vec3) -> f32 {
    (1.0 - w.z * w.z).max(0.0)
}

#[inline]
pub fn sin_theta(w: Vec3) -> f32 {
    sin2_theta(w).sqrt()
}

#[inline]
pub fn same_hemisphere(a: Vec3, b: Vec3) -> bool {
    a.z * b.z > 0.0
}

/// Mirror `wo` about the normal.
#[inline]
pub fn reflect(wo: Vec3) -> Vec3 {
    Vec3::new(-wo.x, -wo.y, wo.z)
}

/// Relative index of refraction seen by light crossing from the side
/// `cos_i` points into.
///
/// `eta_a` is the medium outside the surface, `eta_b` the one inside.
#[inline]
pub fn boundary_eta(eta_a: f32, eta_b: f32, cos_i: f32) -> f32 {
    if cos_i >= 0.0 {
        eta_a / eta_b
    } else {
        eta_b / eta_a
    }
}

/// Transmitted direction for `wi` through the surface with relative index
/// `eta` (incident over transmitted). `None` on total internal reflection.
pub fn refract(wi: Vec3, eta: f32) -> Option<Vec3> {
    let cos_i = cos_theta(wi);
    let cos2_t = 1.0 - eta * eta * sin2_theta(wi);
    if cos2_t < 0.0 {
        return None;
    }
    let cos_t = cos2_t.sqrt();
    let sign = if cos_i >= 0.0 { 1.0 } else { -1.0 };
    Some(Vec3::new(
        -eta * wi.x,
        -eta * wi.y,
        -eta * wi.z + (eta * cos_i.abs() - cos_t) * sign,
    ))
}

/// Unpolarised Fresnel reflectance of a dielectric interface.
///
/// `eta` is the relative index (incident over transmitted). Returns 1 on
/// total internal reflection.
pub fn fresnel_dielectric(cos_i: f32, eta: f32) -> f32 {
    let cos_i = cos_i.abs().clamp(0.0, 1.0);
    let sin2_t = eta * eta * (1.0 - cos_i * cos_i);
    if sin2_t >= 1.0 {
        return 1.0;
    }
    let cos_t = (1.0 - sin2_t).max(0.0).sqrt();

    let r_parallel = (cos_i - eta * cos_t) / (cos_i + eta * cos_t);
    let r_perpendicular = (eta * cos_i - cos_t) / (eta * cos_i + cos_t);
    0.5 * (r_parallel * r_parallel + r_perpendicular * r_perpendicular)
}
