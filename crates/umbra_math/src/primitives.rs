//! Ray intersection with canonical shapes in shape space.
//!
//! Every function returns the nearest parameter the ray accepts
//! (`EPSILON_T <= t <= t_max`), or `None` when there is no such hit.

use crate::{solve_quadratic, Ray};

/// Plane `z = height`.
pub fn intersect_plane(ray: &Ray, height: f32) -> Option<f32> {
    let dz = ray.direction.z;
    if dz == 0.0 {
        return None;
    }
    let t = (height - ray.origin.z) / dz;
    ray.accepts(t).then_some(t)
}

/// Sphere of `radius` centred at the origin.
pub fn intersect_sphere(ray: &Ray, radius: f32) -> Option<f32> {
    let o = ray.origin.0;
    let d = ray.direction.vec();
    let a = d.dot(d);
    let b = 2.0 * d.dot(o);
    let c = o.dot(o) - radius * radius;

    let (t0, t1) = solve_quadratic(a, b, c)?;
    [t0, t1].into_iter().find(|&t| ray.accepts(t))
}

/// Open cylinder of `radius` about +z, limited to `z_min <= z <= z_max`.
///
/// Only the lateral surface is tested; end caps belong to the caller.
pub fn intersect_cylinder(ray: &Ray, radius: f32, z_min: f32, z_max: f32) -> Option<f32> {
    let (ox, oy) = (ray.origin.x, ray.origin.y);
    let (dx, dy) = (ray.direction.x, ray.direction.y);
    let a = dx * dx + dy * dy;
    let b = 2.0 * (dx * ox + dy * oy);
    let c = ox * ox + oy * oy - radius * radius;

    let (t0, t1) = solve_quadratic(a, b, c)?;
    [t0, t1].into_iter().find(|&t| {
        if !ray.accepts(t) {
            return false;
        }
        let z = ray.at(t).z;
        z_min <= z && z <= z_max
    })
}

/// Disc of `radius` in the `z = 0` plane, centred at the origin.
pub fn intersect_disc(ray: &Ray, radius: f32) -> Option<f32> {
    let t = intersect_plane(ray, 0.0)?;
    let p = ray.at(t);
    (p.x * p.x + p.y * p.y <= radius * radius).then_some(t)
}

/// Rectangle `[-half_width, half_width] × [-half_height, half_height]` in `z = 0`.
pub fn intersect_rectangle(ray: &Ray, half_width: f32, half_height: f32) -> Option<f32> {
    let t = intersect_plane(ray, 0.0)?;
    let p = ray.at(t);
    (p.x.abs() <= half_width && p.y.abs() <= half_height).then_some(t)
}
