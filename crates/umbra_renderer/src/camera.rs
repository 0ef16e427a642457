//! Cameras turn pixel coordinates into rays in camera space.
//!
//! Camera space is right-handed with the camera looking down -z, +x to the
//! right and +y up. Pixel row 0 is the top of the image. The render context
//! lifts rays into world space with the view transform.

use glam::{Mat4, Vec2, Vec3, Vec4};
use umbra_core::{CameraKind, RenderOptions};
use umbra_math::{Direction, Ray, Vertex};

use crate::sampler::Sampler;
use crate::sampling::concentric_sample_disc;

/// Trait for pixel-to-ray mappings.
pub trait Camera: Send + Sync {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Ray through pixel `(x, y)` in camera space.
    fn ray(&self, x: u32, y: u32, sampler: &mut dyn Sampler) -> Ray;
}

/// Sub-pixel offset: random when the sampler is, the pixel centre otherwise.
fn pixel_offset(sampler: &mut dyn Sampler) -> Vec2 {
    if sampler.is_random() {
        sampler.sample_2d()
    } else {
        Vec2::splat(0.5)
    }
}

/// Off-axis frustum camera with an optional thin lens.
#[derive(Debug, Clone)]
pub struct FrustumCamera {
    width: u32,
    height: u32,
    /// Pixel `(x, y, -n, 1)` to its point on the near plane
    window: Mat4,
    /// Lens radius, zero for a pinhole
    lens_radius: f32,
    /// Camera-space depth of the plane in focus (negative)
    z_focus: f32,
}

impl FrustumCamera {
    pub fn new(options: &RenderOptions) -> Self {
        let s = options.world_to_screen;
        let half_width = 0.5 * options.width as f32 * s;
        let half_height = 0.5 * options.height as f32 * s;
        let near = half_width / (0.5 * options.fov).tan();

        // Column-major: x scales by s, y flips so row 0 is the top, and the
        // translation moves the origin to the top-left corner on the near plane
        let window = Mat4::from_cols(
            Vec4::new(s, 0.0, 0.0, 0.0),
            Vec4::new(0.0, -s, 0.0, 0.0),
            Vec4::ZERO,
            Vec4::new(-half_width, half_height, -near, 1.0),
        );

        Self {
            width: options.width,
            height: options.height,
            window,
            lens_radius: 0.5 * options.aperture,
            z_focus: -options.focus,
        }
    }

    /// Camera-space depth of the near plane.
    pub fn z_near(&self) -> f32 {
        self.window.w_axis.z
    }

    fn near_point(&self, x: f32, y: f32) -> Vec3 {
        self.window
            .transform_point3(Vec3::new(x, y, self.z_near()))
    }
}

impl Camera for FrustumCamera {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn ray(&self, x: u32, y: u32, sampler: &mut dyn Sampler) -> Ray {
        let delta = pixel_offset(sampler);
        let ps = self.near_point(x as f32 + delta.x, y as f32 + delta.y);

        if self.lens_radius <= 0.0 {
            return Ray::new(Vertex(ps), Direction::new(ps));
        }

        let z_near = self.z_near();
        let scale = self.z_focus / z_near;
        let focus = Vec3::new(ps.x * scale, ps.y * scale, self.z_focus);
        let lens = (self.lens_radius * concentric_sample_disc(sampler.sample_2d())).extend(0.0);
        let dir = Direction::new(focus - lens);
        let origin = lens + *dir * (z_near / dir.z);
        Ray::new(Vertex(origin), dir)
    }
}

/// Centred pinhole camera with a horizontal field of view.
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    width: u32,
    height: u32,
    /// Half-extent of the image plane at unit distance, horizontally
    tan_half_fov: f32,
}

impl PerspectiveCamera {
    pub fn new(options: &RenderOptions) -> Self {
        Self {
            width: options.width,
            height: options.height,
            tan_half_fov: (0.5 * options.fov).tan(),
        }
    }
}

impl Camera for PerspectiveCamera {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn ray(&self, x: u32, y: u32, sampler: &mut dyn Sampler) -> Ray {
        let delta = pixel_offset(sampler);
        let w = self.width as f32;
        let h = self.height as f32;
        let px = (2.0 * (x as f32 + delta.x) / w - 1.0) * self.tan_half_fov;
        let py = (1.0 - 2.0 * (y as f32 + delta.y) / h) * self.tan_half_fov * h / w;
        Ray::new(Vertex::ORIGIN, Direction::new(Vec3::new(px, py, -1.0)))
    }
}

/// Build the camera `options` select.
pub fn make_camera(options: &RenderOptions) -> Box<dyn Camera> {
    match options.camera {
        CameraKind::Frustum => Box::new(FrustumCamera::new(options)),
        CameraKind::Perspective => Box::new(PerspectiveCamera::new(options)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::{DeterministicSampler, RandomSampler};

    fn options(width: u32, height: u32) -> RenderOptions {
        RenderOptions {
            width,
            height,
            fov: 60.0_f32.to_radians(),
            ..RenderOptions::default()
        }
    }

    #[test]
    fn test_frustum_centre_ray_looks_down_z() {
        let camera = FrustumCamera::new(&options(2, 2));
        let mut sampler = DeterministicSampler;
        // Pixel (1, 1) starts at the image centre; its centre is offset by half a pixel
        let ray = camera.ray(1, 1, &mut sampler);
        assert!(ray.direction.z < -0.9);
        assert!(ray.direction.x > 0.0 && ray.direction.y < 0.0);
        assert!((ray.origin.z - camera.z_near()).abs() < 1e-6);
    }

    #[test]
    fn test_frustum_field_of_view() {
        let opts = options(100, 50);
        let camera = FrustumCamera::new(&opts);
        let near = -camera.z_near();
        let edge = camera.near_point(100.0, 25.0);
        assert!((edge.x / near - (0.5 * opts.fov).tan()).abs() < 1e-5);
        assert!(edge.y.abs() < 1e-6);

        let top_left = camera.near_point(0.0, 0.0);
        assert!(top_left.x < 0.0 && top_left.y > 0.0);
    }

    #[test]
    fn test_lens_rays_converge_on_focus_plane() {
        let mut opts = options(32, 32);
        opts.aperture = 0.2;
        opts.focus = 3.0;
        let camera = FrustumCamera::new(&opts);
        let mut sampler = RandomSampler::new(4, 9);

        let mut first = None;
        for _ in 0..8 {
            let ray = camera.ray(10, 20, &mut sampler);
            let p = ray.at((-3.0 - ray.origin.z) / ray.direction.z);
            // Only the sub-pixel jitter moves the focus point
            let target = *first.get_or_insert(p);
            assert!(p.distance(target) < 0.2, "{p:?} vs {target:?}");
            assert!((ray.origin.z - camera.z_near()).abs() < 1e-4);
        }
    }

    #[test]
    fn test_perspective_camera() {
        let camera = PerspectiveCamera::new(&options(64, 32));
        let mut sampler = DeterministicSampler;
        let ray = camera.ray(0, 0, &mut sampler);
        assert_eq!(ray.origin, Vertex::ORIGIN);
        assert!(ray.direction.x < 0.0 && ray.direction.y > 0.0 && ray.direction.z < 0.0);
        assert!((ray.direction.length() - 1.0).abs() < 1e-6);
    }
}
