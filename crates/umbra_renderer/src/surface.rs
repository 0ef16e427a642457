//! Hit records.

use glam::{Vec2, Vec3};
use umbra_core::Color;
use umbra_math::{Direction, Frame, Normal, Ray, Transform, Transformable, Vertex};

use crate::bsdf::Bsdf;
use crate::light::Light;
use crate::object::Object;

/// Record of a ray-object intersection, or of a point sampled on a surface.
///
/// `intersect` fills the geometric fields; the shading frame and `wo` are
/// set by [`SurfaceInfo::initialize_shading`] once the hit is accepted.
#[derive(Clone, Copy)]
pub struct SurfaceInfo<'a> {
    /// Ray parameter of the hit
    pub t: f32,
    /// World-space position
    pub p: Vertex,
    /// Geometric normal, outward-facing
    pub n: Normal,
    pub uv: Vec2,
    /// The object that was hit
    pub object: &'a dyn Object,
    /// Light whose shape was hit, if any
    pub area_light: Option<&'a dyn Light>,
    /// Shading frame; its z-axis is `n`
    pub frame: Frame,
    /// Direction back along the incoming ray, world space
    pub wo: Vec3,
    /// `wo` in shading coordinates
    pub wo_s: Vec3,
}

impl<'a> SurfaceInfo<'a> {
    pub fn new(t: f32, p: Vertex, n: Normal, uv: Vec2, object: &'a dyn Object) -> Self {
        Self {
            t,
            p,
            n,
            uv,
            object,
            area_light: None,
            frame: Frame::from_normal(n),
            wo: Vec3::ZERO,
            wo_s: Vec3::ZERO,
        }
    }

    /// Set up the shading frame and outgoing direction for `ray`.
    pub fn initialize_shading(&mut self, ray: &Ray) {
        self.frame = Frame::from_normal(self.n);
        self.wo = -ray.direction.vec();
        self.wo_s = self.frame.to_local(self.wo);
    }

    pub fn to_shading(&self, v: Vec3) -> Vec3 {
        self.frame.to_local(v)
    }

    pub fn to_world(&self, v: Vec3) -> Vec3 {
        self.frame.to_world(v)
    }

    /// Ray leaving the surface in direction `wi`.
    pub fn spawn_ray(&self, wi: Vec3) -> Ray {
        Ray::new(self.p, Direction::new(wi))
    }

    /// Scattering function at this point, if the object has a material.
    pub fn bsdf(&self, eta_a: f32) -> Option<Bsdf<'a>> {
        self.object
            .material()
            .map(|material| Bsdf::new(self, material, eta_a))
    }

    /// Radiance emitted towards `wo` when the hit lies on an area light.
    pub fn emitted(&self) -> Color {
        self.area_light
            .map_or(Color::ZERO, |light| light.radiance(self, self.wo))
    }
}

/// Moves a hit from an object's parent space outwards. Object transforms
/// are rigid, so `t` carries over unchanged.
impl Transformable for SurfaceInfo<'_> {
    fn transformed(mut self, transform: &Transform) -> Self {
        self.p = transform.apply(self.p);
        self.n = transform.apply(self.n);
        self.frame = Frame::from_normal(self.n);
        self
    }
}

impl std::fmt::Debug for SurfaceInfo<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceInfo")
            .field("t", &self.t)
            .field("p", &self.p)
            .field("n", &self.n)
            .field("uv", &self.uv)
            .field("area_light", &self.area_light.is_some())
            .field("wo", &self.wo)
            .finish()
    }
}
