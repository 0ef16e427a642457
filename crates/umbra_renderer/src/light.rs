//! Light sources.
//!
//! Point and directional lights are delta distributions: they can only be
//! reached by sampling them explicitly. Area lights own a shape that the
//! scene intersects like any other object.

use glam::{Vec2, Vec3};
use umbra_core::Color;
use umbra_math::{Direction, Ray, Vertex};

use crate::object::Object;
use crate::surface::SurfaceInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    DeltaPosition,
    DeltaDirection,
    Area,
}

/// Incident radiance sampled from a light.
#[derive(Debug, Clone, Copy)]
pub struct LightSample {
    pub li: Color,
    /// Unit direction from the reference point towards the light
    pub wi: Vec3,
    /// Solid-angle density; 1 for delta lights
    pub pdf: f32,
    /// Shadow ray from the reference point that stops short of the light
    pub vis_ray: Ray,
}

/// Trait for anything that emits light into the scene.
pub trait Light: Send + Sync {
    fn kind(&self) -> LightKind;

    fn is_delta(&self) -> bool {
        self.kind() != LightKind::Area
    }

    /// Samples to take per shading point.
    fn num_samples(&self) -> u32 {
        1
    }

    /// Incident radiance at `reference` from a sampled point on the light.
    fn sample_li(&self, reference: &SurfaceInfo<'_>, u: Vec2) -> Option<LightSample>;

    /// Density [`Light::sample_li`] would assign to `wi`. Zero for delta lights.
    fn pdf_li(&self, _reference: &SurfaceInfo<'_>, _wi: Vec3) -> f32 {
        0.0
    }

    /// Radiance leaving `surface` (a point on this light) in direction `w`.
    fn radiance(&self, _surface: &SurfaceInfo<'_>, _w: Vec3) -> Color {
        Color::ZERO
    }

    /// The emitting shape, for lights that have one.
    fn shape(&self) -> Option<&dyn Object> {
        None
    }
}

/// Isotropic point emitter.
#[derive(Debug, Clone)]
pub struct PointLight {
    position: Vertex,
    intensity: Color,
}

impl PointLight {
    pub fn new(position: Vertex, intensity: Color, scale: f32) -> Self {
        Self {
            position,
            intensity: intensity * scale,
        }
    }
}

impl Light for PointLight {
    fn kind(&self) -> LightKind {
        LightKind::DeltaPosition
    }

    fn sample_li(&self, reference: &SurfaceInfo<'_>, _u: Vec2) -> Option<LightSample> {
        let dist2 = (self.position - reference.p).length_squared();
        if dist2 == 0.0 {
            return None;
        }
        let vis_ray = Ray::between(reference.p, self.position);
        Some(LightSample {
            li: self.intensity / dist2,
            wi: vis_ray.direction.vec(),
            pdf: 1.0,
            vis_ray,
        })
    }
}

/// Parallel light arriving from infinitely far away.
#[derive(Debug, Clone)]
pub struct DirectionalLight {
    /// Direction the light travels in
    direction: Direction,
    radiance: Color,
}

impl DirectionalLight {
    pub fn new(direction: Vec3, radiance: Color, scale: f32) -> Self {
        Self {
            direction: Direction::new(direction),
            radiance: radiance * scale,
        }
    }
}

impl Light for DirectionalLight {
    fn kind(&self) -> LightKind {
        LightKind::DeltaDirection
    }

    fn sample_li(&self, reference: &SurfaceInfo<'_>, _u: Vec2) -> Option<LightSample> {
        let wi = -self.direction;
        Some(LightSample {
            li: self.radiance,
            wi: wi.vec(),
            pdf: 1.0,
            vis_ray: Ray::new(reference.p, wi),
        })
    }
}

/// Uniform emitter over the surface of an owned shape.
pub struct DiffuseAreaLight {
    shape: Box<dyn Object>,
    emit: Color,
    samples: u32,
    two_sided: bool,
}

impl DiffuseAreaLight {
    pub fn new(shape: Box<dyn Object>, emit: Color, scale: f32, samples: u32, two_sided: bool) -> Self {
        Self {
            shape,
            emit: emit * scale,
            samples: samples.max(1),
            two_sided,
        }
    }
}

impl Light for DiffuseAreaLight {
    fn kind(&self) -> LightKind {
        LightKind::Area
    }

    fn num_samples(&self) -> u32 {
        self.samples
    }

    fn sample_li(&self, reference: &SurfaceInfo<'_>, u: Vec2) -> Option<LightSample> {
        let (point, pdf) = self.shape.sample_from(reference, u)?;
        if pdf <= 0.0 || !pdf.is_finite() {
            return None;
        }
        let vis_ray = Ray::between(reference.p, point.p);
        let wi = vis_ray.direction.vec();
        Some(LightSample {
            li: self.radiance(&point, -wi),
            wi,
            pdf,
            vis_ray,
        })
    }

    fn pdf_li(&self, reference: &SurfaceInfo<'_>, wi: Vec3) -> f32 {
        self.shape.pdf(reference, wi)
    }

    fn radiance(&self, surface: &SurfaceInfo<'_>, w: Vec3) -> Color {
        if self.two_sided || surface.n.dot(w) > 0.0 {
            self.emit
        } else {
            Color::ZERO
        }
    }

    fn shape(&self) -> Option<&dyn Object> {
        Some(self.shape.as_ref())
    }
}

impl std::fmt::Debug for DiffuseAreaLight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiffuseAreaLight")
            .field("emit", &self.emit)
            .field("samples", &self.samples)
            .field("two_sided", &self.two_sided)
            .field("area", &self.shape.area())
            .finish()
    }
}
