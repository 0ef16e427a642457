//! Geometric objects.
//!
//! Every object is an analytic shape in its own space, placed in its parent
//! space by a rigid transform. Intersection transforms the ray into shape
//! space, runs the matching primitive from `umbra_math`, and carries the hit
//! back out.

mod cylinder;
mod disc;
mod group;
mod plane;
mod sphere;

pub use cylinder::Cylinder;
pub use disc::Disc;
pub use group::Group;
pub use plane::Plane;
pub use sphere::Sphere;

use std::sync::Arc;

use glam::{Vec2, Vec3};
use thiserror::Error;
use umbra_math::{Aabb, Ray, Transform, Transformable};

use crate::material::Material;
use crate::surface::SurfaceInfo;

/// Errors raised while constructing objects.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("{shape} transform must be rigid (rotations and translations only)")]
    NonRigidTransform { shape: &'static str },

    #[error("{shape} {parameter} must be positive and finite, got {value}")]
    InvalidParameter {
        shape: &'static str,
        parameter: &'static str,
        value: f32,
    },

    #[error("group has no children")]
    EmptyGroup,
}

pub type GeometryResult<T> = Result<T, GeometryError>;

/// Check a size parameter.
pub(crate) fn positive(shape: &'static str, parameter: &'static str, value: f32) -> GeometryResult<f32> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(GeometryError::InvalidParameter {
            shape,
            parameter,
            value,
        })
    }
}

/// Placement and appearance shared by every object.
#[derive(Debug, Clone)]
pub struct ObjectBase {
    transform: Transform,
    inverse: Transform,
    material: Option<Arc<Material>>,
}

impl ObjectBase {
    pub fn new(
        shape: &'static str,
        transform: Transform,
        material: Option<Arc<Material>>,
    ) -> GeometryResult<Self> {
        if !transform.is_rigid() {
            return Err(GeometryError::NonRigidTransform { shape });
        }
        Ok(Self {
            inverse: transform.inverse(),
            transform,
            material,
        })
    }

    /// Carry a parent-space ray into shape space.
    #[inline]
    pub fn to_local(&self, ray: &Ray) -> Ray {
        self.inverse.apply(*ray)
    }

    /// Carry a shape-space value out to parent space.
    #[inline]
    pub fn to_parent<T: Transformable>(&self, value: T) -> T {
        self.transform.apply(value)
    }

    #[inline]
    pub fn to_shape<T: Transformable>(&self, value: T) -> T {
        self.inverse.apply(value)
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn material(&self) -> Option<&Material> {
        self.material.as_deref()
    }
}

/// Trait for objects that can be hit by rays and sampled by area.
pub trait Object: Send + Sync {
    /// Nearest hit the ray accepts, with shading initialised.
    fn intersect(&self, ray: &Ray) -> Option<SurfaceInfo<'_>>;

    /// Surface area in world units.
    fn area(&self) -> f32;

    /// Uniform point on the surface with its density per unit area.
    fn sample(&self, u: Vec2) -> Option<(SurfaceInfo<'_>, f32)>;

    /// Point on the surface as seen from `reference`, with its density per
    /// unit solid angle at the reference point.
    fn sample_from(&self, reference: &SurfaceInfo<'_>, u: Vec2) -> Option<(SurfaceInfo<'_>, f32)> {
        sample_by_area(self, reference, u)
    }

    /// Solid-angle density of [`Object::sample_from`] for direction `wi`.
    fn pdf(&self, reference: &SurfaceInfo<'_>, wi: Vec3) -> f32 {
        pdf_by_area(self, reference, wi)
    }

    fn world_bounds(&self) -> Aabb;

    /// Object-to-parent transform.
    fn transform(&self) -> &Transform;

    fn material(&self) -> Option<&Material>;

    fn casts_shadow(&self) -> bool {
        self.material().map_or(true, Material::casts_shadow)
    }

    /// Whether the ray is blocked by this object. With
    /// `honour_shadow_flags`, materials that do not cast shadows let it pass.
    fn occludes(&self, ray: &Ray, honour_shadow_flags: bool) -> bool {
        if honour_shadow_flags && !self.casts_shadow() {
            return false;
        }
        self.intersect(ray).is_some()
    }
}

/// Area sampling converted to solid angle: `pdf_ω = pdf_A · d² / |cos θ|`.
pub fn sample_by_area<'a, O: Object + ?Sized>(
    object: &'a O,
    reference: &SurfaceInfo<'_>,
    u: Vec2,
) -> Option<(SurfaceInfo<'a>, f32)> {
    let (point, pdf_area) = object.sample(u)?;
    let offset = point.p - reference.p;
    let dist2 = offset.length_squared();
    if dist2 == 0.0 {
        return None;
    }
    let wi = offset / dist2.sqrt();
    let cos = point.n.dot(-wi).abs();
    if cos == 0.0 {
        return None;
    }
    Some((point, pdf_area * dist2 / cos))
}

/// Inverse of [`sample_by_area`]: find where `wi` meets the object.
pub fn pdf_by_area<O: Object + ?Sized>(object: &O, reference: &SurfaceInfo<'_>, wi: Vec3) -> f32 {
    let ray = reference.spawn_ray(wi);
    let Some(hit) = object.intersect(&ray) else {
        return 0.0;
    };
    let cos = hit.n.dot(-wi).abs();
    if cos == 0.0 {
        return 0.0;
    }
    let dist2 = (hit.p - reference.p).length_squared();
    dist2 / (cos * object.area())
}

/// Azimuth of `(x, y)` mapped to `[0, 1)`.
#[inline]
pub(crate) fn azimuth(x: f32, y: f32) -> f32 {
    (y.atan2(x) / (2.0 * std::f32::consts::PI)).rem_euclid(1.0)
}
