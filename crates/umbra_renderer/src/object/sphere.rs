//! Sphere primitive.

use std::f32::consts::PI;
use std::sync::Arc;

use glam::{Vec2, Vec3};
use umbra_math::{intersect_sphere, Aabb, Frame, Normal, Ray, Transform, Vertex};

use super::{pdf_by_area, positive, sample_by_area, GeometryResult, Object, ObjectBase};
use crate::material::Material;
use crate::sampling::{uniform_cone_pdf, uniform_sample_cone, uniform_sample_sphere};
use crate::surface::SurfaceInfo;

/// A sphere centred at its local origin.
#[derive(Debug, Clone)]
pub struct Sphere {
    base: ObjectBase,
    radius: f32,
}

impl Sphere {
    pub fn new(
        radius: f32,
        transform: Transform,
        material: Option<Arc<Material>>,
    ) -> GeometryResult<Self> {
        Ok(Self {
            radius: positive("sphere", "radius", radius)?,
            base: ObjectBase::new("sphere", transform, material)?,
        })
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn center(&self) -> Vertex {
        self.base.to_parent(Vertex::ORIGIN)
    }

    /// Hit record for local point `p` on the surface.
    fn surface_at(&self, t: f32, p: Vec3) -> SurfaceInfo<'_> {
        let n = p / self.radius;
        let uv = Vec2::new(
            super::azimuth(n.x, n.y),
            n.z.clamp(-1.0, 1.0).acos() / PI,
        );
        SurfaceInfo::new(
            t,
            self.base.to_parent(Vertex(p)),
            self.base.to_parent(Normal::new(n)),
            uv,
            self,
        )
    }

    /// Cosine of the half-angle the sphere subtends from `p`, or `None`
    /// when `p` is inside.
    fn cone_from(&self, p: Vertex) -> Option<(Vec3, f32, f32)> {
        let offset = self.center() - p;
        let dist2 = offset.length_squared();
        let r2 = self.radius * self.radius;
        if dist2 <= r2 {
            return None;
        }
        let cos_theta_max = (1.0 - r2 / dist2).max(0.0).sqrt();
        if cos_theta_max >= 1.0 {
            return None;
        }
        Some((offset, dist2, cos_theta_max))
    }
}

impl Object for Sphere {
    fn intersect(&self, ray: &Ray) -> Option<SurfaceInfo<'_>> {
        let local = self.base.to_local(ray);
        let t = intersect_sphere(&local, self.radius)?;
        let mut hit = self.surface_at(t, local.at(t).0);
        hit.initialize_shading(ray);
        Some(hit)
    }

    fn area(&self) -> f32 {
        4.0 * PI * self.radius * self.radius
    }

    fn sample(&self, u: Vec2) -> Option<(SurfaceInfo<'_>, f32)> {
        let p = uniform_sample_sphere(u) * self.radius;
        Some((self.surface_at(0.0, p), 1.0 / self.area()))
    }

    /// Samples the cone of directions the sphere subtends when `reference`
    /// is outside it.
    fn sample_from(&self, reference: &SurfaceInfo<'_>, u: Vec2) -> Option<(SurfaceInfo<'_>, f32)> {
        let Some((offset, dist2, cos_theta_max)) = self.cone_from(reference.p) else {
            return sample_by_area(self, reference, u);
        };

        let dist = dist2.sqrt();
        let frame = Frame::from_normal(Normal::new(offset));
        let local = uniform_sample_cone(u, cos_theta_max);
        let w = frame.to_world(local);

        // Nearest point along w on the sphere
        let cos_theta = local.z;
        let sin2_theta = (1.0 - cos_theta * cos_theta).max(0.0);
        let r2 = self.radius * self.radius;
        let t = dist * cos_theta - (r2 - dist2 * sin2_theta).max(0.0).sqrt();
        let p_world = reference.p + w * t;

        let p_local = self.base.to_shape(p_world).0;
        let p_local = p_local * (self.radius / p_local.length());
        Some((self.surface_at(t, p_local), uniform_cone_pdf(cos_theta_max)))
    }

    fn pdf(&self, reference: &SurfaceInfo<'_>, wi: Vec3) -> f32 {
        let Some((_, _, cos_theta_max)) = self.cone_from(reference.p) else {
            return pdf_by_area(self, reference, wi);
        };
        if self.intersect(&reference.spawn_ray(wi)).is_none() {
            return 0.0;
        }
        uniform_cone_pdf(cos_theta_max)
    }

    fn world_bounds(&self) -> Aabb {
        let r = Vec3::splat(self.radius);
        self.base.to_parent(Aabb::from_points(-r, r))
    }

    fn transform(&self) -> &Transform {
        self.base.transform()
    }

    fn material(&self) -> Option<&Material> {
        self.base.material()
    }
}
