use std::f32::consts::PI;
use std::sync::Arc;

use glam::{Vec2, Vec3};
use umbra_math::{intersect_disc, Aabb, Normal, Ray, Transform, Vertex};

use super::{azimuth, positive, GeometryResult, Object, ObjectBase};
use crate::material::Material;
use crate::sampling::concentric_sample_disc;
use crate::surface::SurfaceInfo;

/// A disc in the local `z = 0` plane, facing +z.
#[derive(Debug, Clone)]
pub struct Disc {
    base: ObjectBase,
    radius: f32,
}

impl Disc {
    pub fn new(
        radius: f32,
        transform: Transform,
        material: Option<Arc<Material>>,
    ) -> GeometryResult<Self> {
        Ok(Self {
            radius: positive("disc", "radius", radius)?,
            base: ObjectBase::new("disc", transform, material)?,
        })
    }

    fn surface_at(&self, t: f32, x: f32, y: f32) -> SurfaceInfo<'_> {
        let uv = Vec2::new(azimuth(x, y), (x * x + y * y).sqrt() / self.radius);
        SurfaceInfo::new(
            t,
            self.base.to_parent(Vertex::new(x, y, 0.0)),
            self.base.to_parent(Normal::new_unchecked(Vec3::Z)),
            uv,
            self,
        )
    }
}

impl Object for Disc {
    fn intersect(&self, ray: &Ray) -> Option<SurfaceInfo<'_>> {
        let local = self.base.to_local(ray);
        let t = intersect_disc(&local, self.radius)?;
        let p = local.at(t);
        let mut hit = self.surface_at(t, p.x, p.y);
        hit.initialize_shading(ray);
        Some(hit)
    }

    fn area(&self) -> f32 {
        PI * self.radius * self.radius
    }

    fn sample(&self, u: Vec2) -> Option<(SurfaceInfo<'_>, f32)> {
        let d = concentric_sample_disc(u) * self.radius;
        Some((self.surface_at(0.0, d.x, d.y), 1.0 / self.area()))
    }

    fn world_bounds(&self) -> Aabb {
        let r = self.radius;
        self.base
            .to_parent(Aabb::from_points(Vec3::new(-r, -r, 0.0), Vec3::new(r, r, 0.0)))
    }

    fn transform(&self) -> &Transform {
        self.base.transform()
    }

    fn material(&self) -> Option<&Material> {
        self.base.material()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::tests::white;
    use umbra_math::Direction;

    #[test]
    fn test_hit_inside_radius_only() {
        let disc = Disc::new(1.0, Transform::translate(0.0, 0.0, 1.0), white()).unwrap();
        let down = |x: f32| Ray::new(Vertex::new(x, 0.0, 3.0), Direction::NEG_Z);

        let hit = disc.intersect(&down(0.5)).unwrap();
        assert!((hit.t - 2.0).abs() < 1e-5);
        assert!((hit.uv.y - 0.5).abs() < 1e-5);
        assert!(disc.intersect(&down(1.5)).is_none());
    }

    #[test]
    fn test_back_face_is_hit() {
        let disc = Disc::new(1.0, Transform::IDENTITY, white()).unwrap();
        let up = Ray::new(Vertex::new(0.0, 0.0, -1.0), Direction::Z);
        let hit = disc.intersect(&up).unwrap();
        assert_eq!(hit.n.vec(), Vec3::Z);
        assert!(hit.wo_s.z < 0.0);
    }
}
