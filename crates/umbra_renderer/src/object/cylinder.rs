use std::f32::consts::PI;
use std::sync::Arc;

use glam::{Vec2, Vec3};
use umbra_math::{intersect_cylinder, intersect_plane, Aabb, Normal, Ray, Transform, Vertex};

use super::{azimuth, positive, GeometryResult, Object, ObjectBase};
use crate::material::Material;
use crate::sampling::{concentric_sample_disc, ONE_MINUS_EPSILON};
use crate::surface::SurfaceInfo;

/// A cylinder about the local z-axis spanning `-height/2..height/2`,
/// optionally closed by two end caps.
#[derive(Debug, Clone)]
pub struct Cylinder {
    base: ObjectBase,
    radius: f32,
    height: f32,
    capped: bool,
}

impl Cylinder {
    pub fn new(
        radius: f32,
        height: f32,
        capped: bool,
        transform: Transform,
        material: Option<Arc<Material>>,
    ) -> GeometryResult<Self> {
        Ok(Self {
            radius: positive("cylinder", "radius", radius)?,
            height: positive("cylinder", "height", height)?,
            capped,
            base: ObjectBase::new("cylinder", transform, material)?,
        })
    }

    fn z_range(&self) -> (f32, f32) {
        (-0.5 * self.height, 0.5 * self.height)
    }

    fn lateral_area(&self) -> f32 {
        2.0 * PI * self.radius * self.height
    }

    fn cap_area(&self) -> f32 {
        PI * self.radius * self.radius
    }

    fn lateral_at(&self, t: f32, p: Vec3) -> SurfaceInfo<'_> {
        let (z0, _) = self.z_range();
        let uv = Vec2::new(azimuth(p.x, p.y), (p.z - z0) / self.height);
        SurfaceInfo::new(
            t,
            self.base.to_parent(Vertex(p)),
            self.base.to_parent(Normal::new(Vec3::new(p.x, p.y, 0.0))),
            uv,
            self,
        )
    }

    fn cap_at(&self, t: f32, p: Vec3, top: bool) -> SurfaceInfo<'_> {
        let n = if top { Vec3::Z } else { Vec3::NEG_Z };
        let uv = Vec2::new(azimuth(p.x, p.y), (p.x * p.x + p.y * p.y).sqrt() / self.radius);
        SurfaceInfo::new(
            t,
            self.base.to_parent(Vertex(p)),
            self.base.to_parent(Normal::new_unchecked(n)),
            uv,
            self,
        )
    }

    /// Nearest cap hit in shape space.
    fn intersect_caps(&self, local: &Ray) -> Option<(f32, bool)> {
        let (z0, z1) = self.z_range();
        let r2 = self.radius * self.radius;
        [(z0, false), (z1, true)]
            .into_iter()
            .filter_map(|(z, top)| {
                let t = intersect_plane(local, z)?;
                let p = local.at(t);
                (p.x * p.x + p.y * p.y <= r2).then_some((t, top))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
    }
}

impl Object for Cylinder {
    fn intersect(&self, ray: &Ray) -> Option<SurfaceInfo<'_>> {
        let local = self.base.to_local(ray);
        let (z0, z1) = self.z_range();
        let lateral = intersect_cylinder(&local, self.radius, z0, z1);
        let cap = if self.capped {
            self.intersect_caps(&local)
        } else {
            None
        };

        let mut hit = match (lateral, cap) {
            (Some(t), Some((tc, top))) if tc < t => self.cap_at(tc, local.at(tc).0, top),
            (Some(t), _) => self.lateral_at(t, local.at(t).0),
            (None, Some((tc, top))) => self.cap_at(tc, local.at(tc).0, top),
            (None, None) => return None,
        };
        hit.initialize_shading(ray);
        Some(hit)
    }

    fn area(&self) -> f32 {
        if self.capped {
            self.lateral_area() + 2.0 * self.cap_area()
        } else {
            self.lateral_area()
        }
    }

    fn sample(&self, u: Vec2) -> Option<(SurfaceInfo<'_>, f32)> {
        let pdf = 1.0 / self.area();
        let (z0, _) = self.z_range();

        let lateral_fraction = self.lateral_area() / self.area();
        if u.x < lateral_fraction {
            let ux = (u.x / lateral_fraction).min(ONE_MINUS_EPSILON);
            let phi = 2.0 * PI * u.y;
            let p = Vec3::new(
                self.radius * phi.cos(),
                self.radius * phi.sin(),
                z0 + ux * self.height,
            );
            return Some((self.lateral_at(0.0, p), pdf));
        }

        // Caps share the remainder equally
        let ux = ((u.x - lateral_fraction) / (1.0 - lateral_fraction)).min(ONE_MINUS_EPSILON);
        let top = ux >= 0.5;
        let ux = if top { 2.0 * ux - 1.0 } else { 2.0 * ux };
        let d = concentric_sample_disc(Vec2::new(ux, u.y)) * self.radius;
        let z = if top { -z0 } else { z0 };
        Some((self.cap_at(0.0, Vec3::new(d.x, d.y, z), top), pdf))
    }

    fn world_bounds(&self) -> Aabb {
        let (z0, z1) = self.z_range();
        let r = self.radius;
        self.base
            .to_parent(Aabb::from_points(Vec3::new(-r, -r, z0), Vec3::new(r, r, z1)))
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
    fn test_open_cylinder_shows_far_wall() {
        let tube = Cylinder::new(1.0, 2.0, false, Transform::IDENTITY, white()).unwrap();
        // Looking down the axis at an angle: enters through the open top
        // and meets the inside of the far wall
        let ray = Ray::new(Vertex::new(-2.0, 0.0, 3.5), Direction::new(Vec3::new(1.0, 0.0, -1.0)));
        let hit = tube.intersect(&ray).unwrap();
        assert!((hit.p.x - 1.0).abs() < 1e-4);
        assert!((hit.p.z - 0.5).abs() < 1e-4);
        assert!(hit.wo_s.z < 0.0);
    }

    #[test]
    fn test_caps_close_the_ends() {
        let closed = Cylinder::new(1.0, 2.0, true, Transform::IDENTITY, white()).unwrap();
        let ray = Ray::new(Vertex::new(0.2, 0.0, 5.0), Direction::NEG_Z);
        let hit = closed.intersect(&ray).unwrap();
        assert!((hit.t - 4.0).abs() < 1e-5);
        assert_eq!(hit.n.vec(), Vec3::Z);

        let open = Cylinder::new(1.0, 2.0, false, Transform::IDENTITY, white()).unwrap();
        assert!(open.intersect(&ray).is_none());
    }

    #[test]
    fn test_area_includes_caps() {
        let open = Cylinder::new(1.0, 2.0, false, Transform::IDENTITY, white()).unwrap();
        let closed = Cylinder::new(1.0, 2.0, true, Transform::IDENTITY, white()).unwrap();
        assert!((open.area() - 4.0 * PI).abs() < 1e-5);
        assert!((closed.area() - 6.0 * PI).abs() < 1e-5);
    }
}
