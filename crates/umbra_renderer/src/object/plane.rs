use std::sync::Arc;

use glam::{Vec2, Vec3};
use umbra_math::{intersect_rectangle, Aabb, Normal, Ray, Transform, Vertex};

use super::{positive, GeometryResult, Object, ObjectBase};
use crate::material::Material;
use crate::surface::SurfaceInfo;

/// A `width × height` rectangle in the local `z = 0` plane, centred at the
/// origin and facing +z.
#[derive(Debug, Clone)]
pub struct Plane {
    base: ObjectBase,
    half_width: f32,
    half_height: f32,
}

impl Plane {
    pub fn new(
        width: f32,
        height: f32,
        transform: Transform,
        material: Option<Arc<Material>>,
    ) -> GeometryResult<Self> {
        Ok(Self {
            half_width: positive("plane", "width", width)? * 0.5,
            half_height: positive("plane", "height", height)? * 0.5,
            base: ObjectBase::new("plane", transform, material)?,
        })
    }

    fn surface_at(&self, t: f32, x: f32, y: f32) -> SurfaceInfo<'_> {
        let uv = Vec2::new(
            0.5 * (x / self.half_width + 1.0),
            0.5 * (y / self.half_height + 1.0),
        );
        SurfaceInfo::new(
            t,
            self.base.to_parent(Vertex::new(x, y, 0.0)),
            self.base.to_parent(Normal::new_unchecked(Vec3::Z)),
            uv,
            self,
        )
    }
}

impl Object for Plane {
    fn intersect(&self, ray: &Ray) -> Option<SurfaceInfo<'_>> {
        let local = self.base.to_local(ray);
        let t = intersect_rectangle(&local, self.half_width, self.half_height)?;
        let p = local.at(t);
        let mut hit = self.surface_at(t, p.x, p.y);
        hit.initialize_shading(ray);
        Some(hit)
    }

    fn area(&self) -> f32 {
        4.0 * self.half_width * self.half_height
    }

    fn sample(&self, u: Vec2) -> Option<(SurfaceInfo<'_>, f32)> {
        let x = (2.0 * u.x - 1.0) * self.half_width;
        let y = (2.0 * u.y - 1.0) * self.half_height;
        Some((self.surface_at(0.0, x, y), 1.0 / self.area()))
    }

    fn world_bounds(&self) -> Aabb {
        let (w, h) = (self.half_width, self.half_height);
        self.base
            .to_parent(Aabb::from_points(Vec3::new(-w, -h, 0.0), Vec3::new(w, h, 0.0)))
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
    fn test_texture_coordinates_span_unit_square() {
        let plane = Plane::new(4.0, 2.0, Transform::IDENTITY, white()).unwrap();
        let down = |x: f32, y: f32| Ray::new(Vertex::new(x, y, 1.0), Direction::NEG_Z);

        let corner = plane.intersect(&down(-1.999, -0.999)).unwrap();
        assert!(corner.uv.x < 1e-3 && corner.uv.y < 1e-3);
        let centre = plane.intersect(&down(0.0, 0.0)).unwrap();
        assert!((centre.uv - Vec2::splat(0.5)).length() < 1e-6);
        assert!(plane.intersect(&down(2.5, 0.0)).is_none());
    }

    #[test]
    fn test_rotated_plane_normal() {
        let wall = Plane::new(2.0, 2.0, Transform::rotate_x_quarters(1), white()).unwrap();
        let ray = Ray::new(Vertex::new(0.0, -3.0, 0.0), Direction::Y);
        let hit = wall.intersect(&ray).unwrap();
        assert!((hit.t - 3.0).abs() < 1e-5);
        assert!((hit.n.vec().abs() - Vec3::Y).length() < 1e-6);
    }
}
