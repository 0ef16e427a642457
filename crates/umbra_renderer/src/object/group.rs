use glam::Vec2;
use umbra_math::{Aabb, Ray, Transform};

use super::{GeometryError, GeometryResult, Object, ObjectBase};
use crate::material::Material;
use crate::sampling::ONE_MINUS_EPSILON;
use crate::surface::SurfaceInfo;

/// A rigidly placed collection of objects. Children keep their own
/// materials; the group has none.
pub struct Group {
    base: ObjectBase,
    children: Vec<Box<dyn Object>>,
    local_bounds: Aabb,
    world_bounds: Aabb,
    area: f32,
}

impl Group {
    pub fn new(children: Vec<Box<dyn Object>>, transform: Transform) -> GeometryResult<Self> {
        if children.is_empty() {
            return Err(GeometryError::EmptyGroup);
        }
        let base = ObjectBase::new("group", transform, None)?;
        let local_bounds = children
            .iter()
            .fold(Aabb::EMPTY, |acc, child| Aabb::surrounding(&acc, &child.world_bounds()));
        let area = children.iter().map(|child| child.area()).sum();

        Ok(Self {
            world_bounds: base.to_parent(local_bounds),
            base,
            children,
            local_bounds,
            area,
        })
    }

    pub fn children(&self) -> &[Box<dyn Object>] {
        &self.children
    }
}

impl Object for Group {
    fn intersect(&self, ray: &Ray) -> Option<SurfaceInfo<'_>> {
        let mut probe = self.base.to_local(ray);
        if !self.local_bounds.hit(&probe) {
            return None;
        }

        let mut nearest = None;
        for child in &self.children {
            if let Some(hit) = child.intersect(&probe) {
                probe.t_max = hit.t;
                nearest = Some(hit);
            }
        }

        let mut hit = self.base.to_parent(nearest?);
        hit.initialize_shading(ray);
        Some(hit)
    }

    fn area(&self) -> f32 {
        self.area
    }

    /// Picks a child in proportion to its area, so points are uniform over
    /// the whole group.
    fn sample(&self, u: Vec2) -> Option<(SurfaceInfo<'_>, f32)> {
        let last = self.children.len() - 1;
        let mut offset = u.x * self.area;
        let mut index = 0;
        while index < last && offset >= self.children[index].area() {
            offset -= self.children[index].area();
            index += 1;
        }

        let child = &self.children[index];
        let remapped = Vec2::new((offset.max(0.0) / child.area()).min(ONE_MINUS_EPSILON), u.y);
        let (point, _) = child.sample(remapped)?;
        Some((self.base.to_parent(point), 1.0 / self.area))
    }

    fn world_bounds(&self) -> Aabb {
        self.world_bounds
    }

    fn transform(&self) -> &Transform {
        self.base.transform()
    }

    fn material(&self) -> Option<&Material> {
        None
    }

    fn occludes(&self, ray: &Ray, honour_shadow_flags: bool) -> bool {
        let local = self.base.to_local(ray);
        self.local_bounds.hit(&local)
            && self
                .children
                .iter()
                .any(|child| child.occludes(&local, honour_shadow_flags))
    }
}

impl std::fmt::Debug for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Group")
            .field("children", &self.children.len())
            .field("bounds", &self.world_bounds)
            .finish()
    }
}
