use crate::{Interval, Ray, Vertex};
use glam::Vec3;

/// Axis-aligned bounding box, one [`Interval`] per axis.
///
/// Valid boxes satisfy `min <= max` component-wise; [`Aabb::EMPTY`] is the
/// neutral element of [`Aabb::surrounding`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    /// Thinnest extent a box is given along any axis, so flat shapes still
    /// have a hittable volume.
    const MIN_EXTENT: f32 = 1.0e-4;

    /// Box spanned by two corners in any order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let (lo, hi) = (a.min(b), a.max(b));
        Self {
            x: Interval::new(lo.x, hi.x).padded(Self::MIN_EXTENT),
            y: Interval::new(lo.y, hi.y).padded(Self::MIN_EXTENT),
            z: Interval::new(lo.z, hi.z).padded(Self::MIN_EXTENT),
        }
    }

    pub fn surrounding(a: &Aabb, b: &Aabb) -> Self {
        Self {
            x: a.x.union(b.x),
            y: a.y.union(b.y),
            z: a.z.union(b.z),
        }
    }

    pub fn min(&self) -> Vertex {
        Vertex::new(self.x.min, self.y.min, self.z.min)
    }

    pub fn max(&self) -> Vertex {
        Vertex::new(self.x.max, self.y.max, self.z.max)
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty() || self.y.is_empty() || self.z.is_empty()
    }

    /// The eight corners, x varying fastest.
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min().0, self.max().0);
        std::array::from_fn(|i| {
            Vec3::new(
                if i & 1 == 0 { lo.x } else { hi.x },
                if i & 2 == 0 { lo.y } else { hi.y },
                if i & 4 == 0 { lo.z } else { hi.z },
            )
        })
    }

    /// Slab test against the ray's accepted parameter range.
    pub fn hit(&self, ray: &Ray) -> bool {
        if self.is_empty() {
            return false;
        }
        let inv = ray.direction.vec().recip();
        let origin = ray.origin.0;
        let slabs = [
            (self.x, origin.x, inv.x),
            (self.y, origin.y, inv.y),
            (self.z, origin.z, inv.z),
        ];

        let mut range = ray.range();
        for (slab, o, inv_d) in slabs {
            let near = (slab.min - o) * inv_d;
            let far = (slab.max - o) * inv_d;
            let slab_t = if inv_d < 0.0 {
                Interval::new(far, near)
            } else {
                Interval::new(near, far)
            };
            // A ray parallel to a slab it starts on gives NaN, which keeps the range
            range = range.intersect(slab_t);
            if range.is_empty() {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Direction;

    #[test]
    fn test_aabb_from_points() {
        let aabb = Aabb::from_points(Vec3::new(10.0, 0.0, 10.0), Vec3::new(0.0, 10.0, 0.0));

        assert_eq!(aabb.min(), Vertex::new(0.0, 0.0, 0.0));
        assert_eq!(aabb.max(), Vertex::new(10.0, 10.0, 10.0));
    }

    #[test]
    fn test_flat_aabb_is_padded() {
        let aabb = Aabb::from_points(Vec3::new(-1.0, -1.0, 0.0), Vec3::new(1.0, 1.0, 0.0));
        assert!(aabb.z.size() > 0.0);
        assert!(aabb.z.contains(0.0));
    }

    #[test]
    fn test_aabb_surrounding_empty_is_neutral() {
        let b = Aabb::from_points(Vec3::ZERO, Vec3::ONE);
        assert_eq!(Aabb::surrounding(&Aabb::EMPTY, &b), b);
    }

    #[test]
    fn test_aabb_hit() {
        let aabb = Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0));

        // Ray pointing at center
        let ray = Ray::new(Vertex::new(0.0, 0.0, -5.0), Direction::Z);
        assert!(aabb.hit(&ray));

        // Ray pointing away
        let ray = Ray::new(Vertex::new(0.0, 0.0, -5.0), Direction::NEG_Z);
        assert!(!aabb.hit(&ray));

        // Ray missing the box
        let ray = Ray::new(Vertex::new(10.0, 0.0, 0.0), Direction::Z);
        assert!(!aabb.hit(&ray));

        // Ray that ends before reaching the box
        let ray = Ray::with_t_max(Vertex::new(0.0, 0.0, -5.0), Direction::Z, 2.0);
        assert!(!aabb.hit(&ray));

        // Ray starting inside
        let ray = Ray::new(Vertex::ORIGIN, Direction::X);
        assert!(aabb.hit(&ray));
    }

    #[test]
    fn test_empty_aabb_is_never_hit() {
        let ray = Ray::new(Vertex::ORIGIN, Direction::X);
        assert!(!Aabb::EMPTY.hit(&ray));
    }
}
