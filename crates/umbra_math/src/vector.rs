//! Role-tagged 3-vectors.
//!
//! A position, a unit direction and a surface normal transform differently
//! (translation applies only to positions, normals use the inverse
//! transpose), so each role is its own type. All three dereference to the
//! underlying `Vec3` for component access and plain arithmetic, but only the
//! role types implement [`Transformable`](crate::Transformable).

use std::ops::{Add, Deref, Neg, Sub};

use glam::Vec3;

/// A point in space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[repr(transparent)]
pub struct Vertex(pub Vec3);

/// A unit-length direction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(transparent)]
pub struct Direction(Vec3);

/// A unit-length surface normal.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(transparent)]
pub struct Normal(Vec3);

impl Vertex {
    pub const ORIGIN: Vertex = Vertex(Vec3::ZERO);

    #[inline]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self(Vec3::new(x, y, z))
    }

    #[inline]
    pub fn distance(self, other: Vertex) -> f32 {
        self.0.distance(other.0)
    }
}

impl Direction {
    pub const X: Direction = Direction(Vec3::X);
    pub const Y: Direction = Direction(Vec3::Y);
    pub const Z: Direction = Direction(Vec3::Z);
    pub const NEG_Z: Direction = Direction(Vec3::NEG_Z);

    /// Normalize `v` into a direction. A zero vector yields `+z` rather than
    /// NaNs so degenerate inputs stay finite.
    #[inline]
    pub fn new(v: Vec3) -> Self {
        Self(v.try_normalize().unwrap_or(Vec3::Z))
    }

    /// Wrap a vector the caller knows to be unit length.
    #[inline]
    pub fn new_unchecked(v: Vec3) -> Self {
        Self(v)
    }

    #[inline]
    pub fn vec(self) -> Vec3 {
        self.0
    }
}

impl Normal {
    #[inline]
    pub fn new(v: Vec3) -> Self {
        Self(v.try_normalize().unwrap_or(Vec3::Z))
    }

    #[inline]
    pub fn new_unchecked(v: Vec3) -> Self {
        Self(v)
    }

    #[inline]
    pub fn vec(self) -> Vec3 {
        self.0
    }

    /// Flip the normal so it lies in the same hemisphere as `v`.
    #[inline]
    pub fn face_forward(self, v: Vec3) -> Normal {
        if self.0.dot(v) < 0.0 {
            -self
        } else {
            self
        }
    }
}

impl Deref for Vertex {
    type Target = Vec3;

    #[inline]
    fn deref(&self) -> &Vec3 {
        &self.0
    }
}

impl Deref for Direction {
    type Target = Vec3;

    #[inline]
    fn deref(&self) -> &Vec3 {
        &self.0
    }
}

impl Deref for Normal {
    type Target = Vec3;

    #[inline]
    fn deref(&self) -> &Vec3 {
        &self.0
    }
}

impl Add<Vec3> for Vertex {
    type Output = Vertex;

    #[inline]
    fn add(self, rhs: Vec3) -> Vertex {
        Vertex(self.0 + rhs)
    }
}

impl Sub<Vec3> for Vertex {
    type Output = Vertex;

    #[inline]
    fn sub(self, rhs: Vec3) -> Vertex {
        Vertex(self.0 - rhs)
    }
}

impl Sub for Vertex {
    type Output = Vec3;

    #[inline]
    fn sub(self, rhs: Vertex) -> Vec3 {
        self.0 - rhs.0
    }
}

impl Neg for Direction {
    type Output = Direction;

    #[inline]
    fn neg(self) -> Direction {
        Direction(-self.0)
    }
}

impl Neg for Normal {
    type Output = Normal;

    #[inline]
    fn neg(self) -> Normal {
        Normal(-self.0)
    }
}

impl From<Normal> for Direction {
    #[inline]
    fn from(n: Normal) -> Direction {
        Direction(n.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_arithmetic() {
        let a = Vertex::new(1.0, 2.0, 3.0);
        let b = Vertex::new(0.0, 2.0, 1.0);
        assert_eq!(a - b, Vec3::new(1.0, 0.0, 2.0));
        assert_eq!(b + Vec3::X, Vertex::new(1.0, 2.0, 1.0));
        assert!((a.distance(b) - 5.0_f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_direction_is_unit() {
        let d = Direction::new(Vec3::new(3.0, 4.0, 0.0));
        assert!((d.length() - 1.0).abs() < 4.0 * f32::EPSILON);
        assert!((d.x - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_direction_stays_finite() {
        let d = Direction::new(Vec3::ZERO);
        assert!(d.is_finite());
        assert_eq!(d.vec(), Vec3::Z);
    }

    #[test]
    fn test_face_forward() {
        let n = Normal::new(Vec3::Z);
        assert_eq!(n.face_forward(Vec3::NEG_Z).vec(), Vec3::NEG_Z);
        assert_eq!(n.face_forward(Vec3::Z).vec(), Vec3::Z);
    }
}
