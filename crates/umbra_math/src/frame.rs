use glam::{Mat3, Vec3};

use crate::Normal;

/// Right-handed orthonormal frame whose z-axis is a given unit vector.
///
/// Stores the frame-to-world matrix; world-to-frame is its transpose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    to_world: Mat3,
}

impl Frame {
    /// Build a frame around `n`. Starts from world x and switches to world y
    /// when `n` is nearly aligned with x.
    pub fn from_normal(n: Normal) -> Self {
        let z = n.vec();
        let seed = if z.x.abs() > 0.9 { Vec3::Y } else { Vec3::X };
        let s = (seed - z * seed.dot(z)).normalize();
        let t = z.cross(s);
        Self {
            to_world: Mat3::from_cols(s, t, z),
        }
    }

    #[inline]
    pub fn s(&self) -> Vec3 {
        self.to_world.x_axis
    }

    #[inline]
    pub fn t(&self) -> Vec3 {
        self.to_world.y_axis
    }

    #[inline]
    pub fn n(&self) -> Vec3 {
        self.to_world.z_axis
    }

    /// World vector into frame coordinates.
    #[inline]
    pub fn to_local(&self, v: Vec3) -> Vec3 {
        Vec3::new(v.dot(self.s()), v.dot(self.t()), v.dot(self.n()))
    }

    /// Frame coordinates back into world space.
    #[inline]
    pub fn to_world(&self, v: Vec3) -> Vec3 {
        self.to_world * v
    }

    pub fn to_world_matrix(&self) -> Mat3 {
        self.to_world
    }

    pub fn to_local_matrix(&self) -> Mat3 {
        self.to_world.transpose()
    }
}
