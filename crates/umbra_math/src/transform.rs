// Affine transforms for ray tracing.
//
// A Transform keeps the forward matrix together with its inverse and the
// inverse-transpose of the linear part, so vertices, directions, normals,
// rays and boxes can each be moved with the right rule.

use std::ops::Mul;

use glam::{Mat3, Mat4, Vec3, Vec4};
use thiserror::Error;

use crate::{Aabb, Direction, Normal, Ray, Vertex};

/// Errors raised when building a transform.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("transform matrix is singular (determinant {0})")]
    Singular(f32),

    #[error("look-at is degenerate: eye and target coincide or up is parallel to the view direction")]
    DegenerateLookAt,
}

/// An affine transform with its inverse and inverse-transpose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    matrix: Mat4,
    inverse: Mat4,
    inverse_transpose: Mat3,
}

/// Values that can be carried through a [`Transform`].
pub trait Transformable: Sized {
    fn transformed(self, transform: &Transform) -> Self;
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        matrix: Mat4::IDENTITY,
        inverse: Mat4::IDENTITY,
        inverse_transpose: Mat3::IDENTITY,
    };

    /// Build a transform from an affine matrix, rejecting singular matrices.
    pub fn new(matrix: Mat4) -> Result<Self, TransformError> {
        let det = matrix.determinant();
        if !det.is_finite() || det.abs() < 1.0e-8 {
            return Err(TransformError::Singular(det));
        }
        Ok(Self::from_parts(matrix, matrix.inverse()))
    }

    /// Build from a matrix and its already known inverse.
    fn from_parts(matrix: Mat4, inverse: Mat4) -> Self {
        Self {
            matrix,
            inverse,
            inverse_transpose: Mat3::from_mat4(inverse).transpose(),
        }
    }

    pub fn translate(tx: f32, ty: f32, tz: f32) -> Self {
        let t = Vec3::new(tx, ty, tz);
        Self::from_parts(Mat4::from_translation(t), Mat4::from_translation(-t))
    }

    pub fn rotate_x(radians: f32) -> Self {
        let m = Mat4::from_rotation_x(radians);
        Self::from_parts(m, m.transpose())
    }

    pub fn rotate_y(radians: f32) -> Self {
        let m = Mat4::from_rotation_y(radians);
        Self::from_parts(m, m.transpose())
    }

    pub fn rotate_z(radians: f32) -> Self {
        let m = Mat4::from_rotation_z(radians);
        Self::from_parts(m, m.transpose())
    }

    /// Rotate about x by `quarters · π/2`. Entries are exactly 0 or ±1.
    pub fn rotate_x_quarters(quarters: i32) -> Self {
        let (c, s) = quarter_turn(quarters);
        let m = Mat4::from_cols(
            Vec4::X,
            Vec4::new(0.0, c, s, 0.0),
            Vec4::new(0.0, -s, c, 0.0),
            Vec4::W,
        );
        Self::from_parts(m, m.transpose())
    }

    /// Rotate about y by `quarters · π/2`. Entries are exactly 0 or ±1.
    pub fn rotate_y_quarters(quarters: i32) -> Self {
        let (c, s) = quarter_turn(quarters);
        let m = Mat4::from_cols(
            Vec4::new(c, 0.0, -s, 0.0),
            Vec4::Y,
            Vec4::new(s, 0.0, c, 0.0),
            Vec4::W,
        );
        Self::from_parts(m, m.transpose())
    }

    /// Rotate about z by `quarters · π/2`. Entries are exactly 0 or ±1.
    pub fn rotate_z_quarters(quarters: i32) -> Self {
        let (c, s) = quarter_turn(quarters);
        let m = Mat4::from_cols(
            Vec4::new(c, s, 0.0, 0.0),
            Vec4::new(-s, c, 0.0, 0.0),
            Vec4::Z,
            Vec4::W,
        );
        Self::from_parts(m, m.transpose())
    }

    /// Camera-to-world transform for a camera at `from` looking at `to`.
    ///
    /// Right-handed: the camera looks along -z, +x is right and +y is up.
    pub fn look_at(from: Vertex, to: Vertex, up: Vec3) -> Result<Self, TransformError> {
        let forward = (to - from)
            .try_normalize()
            .ok_or(TransformError::DegenerateLookAt)?;
        let right = forward
            .cross(up)
            .try_normalize()
            .ok_or(TransformError::DegenerateLookAt)?;
        let true_up = right.cross(forward);

        let rotation = Mat3::from_cols(right, true_up, -forward);
        let matrix = Mat4::from_cols(
            rotation.x_axis.extend(0.0),
            rotation.y_axis.extend(0.0),
            rotation.z_axis.extend(0.0),
            from.0.extend(1.0),
        );
        let inv_rotation = rotation.transpose();
        let inverse = Mat4::from_cols(
            inv_rotation.x_axis.extend(0.0),
            inv_rotation.y_axis.extend(0.0),
            inv_rotation.z_axis.extend(0.0),
            (-(inv_rotation * from.0)).extend(1.0),
        );
        Ok(Self::from_parts(matrix, inverse))
    }

    pub fn matrix(&self) -> &Mat4 {
        &self.matrix
    }

    pub fn inverse_matrix(&self) -> &Mat4 {
        &self.inverse
    }

    /// The inverse transform; swaps forward and inverse matrices.
    pub fn inverse(&self) -> Transform {
        Self::from_parts(self.inverse, self.matrix)
    }

    /// Whether the linear part is a proper rotation (orthonormal, det +1),
    /// i.e. the transform preserves lengths and angles.
    pub fn is_rigid(&self) -> bool {
        let linear = Mat3::from_mat4(self.matrix);
        let gram = linear.transpose() * linear;
        let tolerance = 1.0e-4;
        gram.abs_diff_eq(Mat3::IDENTITY, tolerance)
            && (linear.determinant() - 1.0).abs() < tolerance
    }

    /// Apply the transform to anything [`Transformable`].
    #[inline]
    pub fn apply<T: Transformable>(&self, value: T) -> T {
        value.transformed(self)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// `(A * B).apply(x) == A.apply(B.apply(x))`
impl Mul for Transform {
    type Output = Transform;

    fn mul(self, rhs: Transform) -> Transform {
        Transform::from_parts(self.matrix * rhs.matrix, rhs.inverse * self.inverse)
    }
}

impl Transformable for Vertex {
    #[inline]
    fn transformed(self, t: &Transform) -> Vertex {
        Vertex(t.matrix.transform_point3(self.0))
    }
}

/// Directions skip translation and are not re-normalised; callers keep
/// transforms rigid wherever unit length matters.
impl Transformable for Direction {
    #[inline]
    fn transformed(self, t: &Transform) -> Direction {
        Direction::new_unchecked(t.matrix.transform_vector3(self.vec()))
    }
}

impl Transformable for Normal {
    #[inline]
    fn transformed(self, t: &Transform) -> Normal {
        Normal::new(t.inverse_transpose * self.vec())
    }
}

impl Transformable for Ray {
    #[inline]
    fn transformed(self, t: &Transform) -> Ray {
        Ray::with_t_max(t.apply(self.origin), t.apply(self.direction), self.t_max)
    }
}

impl Transformable for Aabb {
    fn transformed(self, t: &Transform) -> Aabb {
        if self.is_empty() {
            return self;
        }
        let mut lo = Vec3::splat(f32::INFINITY);
        let mut hi = Vec3::splat(f32::NEG_INFINITY);
        for corner in self.corners() {
            let p = t.matrix.transform_point3(corner);
            lo = lo.min(p);
            hi = hi.max(p);
        }
        Aabb::from_points(lo, hi)
    }
}

fn quarter_turn(quarters: i32) -> (f32, f32) {
    match quarters.rem_euclid(4) {
        0 => (1.0, 0.0),
        1 => (0.0, 1.0),
        2 => (-1.0, 0.0),
        _ => (0.0, -1.0),
    }
}
