//! Numeric foundation for the umbra renderer.
//!
//! Re-exports glam and layers the ray tracing vocabulary on top of it:
//! role-tagged vectors, rays, affine transforms, bounding boxes, the
//! quadratic solver and the shape-space intersection primitives.

pub use glam::*;

mod aabb;
mod frame;
mod interval;
mod primitives;
mod quadratic;
mod ray;
mod transform;
mod vector;

pub use aabb::Aabb;
pub use frame::Frame;
pub use interval::Interval;
pub use primitives::{
    intersect_cylinder, intersect_disc, intersect_plane, intersect_rectangle, intersect_sphere,
};
pub use quadratic::solve_quadratic;
pub use ray::Ray;
pub use transform::{Transform, TransformError, Transformable};
pub use vector::{Direction, Normal, Vertex};

/// Smallest accepted ray parameter. Hits closer than this are treated as
/// self-intersections with the surface the ray left from.
pub const EPSILON_T: f32 = 1.0e-4;

/// Machine epsilon of the unit type.
pub const EPSILON: f32 = f32::EPSILON;
