//! 3D Mathematics Library
//!
//! This crate provides the vector and matrix types used by the scene graph.
//!
//! ## Core Types
//!
//! - [`Vec2`], [`Vec3`], [`Vec4`] - vectors (`Vec4` doubles as a homogeneous point/direction)
//! - [`Ray3`] - origin + direction
//! - [`Affine3`] - 3x4 affine transform with local/global incremental updates
//! - [`Mat4`] - 4x4 homogeneous matrix (column-major)
//!
//! ## Errors
//!
//! Operations that can degenerate (inverting a singular matrix, normalizing a
//! zero vector, an empty projection depth range) have an unchecked form that
//! lets infinities and NaNs propagate, and a `try_*` form returning
//! [`DegenerateTransform`].

mod error;
mod vec2;
mod vec3;
mod vec4;
mod ray;
mod affine;
mod mat4;

pub use error::DegenerateTransform;
pub use vec2::Vec2;
pub use vec3::Vec3;
pub use vec4::Vec4;
pub use ray::Ray3;
pub use affine::Affine3;
pub use mat4::Mat4;

/// Squared length at or below which guarded normalization leaves a vector unchanged
pub const NORMALIZE_EPSILON: f32 = 1e-5;
