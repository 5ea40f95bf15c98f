//! Scene hierarchy with transform propagation
//!
//! Umbrella crate over the workspace:
//!
//! - [`scenegraph_math`] - vectors, [`Affine3`], [`Mat4`]
//! - [`scenegraph_core`] - [`SceneNode`], [`SceneGraph`], [`Scene`] and the observer hooks
//! - [`config`] - layered configuration and logger setup
//!
//! The most used types are re-exported at the crate root.

pub mod config;

pub use scenegraph_core;
pub use scenegraph_math;

pub use scenegraph_core::{
    ActorId, LogObserver, MeshHandle, NodeFlags, NodeKey, Scene, SceneError, SceneGraph,
    SceneNode, SceneObserver, StructuralViolation, NO_ACTOR,
};
pub use scenegraph_math::{Affine3, DegenerateTransform, Mat4, Ray3, Vec2, Vec3, Vec4};
