//! Core types for the scene hierarchy
//!
//! - [`SceneNode`] - name, actor id, local/world transforms, render payload
//! - [`SceneGraph`] - arena owning every node; transform propagation and draw dispatch
//! - [`NodeKey`] - generational key to a node in the graph
//! - [`Scene`] - rooted graph with an actor id registry
//! - [`SceneObserver`] - update/draw hooks, with [`LogObserver`] as the stock implementation
//! - [`SceneError`] - structural and lookup errors

mod error;
mod node;
mod graph;
mod observer;
mod scene;

pub use error::{SceneError, StructuralViolation};
pub use node::{ActorId, MeshHandle, NodeFlags, SceneNode, NO_ACTOR};
pub use graph::{NodeKey, SceneGraph};
pub use observer::{LogObserver, SceneObserver};
pub use scene::{Scene, DEFAULT_ROOT_ID, DEFAULT_ROOT_NAME};

// Re-export commonly used math types for convenience
pub use scenegraph_math::{Affine3, DegenerateTransform, Mat4, Vec3, Vec4};
