//! Scene error types
//!
//! Errors returned by structural operations on the scene graph and the actor
//! registry. Numerical failures from the math crate are wrapped as
//! [`SceneError::Degenerate`].

use std::fmt;

use scenegraph_math::DegenerateTransform;

use crate::{ActorId, NodeKey};

/// A request that would break the tree shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralViolation {
    /// The child already has a parent; detach it first
    AlreadyAttached,
    /// A node cannot be its own child
    SelfAttachment,
    /// The child is an ancestor of the requested parent
    WouldCreateCycle,
    /// The scene root cannot be detached or destroyed
    RootNode,
}

impl fmt::Display for StructuralViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructuralViolation::AlreadyAttached => write!(f, "node already has a parent"),
            StructuralViolation::SelfAttachment => write!(f, "node cannot be attached to itself"),
            StructuralViolation::WouldCreateCycle => {
                write!(f, "attaching an ancestor beneath its descendant would create a cycle")
            }
            StructuralViolation::RootNode => write!(f, "operation not allowed on the scene root"),
        }
    }
}

/// Error type for scene graph operations
#[derive(Debug, Clone, PartialEq)]
pub enum SceneError {
    /// The key does not refer to a live node
    NodeNotFound(NodeKey),
    /// No direct child of `parent` carries actor id `id`
    ChildNotFound {
        parent: NodeKey,
        id: ActorId,
    },
    /// No node is registered under this actor id
    ActorNotFound(ActorId),
    /// The operation would break the tree shape
    StructuralViolation(StructuralViolation),
    /// A transform could not be inverted
    Degenerate(DegenerateTransform),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::NodeNotFound(key) => write!(f, "Scene node not found: {:?}", key),
            SceneError::ChildNotFound { parent, id } => {
                write!(f, "No child with actor id {} under node {:?}", id, parent)
            }
            SceneError::ActorNotFound(id) => write!(f, "Actor not registered: {}", id),
            SceneError::StructuralViolation(violation) => {
                write!(f, "Structural violation: {}", violation)
            }
            SceneError::Degenerate(err) => write!(f, "Degenerate transform: {}", err),
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneError::Degenerate(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StructuralViolation> for SceneError {
    fn from(violation: StructuralViolation) -> Self {
        SceneError::StructuralViolation(violation)
    }
}

impl From<DegenerateTransform> for SceneError {
    fn from(err: DegenerateTransform) -> Self {
        SceneError::Degenerate(err)
    }
}
