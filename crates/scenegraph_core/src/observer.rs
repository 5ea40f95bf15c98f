//! Traversal hooks
//!
//! The update pass reports every resolved node and every draw through a
//! [`SceneObserver`]. Renderers implement the trait and read the node's world
//! transform, model matrix and mesh handle in `on_draw`.

use log::{debug, trace};

use crate::{NodeKey, SceneNode};

/// Callbacks invoked by [`SceneGraph::update`](crate::SceneGraph::update)
pub trait SceneObserver {
    /// Called once per node, right after its world transform is resolved
    fn on_update(&mut self, _key: NodeKey, _node: &SceneNode, _dt: f32) {}

    /// Called for visible leaf nodes, after their subtree has been updated
    fn on_draw(&mut self, _key: NodeKey, _node: &SceneNode) {}
}

/// Observer that ignores every callback
impl SceneObserver for () {}

/// Observer that reports traversal through the `log` facade
#[derive(Clone, Copy, Debug, Default)]
pub struct LogObserver {
    /// Emit a trace line for every node update, not just draws
    pub log_updates: bool,
}

impl LogObserver {
    pub fn new(log_updates: bool) -> Self {
        Self { log_updates }
    }
}

impl SceneObserver for LogObserver {
    fn on_update(&mut self, _key: NodeKey, node: &SceneNode, dt: f32) {
        if self.log_updates {
            trace!("Update {} (actor {}, dt = {})", node.name(), node.id(), dt);
        }
    }

    fn on_draw(&mut self, _key: NodeKey, node: &SceneNode) {
        debug!("Draw {}", node.name());
    }
}
