//! Scene: a rooted graph plus an actor registry
//!
//! The Scene owns one [`SceneGraph`] with a single root node and maps actor
//! ids to node keys. The tree is the source of truth; the registry is an
//! index that is purged whenever a registered node leaves the tree.

use std::collections::{HashMap, HashSet};

use log::{debug, warn};

use crate::{
    ActorId, NodeKey, SceneError, SceneGraph, SceneNode, SceneObserver, StructuralViolation,
    NO_ACTOR,
};

/// Default name of the root node
pub const DEFAULT_ROOT_NAME: &str = "Root";
/// Default actor id of the root node
pub const DEFAULT_ROOT_ID: ActorId = 1;

/// A scene hierarchy with actor lookup
#[derive(Clone, Debug)]
pub struct Scene {
    graph: SceneGraph,
    root: NodeKey,
    actors: HashMap<ActorId, NodeKey>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create a scene whose root is named "Root" with id 1
    pub fn new() -> Self {
        Self::with_root(DEFAULT_ROOT_NAME, DEFAULT_ROOT_ID)
    }

    /// Create a scene with a custom root identity
    ///
    /// The root is not entered in the actor registry.
    pub fn with_root(name: impl Into<String>, id: ActorId) -> Self {
        let mut graph = SceneGraph::new();
        let root = graph.insert(SceneNode::new(name, id));
        Self {
            graph,
            root,
            actors: HashMap::new(),
        }
    }

    #[inline]
    pub fn root(&self) -> NodeKey {
        self.root
    }

    /// Read-only view of the underlying graph
    #[inline]
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn node(&self, key: NodeKey) -> Option<&SceneNode> {
        self.graph.get(key)
    }

    pub fn node_mut(&mut self, key: NodeKey) -> Option<&mut SceneNode> {
        self.graph.get_mut(key)
    }

    /// Number of registered actors
    #[inline]
    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    /// Key of the node registered under `id`
    pub fn find_actor(&self, id: ActorId) -> Option<NodeKey> {
        self.actors.get(&id).copied()
    }

    /// Node registered under `id`
    pub fn actor(&self, id: ActorId) -> Option<&SceneNode> {
        self.find_actor(id).and_then(|key| self.graph.get(key))
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut SceneNode> {
        let key = self.find_actor(id)?;
        self.graph.get_mut(key)
    }

    /// Add a detached node to the scene's arena without attaching it
    pub fn create_node(&mut self, node: SceneNode) -> NodeKey {
        self.graph.insert(node)
    }

    /// Attach `key` under the root and register it as actor `id`
    ///
    /// `NO_ACTOR` attaches without registering. Registering an id twice
    /// replaces the earlier entry.
    pub fn add_child(&mut self, id: ActorId, key: NodeKey) -> Result<(), SceneError> {
        self.graph.add_child(self.root, key)?;
        if id != NO_ACTOR {
            if let Some(previous) = self.actors.insert(id, key) {
                if previous != key {
                    warn!("Actor {} re-registered; previous node is no longer indexed", id);
                }
            }
        }
        Ok(())
    }

    /// Create `node`, attach it under the root and register it as `id`
    pub fn spawn(&mut self, id: ActorId, node: SceneNode) -> Result<NodeKey, SceneError> {
        let key = self.create_node(node);
        self.add_child(id, key)?;
        Ok(key)
    }

    /// Build sub-hierarchies: attach `child` under any node of the scene
    ///
    /// The child is not registered as an actor. The root cannot be a child.
    pub fn attach(&mut self, parent: NodeKey, child: NodeKey) -> Result<(), SceneError> {
        if child == self.root {
            return Err(StructuralViolation::RootNode.into());
        }
        self.graph.add_child(parent, child)
    }

    /// Unregister actor `id` and detach its node (with subtree) from the tree
    ///
    /// Returns the detached node's key; it can be reattached or destroyed.
    pub fn remove_child(&mut self, id: ActorId) -> Result<NodeKey, SceneError> {
        let key = self.find_actor(id).ok_or(SceneError::ActorNotFound(id))?;
        self.detach(key)?;
        Ok(key)
    }

    /// Detach `key` from its parent and unregister every actor in its subtree
    pub fn detach(&mut self, key: NodeKey) -> Result<(), SceneError> {
        if key == self.root {
            return Err(StructuralViolation::RootNode.into());
        }
        self.graph.detach(key)?;
        self.purge_subtree(key);
        Ok(())
    }

    /// Release `key` and its subtree, unregistering their actors
    ///
    /// Returns the number of nodes released.
    pub fn destroy(&mut self, key: NodeKey) -> Result<usize, SceneError> {
        if key == self.root {
            return Err(StructuralViolation::RootNode.into());
        }
        if !self.graph.contains(key) {
            return Err(SceneError::NodeNotFound(key));
        }
        self.purge_subtree(key);
        self.graph.destroy(key)
    }

    fn purge_subtree(&mut self, key: NodeKey) {
        let mut subtree: HashSet<NodeKey> = self.graph.descendants(key).into_iter().collect();
        subtree.insert(key);

        let before = self.actors.len();
        self.actors.retain(|_, k| !subtree.contains(k));
        let purged = before - self.actors.len();
        if purged > 0 {
            debug!("Unregistered {} actor(s)", purged);
        }
    }

    /// Propagate transforms from the root and dispatch draws
    pub fn update(&mut self, dt: f32, observer: &mut dyn SceneObserver) -> Result<(), SceneError> {
        self.graph.update(self.root, dt, observer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenegraph_math::{Mat4, Vec3};

    #[test]
    fn test_new_scene() {
        let scene = Scene::new();
        let root = scene.node(scene.root()).unwrap();
        assert_eq!(root.name(), "Root");
        assert_eq!(root.id(), 1);
        assert_eq!(scene.actor_count(), 0);
        assert_eq!(scene.graph().len(), 1);
    }

    #[test]
    fn test_with_root() {
        let scene = Scene::with_root("World", 100);
        assert_eq!(scene.node(scene.root()).unwrap().name(), "World");
        assert!(scene.find_actor(100).is_none());
    }

    #[test]
    fn test_add_child_registers() {
        let mut scene = Scene::new();
        let body = scene.create_node(SceneNode::new("body", 2));
        scene.add_child(2, body).unwrap();

        assert_eq!(scene.find_actor(2), Some(body));
        assert_eq!(scene.actor(2).map(|n| n.name()), Some("body"));
        assert_eq!(scene.graph().parent(body), Some(scene.root()));
        assert!(scene.find_actor(3).is_none());
    }

    #[test]
    fn test_no_actor_is_not_registered() {
        let mut scene = Scene::new();
        let key = scene.spawn(NO_ACTOR, SceneNode::new("anon", 0)).unwrap();
        assert_eq!(scene.actor_count(), 0);
        assert_eq!(scene.graph().children(scene.root()), &[key]);
    }

    #[test]
    fn test_reregister_replaces() {
        let mut scene = Scene::new();
        let first = scene.spawn(7, SceneNode::new("first", 7)).unwrap();
        let second = scene.spawn(7, SceneNode::new("second", 7)).unwrap();
        assert_ne!(first, second);
        assert_eq!(scene.find_actor(7), Some(second));
        assert_eq!(scene.actor_count(), 1);
    }

    #[test]
    fn test_add_child_already_attached() {
        let mut scene = Scene::new();
        let key = scene.spawn(2, SceneNode::new("body", 2)).unwrap();
        assert_eq!(
            scene.add_child(3, key),
            Err(SceneError::StructuralViolation(StructuralViolation::AlreadyAttached))
        );
        assert!(scene.find_actor(3).is_none());
    }

    #[test]
    fn test_remove_child_detaches_and_unregisters() {
        let mut scene = Scene::new();
        let body = scene.spawn(2, SceneNode::new("body", 2)).unwrap();
        let removed = scene.remove_child(2).unwrap();

        assert_eq!(removed, body);
        assert!(scene.find_actor(2).is_none());
        assert!(scene.graph().children(scene.root()).is_empty());
        assert!(scene.node(body).is_some());
    }

    #[test]
    fn test_remove_unknown_actor() {
        let mut scene = Scene::new();
        assert_eq!(scene.remove_child(9), Err(SceneError::ActorNotFound(9)));
    }

    #[test]
    fn test_detach_purges_nested_actors() {
        let mut scene = Scene::new();
        let body = scene.spawn(2, SceneNode::new("body", 2)).unwrap();
        let head = scene.spawn(4, SceneNode::new("head", 4)).unwrap();

        // Move head beneath body
        scene.detach(head).unwrap();
        scene.attach(body, head).unwrap();
        let other = scene.create_node(SceneNode::new("other", 9));
        scene.add_child(9, other).unwrap();
        assert!(scene.find_actor(4).is_none());

        scene.detach(body).unwrap();
        assert!(scene.find_actor(2).is_none());
        assert_eq!(scene.find_actor(9).map(|k| scene.node(k).unwrap().name()), Some("other"));
    }

    #[test]
    fn test_root_is_protected() {
        let mut scene = Scene::new();
        let root = scene.root();
        assert_eq!(
            scene.detach(root),
            Err(SceneError::StructuralViolation(StructuralViolation::RootNode))
        );
        assert_eq!(
            scene.destroy(root),
            Err(SceneError::StructuralViolation(StructuralViolation::RootNode))
        );
    }

    #[test]
    fn test_root_cannot_be_attached() {
        let mut scene = Scene::new();
        let root = scene.root();
        let body = scene.spawn(2, SceneNode::new("body", 2)).unwrap();
        let holder = scene.create_node(SceneNode::new("holder", 9));

        assert_eq!(
            scene.attach(holder, root),
            Err(SceneError::StructuralViolation(StructuralViolation::RootNode))
        );
        assert!(scene.graph().parent(root).is_none());

        // Destroying the would-be holder leaves the tree intact
        assert_eq!(scene.destroy(holder).unwrap(), 1);
        assert!(scene.graph().contains(root));
        assert_eq!(scene.find_actor(2), Some(body));
        assert!(scene.update(1.0, &mut ()).is_ok());
    }

    #[test]
    fn test_destroy_unregisters() {
        let mut scene = Scene::new();
        let body = scene.spawn(2, SceneNode::new("body", 2)).unwrap();
        let mesh = scene.create_node(SceneNode::mesh("body mesh", 3));
        scene.attach(body, mesh).unwrap();

        assert_eq!(scene.destroy(body).unwrap(), 2);
        assert!(scene.find_actor(2).is_none());
        assert_eq!(scene.graph().len(), 1);
        assert_eq!(scene.destroy(body), Err(SceneError::NodeNotFound(body)));
    }

    #[test]
    fn test_update_from_root() {
        let mut scene = Scene::new();
        let body = scene
            .spawn(2, SceneNode::new("body", 2).with_transform(Mat4::translation(Vec3::X)))
            .unwrap();
        scene.update(0.016, &mut ()).unwrap();

        let world = scene.node(body).unwrap().world_transform();
        assert_eq!(world.get_translation(), Vec3::X);
    }
}
