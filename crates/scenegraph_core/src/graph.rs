//! Node arena and hierarchical transform propagation
//!
//! The SceneGraph owns every node. Parent and child links are [`NodeKey`]s
//! into the arena, so a removed node can never be reached through a stale
//! link: the key simply stops resolving.

use log::{debug, trace};
use scenegraph_math::Mat4;
use slotmap::{new_key_type, SlotMap};

use crate::{ActorId, SceneError, SceneNode, SceneObserver, StructuralViolation};

new_key_type! {
    /// Key to a node in the scene graph
    ///
    /// Generational: once a node is destroyed, old keys return None instead
    /// of aliasing whatever node reuses the slot.
    pub struct NodeKey;
}

/// Arena of scene nodes linked into a forest
#[derive(Clone, Debug, Default)]
pub struct SceneGraph {
    nodes: SlotMap<NodeKey, SceneNode>,
}

impl SceneGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
        }
    }

    /// Insert a node as a detached root and return its key
    ///
    /// Any parent or child links the node carried are cleared.
    pub fn insert(&mut self, mut node: SceneNode) -> NodeKey {
        node.parent = None;
        node.children.clear();
        self.nodes.insert(node)
    }

    #[inline]
    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    #[inline]
    pub fn get(&self, key: NodeKey) -> Option<&SceneNode> {
        self.nodes.get(key)
    }

    /// Mutable access to a node's data. Tree links stay under graph control.
    #[inline]
    pub fn get_mut(&mut self, key: NodeKey) -> Option<&mut SceneNode> {
        self.nodes.get_mut(key)
    }

    /// Number of live nodes, attached or not
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over every live node
    pub fn iter(&self) -> impl Iterator<Item = (NodeKey, &SceneNode)> {
        self.nodes.iter()
    }

    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.nodes.get(key).and_then(|node| node.parent)
    }

    /// Child keys in attachment order (empty for unknown keys)
    pub fn children(&self, key: NodeKey) -> &[NodeKey] {
        self.nodes
            .get(key)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// First direct child of `parent` carrying actor id `id`
    pub fn find_child(&self, parent: NodeKey, id: ActorId) -> Option<NodeKey> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&child| self.nodes.get(child).is_some_and(|node| node.id() == id))
    }

    /// True if `ancestor` lies strictly above `node`
    pub fn is_ancestor(&self, ancestor: NodeKey, node: NodeKey) -> bool {
        let mut current = self.parent(node);
        while let Some(key) = current {
            if key == ancestor {
                return true;
            }
            current = self.parent(key);
        }
        false
    }

    /// Every node below `key`, in pre-order (excluding `key` itself)
    pub fn descendants(&self, key: NodeKey) -> Vec<NodeKey> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeKey> = self.children(key).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Attach `child` as the last child of `parent`
    pub fn add_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<(), SceneError> {
        if !self.nodes.contains_key(parent) {
            return Err(SceneError::NodeNotFound(parent));
        }
        let child_node = self.nodes.get(child).ok_or(SceneError::NodeNotFound(child))?;

        if parent == child {
            return Err(StructuralViolation::SelfAttachment.into());
        }
        if child_node.parent.is_some() {
            return Err(StructuralViolation::AlreadyAttached.into());
        }
        if self.is_ancestor(child, parent) {
            return Err(StructuralViolation::WouldCreateCycle.into());
        }

        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
        Ok(())
    }

    /// Detach the first direct child of `parent` with actor id `id`
    ///
    /// The child keeps its own subtree and stays in the graph as a detached
    /// root. Remaining siblings keep their order.
    pub fn remove_child(&mut self, parent: NodeKey, id: ActorId) -> Result<NodeKey, SceneError> {
        if !self.nodes.contains_key(parent) {
            return Err(SceneError::NodeNotFound(parent));
        }
        let child = self
            .find_child(parent, id)
            .ok_or(SceneError::ChildNotFound { parent, id })?;

        self.unlink(parent, child);
        debug!("Removed {} from {}", self.nodes[child].name(), self.nodes[parent].name());
        Ok(child)
    }

    /// Detach `key` from its parent. A node without a parent is left alone.
    pub fn detach(&mut self, key: NodeKey) -> Result<(), SceneError> {
        let node = self.nodes.get(key).ok_or(SceneError::NodeNotFound(key))?;
        if let Some(parent) = node.parent {
            self.unlink(parent, key);
            debug!("Detached {}", self.nodes[key].name());
        }
        Ok(())
    }

    fn unlink(&mut self, parent: NodeKey, child: NodeKey) {
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            if let Some(pos) = parent_node.children.iter().position(|&c| c == child) {
                parent_node.children.remove(pos);
            }
        }
        if let Some(child_node) = self.nodes.get_mut(child) {
            child_node.parent = None;
        }
    }

    /// Detach `key` and release it together with its whole subtree
    ///
    /// Returns the number of nodes released.
    pub fn destroy(&mut self, key: NodeKey) -> Result<usize, SceneError> {
        self.detach(key)?;
        let mut doomed = self.descendants(key);
        doomed.push(key);
        for &k in &doomed {
            self.nodes.remove(k);
        }
        debug!("Destroyed {} node(s)", doomed.len());
        Ok(doomed.len())
    }

    /// Inverse of the cached world transform (world space to node space)
    pub fn world_to_local(&self, key: NodeKey) -> Result<Mat4, SceneError> {
        let node = self.nodes.get(key).ok_or(SceneError::NodeNotFound(key))?;
        Ok(node.world_transform().try_inverse()?)
    }

    /// True if `key` or any of its ancestors is hidden
    fn hidden_in_tree(&self, key: NodeKey) -> bool {
        let mut current = Some(key);
        while let Some(k) = current {
            match self.nodes.get(k) {
                Some(node) if node.is_hidden() => return true,
                Some(node) => current = node.parent,
                None => return false,
            }
        }
        false
    }

    /// Recompute world transforms for the subtree at `key` and dispatch draws
    ///
    /// Each node's world transform becomes `parent.world * local` (or `local`
    /// for a root), using the parent's cached world transform. Children are
    /// visited in order; after a child's subtree is done, the child is drawn
    /// if it is a visible leaf. `key` itself is drawn last under the same rule.
    pub fn update(
        &mut self,
        key: NodeKey,
        dt: f32,
        observer: &mut dyn SceneObserver,
    ) -> Result<(), SceneError> {
        let node = self.nodes.get(key).ok_or(SceneError::NodeNotFound(key))?;
        let parent_world = node
            .parent
            .and_then(|parent| self.nodes.get(parent))
            .map(|parent| *parent.world_transform());
        let parent_visible = match node.parent {
            Some(parent) => !self.hidden_in_tree(parent),
            None => true,
        };

        let visible = self.update_node(key, parent_world, parent_visible, dt, observer);

        let node = &self.nodes[key];
        if visible && node.is_leaf() {
            observer.on_draw(key, node);
        }
        Ok(())
    }

    /// Returns whether the node is visible
    fn update_node(
        &mut self,
        key: NodeKey,
        parent_world: Option<Mat4>,
        parent_visible: bool,
        dt: f32,
        observer: &mut dyn SceneObserver,
    ) -> bool {
        let Some(node) = self.nodes.get_mut(key) else {
            return false;
        };
        let world = match parent_world {
            Some(parent_world) => parent_world * *node.local_transform(),
            None => *node.local_transform(),
        };
        node.set_world_transform(world);
        let visible = parent_visible && !node.is_hidden();

        trace!("Resolved world transform for {}", node.name());
        observer.on_update(key, node, dt);

        let mut index = 0;
        while let Some(child) = self.nodes.get(key).and_then(|n| n.children.get(index).copied()) {
            let child_visible = self.update_node(child, Some(world), visible, dt, observer);
            if let Some(child_node) = self.nodes.get(child) {
                if child_visible && child_node.is_leaf() {
                    observer.on_draw(child, child_node);
                }
            }
            index += 1;
        }

        visible
    }
}
