//! Scene nodes
//!
//! A SceneNode is one spatial element of the hierarchy: an identity, a local
//! transform relative to its parent, and the world transform cached by the
//! last update pass.

use bitflags::bitflags;
use scenegraph_math::{Affine3, Mat4, Vec3};

use crate::NodeKey;

/// Externally assigned identifier used to look nodes up by actor
pub type ActorId = u32;

/// Actor id meaning "do not register this node"
pub const NO_ACTOR: ActorId = 0;

bitflags! {
    /// Per-node behaviour flags
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct NodeFlags: u8 {
        /// No flags
        const NONE = 0;
        /// The node emits a draw call during traversal
        const LEAF = 1 << 0;
        /// The node and its subtree are updated but never drawn
        const HIDDEN = 1 << 1;
    }
}

/// Opaque handle to a renderable owned by the host renderer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u64);

impl MeshHandle {
    /// Get the raw id of this handle
    #[inline]
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// A node in the scene hierarchy
///
/// Nodes are created detached and live inside a [`SceneGraph`](crate::SceneGraph),
/// which owns them and links them together by [`NodeKey`].
#[derive(Clone, Debug)]
pub struct SceneNode {
    name: String,
    id: ActorId,
    /// Transform relative to the parent
    local: Mat4,
    /// Transform relative to the root, written by the update pass
    world: Mat4,
    scale: Vec3,
    radius: f32,
    flags: NodeFlags,
    mesh: Option<MeshHandle>,
    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,
}

impl SceneNode {
    /// Create a detached, non-drawing node with identity transforms
    pub fn new(name: impl Into<String>, id: ActorId) -> Self {
        Self {
            name: name.into(),
            id,
            local: Mat4::IDENTITY,
            world: Mat4::IDENTITY,
            scale: Vec3::ONE,
            radius: 0.0,
            flags: NodeFlags::NONE,
            mesh: None,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Create a leaf node that is drawn during traversal
    pub fn mesh(name: impl Into<String>, id: ActorId) -> Self {
        let mut node = Self::new(name, id);
        node.flags.insert(NodeFlags::LEAF);
        node
    }

    /// Builder-style local transform
    pub fn with_transform(mut self, local: Mat4) -> Self {
        self.local = local;
        self
    }

    /// Builder-style mesh payload
    pub fn with_mesh(mut self, mesh: MeshHandle) -> Self {
        self.mesh = Some(mesh);
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn id(&self) -> ActorId {
        self.id
    }

    #[inline]
    pub fn local_transform(&self) -> &Mat4 {
        &self.local
    }

    /// Replace the local transform
    #[inline]
    pub fn set_transform(&mut self, local: Mat4) {
        self.local = local;
    }

    /// Replace the local transform from an affine matrix
    pub fn set_affine_transform(&mut self, local: &Affine3) {
        self.local = Mat4::from(*local);
    }

    /// World transform as of the last update
    #[inline]
    pub fn world_transform(&self) -> &Mat4 {
        &self.world
    }

    #[inline]
    pub(crate) fn set_world_transform(&mut self, world: Mat4) {
        self.world = world;
    }

    #[inline]
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Set the render scale. Not inherited by children.
    #[inline]
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius;
    }

    #[inline]
    pub fn flags(&self) -> NodeFlags {
        self.flags
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.flags.contains(NodeFlags::LEAF)
    }

    pub fn set_leaf(&mut self, leaf: bool) {
        self.flags.set(NodeFlags::LEAF, leaf);
    }

    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.flags.contains(NodeFlags::HIDDEN)
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.flags.set(NodeFlags::HIDDEN, hidden);
    }

    #[inline]
    pub fn mesh_handle(&self) -> Option<MeshHandle> {
        self.mesh
    }

    pub fn set_mesh(&mut self, mesh: Option<MeshHandle>) {
        self.mesh = mesh;
    }

    /// Parent key, `None` for a root or detached node
    #[inline]
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    /// Child keys in attachment order
    #[inline]
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    /// Matrix the renderer should draw with: world transform with the node's
    /// own scale applied first
    pub fn model_matrix(&self) -> Mat4 {
        self.world * Mat4::scale(self.scale)
    }

    /// World-space bounding sphere as (center, radius)
    pub fn bounding_sphere(&self) -> (Vec3, f32) {
        (self.world.get_translation(), self.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults() {
        let node = SceneNode::new("body", 2);
        assert_eq!(node.name(), "body");
        assert_eq!(node.id(), 2);
        assert_eq!(node.scale(), Vec3::ONE);
        assert_eq!(node.radius(), 0.0);
        assert_eq!(*node.local_transform(), Mat4::IDENTITY);
        assert!(!node.is_leaf());
        assert!(!node.is_hidden());
        assert!(node.parent().is_none());
        assert!(node.children().is_empty());
        assert!(node.mesh_handle().is_none());
    }

    #[test]
    fn test_mesh_is_leaf() {
        let node = SceneNode::mesh("head mesh", 5).with_mesh(MeshHandle(7));
        assert!(node.is_leaf());
        assert_eq!(node.mesh_handle().map(|m| m.id()), Some(7));
    }

    #[test]
    fn test_flags() {
        let mut node = SceneNode::new("n", 1);
        node.set_leaf(true);
        node.set_hidden(true);
        assert_eq!(node.flags(), NodeFlags::LEAF | NodeFlags::HIDDEN);

        node.set_leaf(false);
        assert!(!node.is_leaf());
        assert!(node.is_hidden());
    }

    #[test]
    fn test_affine_transform() {
        let mut node = SceneNode::new("n", 1);
        node.set_affine_transform(&Affine3::from_translation(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(*node.local_transform(), Mat4::translation(Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_model_matrix_and_bounds() {
        let mut node = SceneNode::mesh("n", 1);
        node.set_world_transform(Mat4::translation(Vec3::new(0.0, 0.0, 5.0)));
        node.set_scale(Vec3::new(2.0, 2.0, 2.0));
        node.set_radius(1.5);

        let corner = node.model_matrix().transform_point(Vec3::ONE);
        assert_eq!(corner, Vec3::new(2.0, 2.0, 7.0));

        let (center, radius) = node.bounding_sphere();
        assert_eq!(center, Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(radius, 1.5);
    }
}
