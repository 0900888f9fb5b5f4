//! # Scene Nodes
//!
//! A [`Node`] is a named entry in the [`SceneGraph`](crate::SceneGraph) arena. It
//! owns a local [`Transform`] and optional [`Shape`] geometry, and records its
//! place in the hierarchy as ids: an ordered child list and a parent back-reference.
//!
//! Hierarchy fields are only mutated through the arena so that parent and child
//! lists can never disagree.

use glam::{Vec2, Vec4};
use smallvec::SmallVec;
use std::fmt::{self, Display};

use crate::shape::{Shape, ShapeKind};
use crate::transform::Transform;

slotmap::new_key_type! {
    /// Stable handle to a node in a [`SceneGraph`](crate::SceneGraph).
    pub struct NodeId;
}

impl Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", slotmap::Key::data(self).as_ffi())
    }
}

/// What a node contributes to the scene besides its transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NodeKind {
    /// Pure container: traversed, never drawn or hit
    Group,
    /// Drawable, hit-testable geometry
    Shape(Shape),
}

/// A named, transformable entry in the scene hierarchy.
#[derive(Clone, Debug)]
pub struct Node {
    name: String,
    transform: Transform,
    kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: SmallVec<[NodeId; 4]>,
}

impl Node {
    /// Creates an orphaned group node
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_kind(name, NodeKind::Group)
    }

    /// Creates an orphaned node carrying `shape`
    pub fn shape(name: impl Into<String>, shape: Shape) -> Self {
        Self::with_kind(name, NodeKind::Shape(shape))
    }

    pub fn with_kind(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            transform: Transform::identity(),
            kind,
            parent: None,
            children: SmallVec::new(),
        }
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.transform.set_position(position);
        self
    }

    pub fn with_color(mut self, color: Vec4) -> Self {
        self.set_color(color);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn as_shape(&self) -> Option<&Shape> {
        match &self.kind {
            NodeKind::Shape(shape) => Some(shape),
            NodeKind::Group => None,
        }
    }

    pub fn as_shape_mut(&mut self) -> Option<&mut Shape> {
        match &mut self.kind {
            NodeKind::Shape(shape) => Some(shape),
            NodeKind::Group => None,
        }
    }

    pub fn is_shape(&self) -> bool {
        matches!(self.kind, NodeKind::Shape(_))
    }

    pub fn shape_kind(&self) -> Option<ShapeKind> {
        self.as_shape().map(Shape::kind)
    }

    /// Shape color; groups report `None`
    pub fn color(&self) -> Option<Vec4> {
        self.as_shape().map(|shape| shape.color)
    }

    /// Sets the shape color. Has no effect on group nodes.
    pub fn set_color(&mut self, color: Vec4) {
        if let Some(shape) = self.as_shape_mut() {
            shape.color = color;
        }
    }

    /// Parent id, `None` when orphaned
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in insertion order (back to front)
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// True iff this node's parent is exactly `candidate`
    pub fn has_parent(&self, candidate: NodeId) -> bool {
        self.parent == Some(candidate)
    }

    pub fn is_orphaned(&self) -> bool {
        self.parent.is_none()
    }

    pub fn local_transform(&self) -> &Transform {
        &self.transform
    }

    pub fn local_transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    pub fn set_local_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    pub fn position(&self) -> Vec2 {
        self.transform.position()
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.transform.set_position(position);
    }

    /// Rotation in degrees, `[0, 360)`
    pub fn rotation(&self) -> f32 {
        self.transform.rotation()
    }

    pub fn set_rotation(&mut self, degrees: f32) {
        self.transform.set_rotation(degrees);
    }

    pub fn scale(&self) -> Vec2 {
        self.transform.scale()
    }

    pub fn set_scale(&mut self, scale: Vec2) {
        self.transform.set_scale(scale);
    }

    /// Tests whether `point` falls inside this node's geometry.
    ///
    /// `point` must be expressed in the node's parent space: it is mapped
    /// through the inverse of the **local** transform only. Group nodes never
    /// contain points.
    pub fn contains_point(&self, point: Vec2) -> bool {
        match &self.kind {
            NodeKind::Shape(shape) => {
                let local = self.transform.inverse_transform_point(point);
                shape.geometry.contains_local(local)
            }
            NodeKind::Group => false,
        }
    }
}
