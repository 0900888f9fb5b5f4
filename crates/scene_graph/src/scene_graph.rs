//! # Scene Graph System
//!
//! The scene graph is the hierarchical model behind the editor: a tree of named
//! nodes where every node's [`Transform`] is relative to its parent. Shapes hang
//! off the tree as leaves or as intermediate nodes (a wheel can carry a hubcap).
//!
//! ## Key Concepts
//!
//! - **Arena storage**: all nodes live in one [`SceneGraph`], addressed by [`NodeId`]
//! - **Hierarchy**: ordered child lists plus a parent back-reference, kept consistent
//!   by the graph (a node never has two parents, the tree never contains a cycle)
//! - **Transformations**: local transforms compose top-down into global transforms
//! - **Shapes**: a closed set of geometry ([`Geometry`]) with containment tests
//!
//! Child order matters: later children are drawn on top of earlier ones and win
//! hit tests.

pub mod angle;
pub mod error;
pub mod node;
pub mod shape;
pub mod transform;

pub use angle::{normalize_degrees, wrap_angle};
pub use error::{Result, SceneError};
pub use node::{Node, NodeId, NodeKind};
pub use shape::{Geometry, Shape, ShapeKind, DEFAULT_CIRCLE_RADIUS, DEFAULT_COLOR};
pub use transform::Transform;

use glam::Vec2;
use log::{debug, warn};
use slotmap::SlotMap;

/// Owns every node of a scene and enforces the hierarchy invariants.
///
/// Nodes are created orphaned and linked with [`SceneGraph::add_child`].
/// Removing a node removes its whole subtree.
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: SlotMap<NodeId, Node>,
}

impl SceneGraph {
    /// Creates an empty scene graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an orphaned node and returns its id.
    ///
    /// Any hierarchy data already on `node` is discarded.
    pub fn insert(&mut self, mut node: Node) -> NodeId {
        node.parent = None;
        node.children.clear();
        let id = self.nodes.insert(node);
        debug!("created node {} ({id})", self.nodes[id].name());
        id
    }

    /// Creates an orphaned group node
    pub fn create_node(&mut self, name: impl Into<String>) -> NodeId {
        self.insert(Node::new(name))
    }

    /// Creates an orphaned rectangle of `size`
    pub fn create_rectangle(&mut self, name: impl Into<String>, size: Vec2) -> NodeId {
        self.insert(Node::shape(name, Shape::rectangle(size)))
    }

    /// Creates an orphaned circle of `radius`
    pub fn create_circle(&mut self, name: impl Into<String>, radius: f32) -> NodeId {
        self.insert(Node::shape(name, Shape::circle(radius)))
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over all nodes in arena order (not hierarchy order)
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter()
    }

    /// Attaches `child` as the last child of `parent`.
    ///
    /// If `child` currently belongs to another parent it is detached there
    /// first. Re-adding an existing direct child is a no-op. Attaching a node
    /// under itself or under one of its own descendants is rejected with
    /// [`SceneError::CyclicHierarchy`] and leaves the graph untouched.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.ensure_exists(parent)?;
        self.ensure_exists(child)?;

        if self.is_ancestor(child, parent) {
            warn!("rejected cyclic attach of {child} under {parent}");
            return Err(SceneError::CyclicHierarchy { parent, child });
        }

        let old_parent = self.nodes[child].parent;
        if old_parent == Some(parent) {
            return Ok(());
        }

        if let Some(old_parent) = old_parent {
            if let Some(old) = self.nodes.get_mut(old_parent) {
                old.children.retain(|id| *id != child);
            }
        }

        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);

        debug!(
            "attached {} ({child}) under {} ({parent})",
            self.nodes[child].name(),
            self.nodes[parent].name()
        );
        Ok(())
    }

    /// Detaches `child` from `parent`, leaving it orphaned in the arena.
    ///
    /// Comparison is by identity, so siblings sharing a name are unaffected.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.ensure_exists(parent)?;
        self.ensure_exists(child)?;

        if self.nodes[child].parent != Some(parent) {
            return Err(SceneError::NotAChild { parent, child });
        }

        self.nodes[child].parent = None;
        self.nodes[parent].children.retain(|id| *id != child);

        debug!("detached {child} from {parent}");
        Ok(())
    }

    /// Removes a node and all of its descendants from the graph.
    ///
    /// The node is first detached from its parent so the parent's remaining
    /// children are untouched. Returns the removed node itself.
    pub fn remove_node(&mut self, id: NodeId) -> Option<Node> {
        let parent = self.nodes.get(id)?.parent;
        if let Some(parent) = parent.and_then(|parent| self.nodes.get_mut(parent)) {
            parent.children.retain(|child| *child != id);
        }

        let mut pending: Vec<NodeId> = self.nodes[id].children.to_vec();
        while let Some(descendant) = pending.pop() {
            if let Some(node) = self.nodes.remove(descendant) {
                pending.extend(node.children.iter().copied());
            }
        }

        let mut removed = self.nodes.remove(id)?;
        removed.parent = None;
        removed.children.clear();
        debug!("removed node {} ({id}) and its subtree", removed.name());
        Some(removed)
    }

    /// Removes every node
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Gets the children of a node, empty for unknown ids
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|node| node.children())
            .unwrap_or_default()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|node| node.parent)
    }

    /// True iff `id`'s parent is exactly `candidate`
    pub fn has_parent(&self, id: NodeId, candidate: NodeId) -> bool {
        self.nodes
            .get(id)
            .is_some_and(|node| node.has_parent(candidate))
    }

    /// True iff `id` has no parent. Unknown ids count as orphaned.
    pub fn is_orphaned(&self, id: NodeId) -> bool {
        self.parent(id).is_none()
    }

    /// Determines if `ancestor` is `node` or one of its ancestors.
    ///
    /// Walks the parent chain iteratively, so arbitrarily deep hierarchies are fine.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Composes the local transforms from the root of `id`'s tree down to `id`.
    ///
    /// Recomputed on every call; cost is proportional to the node's depth.
    pub fn global_transform(&self, id: NodeId) -> Option<Transform> {
        let node = self.nodes.get(id)?;
        let mut global = *node.local_transform();
        let mut current = node.parent;
        while let Some(ancestor_id) = current {
            let ancestor = self.nodes.get(ancestor_id)?;
            global = Transform::combine(ancestor.local_transform(), &global);
            current = ancestor.parent;
        }
        Some(global)
    }

    /// Global transform of `id`'s parent, identity for orphans
    pub fn parent_global_transform(&self, id: NodeId) -> Transform {
        self.parent(id)
            .and_then(|parent| self.global_transform(parent))
            .unwrap_or_default()
    }

    /// Finds the first node with `name` in pre-order below (and including) `root`
    pub fn find_by_name(&self, root: NodeId, name: &str) -> Option<NodeId> {
        self.depth_first(root)
            .map(|(id, _)| id)
            .find(|id| self.nodes[*id].name() == name)
    }

    /// Pre-order traversal below (and including) `root`, yielding `(id, depth)`.
    ///
    /// Children are visited in insertion order. Unknown roots yield nothing.
    pub fn depth_first(&self, root: NodeId) -> DepthFirst<'_> {
        let stack = if self.contains(root) {
            vec![(root, 0)]
        } else {
            Vec::new()
        };
        DepthFirst { graph: self, stack }
    }

    fn ensure_exists(&self, id: NodeId) -> Result<()> {
        if self.nodes.contains_key(id) {
            Ok(())
        } else {
            Err(SceneError::NodeNotFound(id))
        }
    }
}

/// Pre-order iterator returned by [`SceneGraph::depth_first`].
#[derive(Debug)]
pub struct DepthFirst<'a> {
    graph: &'a SceneGraph,
    stack: Vec<(NodeId, usize)>,
}

impl Iterator for DepthFirst<'_> {
    type Item = (NodeId, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, depth) = self.stack.pop()?;
        let children = self.graph.children(id);
        self.stack
            .extend(children.iter().rev().map(|child| (*child, depth + 1)));
        Some((id, depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn car_scene() -> (SceneGraph, NodeId, NodeId, NodeId, NodeId) {
        let mut graph = SceneGraph::new();
        let root = graph.create_node("Root");
        let car = graph.create_node("Car");
        let body = graph.create_rectangle("Car_Body", Vec2::new(4.0, 1.5));
        let wheel = graph.create_circle("Car_FrontWheel", 0.6);
        graph
            .node_mut(wheel)
            .unwrap()
            .set_position(Vec2::new(1.5, -0.5));

        graph.add_child(root, car).unwrap();
        graph.add_child(car, body).unwrap();
        graph.add_child(body, wheel).unwrap();
        (graph, root, car, body, wheel)
    }

    #[test]
    fn test_scene_graph_creation() {
        let graph = SceneGraph::new();
        assert!(graph.is_empty());
        assert_eq!(graph.len(), 0);
    }

    #[test]
    fn test_add_child() {
        let mut graph = SceneGraph::new();
        let parent = graph.create_node("Parent");
        let child = graph.create_node("Child");

        assert!(graph.is_orphaned(child));
        graph.add_child(parent, child).unwrap();

        assert_eq!(graph.children(parent), &[child]);
        assert!(graph.has_parent(child, parent));
        assert!(!graph.is_orphaned(child));
        assert!(graph.is_orphaned(parent));
    }

    #[test]
    fn test_reparenting_detaches_from_old_parent() {
        let mut graph = SceneGraph::new();
        let parent_a = graph.create_node("A");
        let parent_b = graph.create_node("B");
        let x = graph.create_node("X");
        let sibling = graph.create_node("Sibling");

        graph.add_child(parent_a, x).unwrap();
        graph.add_child(parent_a, sibling).unwrap();
        let before = graph.children(parent_a).len();

        graph.add_child(parent_b, x).unwrap();

        assert!(!graph.children(parent_a).contains(&x));
        assert_eq!(graph.children(parent_a).len(), before - 1);
        assert_eq!(graph.children(parent_a), &[sibling]);
        assert!(graph.has_parent(x, parent_b));
        assert!(!graph.has_parent(x, parent_a));
    }

    #[test]
    fn test_duplicate_add_is_noop() {
        let mut graph = SceneGraph::new();
        let parent = graph.create_node("Parent");
        let child = graph.create_node("Child");
        let other = graph.create_node("Other");

        graph.add_child(parent, child).unwrap();
        graph.add_child(parent, other).unwrap();
        graph.add_child(parent, child).unwrap();

        assert_eq!(graph.children(parent), &[child, other]);
    }

    #[test]
    fn test_cannot_create_cycle() {
        let mut graph = SceneGraph::new();
        let node1 = graph.create_node("1");
        let node2 = graph.create_node("2");
        let node3 = graph.create_node("3");
        graph.add_child(node1, node2).unwrap();
        graph.add_child(node2, node3).unwrap();

        assert_eq!(
            graph.add_child(node3, node1),
            Err(SceneError::CyclicHierarchy {
                parent: node3,
                child: node1
            })
        );
        assert_eq!(
            graph.add_child(node1, node1),
            Err(SceneError::CyclicHierarchy {
                parent: node1,
                child: node1
            })
        );

        // Relationships should remain unchanged
        assert!(graph.is_orphaned(node1));
        assert!(graph.has_parent(node2, node1));
        assert!(graph.has_parent(node3, node2));
        assert!(graph.children(node3).is_empty());
    }

    #[test]
    fn test_remove_child_by_identity() {
        let mut graph = SceneGraph::new();
        let parent = graph.create_node("Parent");
        let first = graph.create_node("Twin");
        let second = graph.create_node("Twin");
        graph.add_child(parent, first).unwrap();
        graph.add_child(parent, second).unwrap();

        graph.remove_child(parent, first).unwrap();

        assert_eq!(graph.children(parent), &[second]);
        assert!(graph.is_orphaned(first));
        assert!(graph.contains(first));
    }

    #[test]
    fn test_remove_child_rejects_non_child() {
        let mut graph = SceneGraph::new();
        let parent = graph.create_node("Parent");
        let stranger = graph.create_node("Stranger");
        let owner = graph.create_node("Owner");
        graph.add_child(owner, stranger).unwrap();

        assert_eq!(
            graph.remove_child(parent, stranger),
            Err(SceneError::NotAChild {
                parent,
                child: stranger
            })
        );
        assert!(graph.has_parent(stranger, owner));
    }

    #[test]
    fn test_unknown_ids_are_reported() {
        let mut graph = SceneGraph::new();
        let parent = graph.create_node("Parent");
        let gone = graph.create_node("Gone");
        graph.remove_node(gone);

        assert_eq!(
            graph.add_child(parent, gone),
            Err(SceneError::NodeNotFound(gone))
        );
        assert_eq!(
            graph.remove_child(parent, gone),
            Err(SceneError::NodeNotFound(gone))
        );
        assert!(graph.global_transform(gone).is_none());
        assert!(graph.children(gone).is_empty());
    }

    #[test]
    fn test_remove_node_cascades_and_detaches() {
        let (mut graph, root, car, body, wheel) = car_scene();
        let other = graph.create_node("Other");
        graph.add_child(root, other).unwrap();

        let removed = graph.remove_node(car).unwrap();
        assert_eq!(removed.name(), "Car");
        assert!(removed.is_orphaned());

        assert_eq!(graph.children(root), &[other]);
        assert!(!graph.contains(car));
        assert!(!graph.contains(body));
        assert!(!graph.contains(wheel));
        assert!(graph.has_parent(other, root));
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_global_transform_composes_ancestors() {
        let (mut graph, _root, car, _body, wheel) = car_scene();

        let global = graph.global_transform(wheel).unwrap();
        assert!(global.position().abs_diff_eq(Vec2::new(1.5, -0.5), 1e-5));

        graph
            .node_mut(car)
            .unwrap()
            .set_position(Vec2::new(10.0, 0.0));
        let global = graph.global_transform(wheel).unwrap();
        assert!(global.position().abs_diff_eq(Vec2::new(11.5, -0.5), 1e-5));
    }

    #[test]
    fn test_global_transform_of_orphan_is_local() {
        let mut graph = SceneGraph::new();
        let node = graph.insert(Node::new("Lonely").with_position(Vec2::new(2.0, 3.0)));
        assert_eq!(
            graph.global_transform(node),
            Some(*graph.node(node).unwrap().local_transform())
        );
        assert_eq!(graph.parent_global_transform(node), Transform::identity());
    }

    #[test]
    fn test_global_transform_with_rotated_parent() {
        let (mut graph, _root, car, _body, wheel) = car_scene();
        graph.node_mut(car).unwrap().set_rotation(90.0);

        let global = graph.global_transform(wheel).unwrap();
        // (1.5, -0.5) rotated by 90° counter-clockwise
        assert!(global.position().abs_diff_eq(Vec2::new(0.5, 1.5), 1e-5));
        assert!((global.rotation() - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_depth_first_order() {
        let (mut graph, root, car, body, wheel) = car_scene();
        let roof = graph.create_rectangle("Car_Roof", Vec2::new(2.0, 1.2));
        graph.add_child(body, roof).unwrap();

        let visited: Vec<(NodeId, usize)> = graph.depth_first(root).collect();
        assert_eq!(
            visited,
            vec![(root, 0), (car, 1), (body, 2), (wheel, 3), (roof, 3)]
        );
    }

    #[test]
    fn test_find_by_name() {
        let (graph, root, _car, body, _wheel) = car_scene();
        assert_eq!(graph.find_by_name(root, "Car_Body"), Some(body));
        assert_eq!(graph.find_by_name(root, "Missing"), None);
    }

    #[test]
    fn test_insert_discards_stale_hierarchy() {
        let (mut graph, root, car, _body, _wheel) = car_scene();
        let copy = graph.node(car).unwrap().clone();
        let id = graph.insert(copy);

        assert!(graph.is_orphaned(id));
        assert!(graph.children(id).is_empty());
        assert_eq!(graph.children(root), &[car]);
    }
}
