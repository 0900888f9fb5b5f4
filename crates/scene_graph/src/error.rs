use thiserror::Error;

use crate::node::NodeId;

/// Errors raised by hierarchy mutations on a [`SceneGraph`](crate::SceneGraph).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("node {0} does not exist in the scene graph")]
    NodeNotFound(NodeId),

    #[error("attaching node {child} under {parent} would create a cyclic hierarchy")]
    CyclicHierarchy { parent: NodeId, child: NodeId },

    #[error("node {child} is not a child of node {parent}")]
    NotAChild { parent: NodeId, child: NodeId },
}

pub type Result<T, E = SceneError> = std::result::Result<T, E>;
