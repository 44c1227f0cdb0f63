use crate::errors::BlockDocError;
use crate::list::{Handle, List};

/// Stable reference to a node of a [`Tree`](super::Tree)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl NodeId {
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub(crate) fn stale(&self) -> BlockDocError {
        BlockDocError::StaleNode {
            index: self.index,
            generation: self.generation,
        }
    }
}

/// A tree node: parent link, child list and payload
///
/// Leaves carry no child list at all (`children` is `None`) rather than an
/// empty one. `list_handle` locates this node inside its parent's child list;
/// it is `None` only for the root.
#[derive(Debug, Clone)]
pub struct TreeNode<T> {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Option<List<NodeId>>,
    pub(crate) list_handle: Option<Handle>,
    pub(crate) value: Option<T>,
}

impl<T> TreeNode<T> {
    pub(crate) fn new(parent: Option<NodeId>, value: Option<T>) -> Self {
        Self {
            parent,
            children: None,
            list_handle: None,
            value,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> Option<&List<NodeId>> {
        self.children.as_ref()
    }

    pub fn list_handle(&self) -> Option<Handle> {
        self.list_handle
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}
