//! Single-rooted ordered forest
//!
//! Nodes live in a slot arena addressed by [`NodeId`]. Each node's children
//! form a [`List`] of ids, and every non-root node remembers the list handle
//! that locates it inside its parent's child list, giving O(1) sibling
//! insertion, relocation and removal.
//!
//! The tree knows nothing about checksums; whoever issues a structural edit
//! is responsible for refreshing any aggregates kept in the payloads.

pub mod node;
pub mod traversal;

use crate::errors::{BlockDocError, Result};
use crate::list::{Handle, List};

pub use node::{NodeId, TreeNode};
pub use traversal::{Ancestors, Dfs};

#[derive(Debug, Clone)]
struct Slot<T> {
    generation: u32,
    node: Option<TreeNode<T>>,
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Before,
    After,
}

/// Ordered tree with arena-backed nodes
#[derive(Debug, Clone)]
pub struct Tree<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    root: NodeId,
    len: usize,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Tree<T> {
    /// Create a tree whose root carries no payload
    pub fn new() -> Self {
        Self::from_root_value(None)
    }

    /// Create a tree whose root carries `value`
    pub fn with_root(value: T) -> Self {
        Self::from_root_value(Some(value))
    }

    fn from_root_value(value: Option<T>) -> Self {
        let root = NodeId {
            index: 0,
            generation: 0,
        };
        Self {
            slots: vec![Slot {
                generation: 0,
                node: Some(TreeNode::new(None, value)),
            }],
            free: Vec::new(),
            root,
            len: 1,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn is_root(&self, id: NodeId) -> bool {
        id == self.root
    }

    /// Number of live nodes, root included
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the root has no children
    pub fn is_empty(&self) -> bool {
        self.len == 1
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode<T>> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut TreeNode<T>> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    fn live(&self, id: NodeId) -> Result<&TreeNode<T>> {
        self.node(id).ok_or_else(|| id.stale())
    }

    /// Payload of a node; `None` for a stale id or a payload-less root
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.node(id).and_then(|node| node.value.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.node_mut(id).and_then(|node| node.value.as_mut())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|node| node.parent)
    }

    /// Handle locating `id` inside its parent's child list
    pub fn list_handle(&self, id: NodeId) -> Option<Handle> {
        self.node(id).and_then(|node| node.list_handle)
    }

    /// Children of `id` in sibling order
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node(id)
            .and_then(|node| node.children.as_ref())
            .into_iter()
            .flat_map(|list| list.iter().copied())
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.node(id)
            .and_then(|node| node.children.as_ref())
            .map_or(0, List::len)
    }

    /// Distance from the root (the root is at depth 0)
    pub fn depth(&self, id: NodeId) -> Option<usize> {
        self.node(id)?;
        Some(self.ancestors(id).count())
    }

    /// Strict ancestors of `id`, nearest first, ending at the root
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_, T> {
        Ancestors::new(self, self.parent(id))
    }

    /// Pre-order traversal of the whole tree, root at depth 0
    pub fn dfs(&self) -> Dfs<'_, T> {
        Dfs::new(self, self.root)
    }

    /// Pre-order traversal of the subtree under `id`, `id` at depth 0
    pub fn dfs_from(&self, id: NodeId) -> Dfs<'_, T> {
        Dfs::new(self, id)
    }

    fn allocate(&mut self, node: TreeNode<T>) -> NodeId {
        self.len += 1;
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId {
                    index,
                    generation: 0,
                }
            }
        }
    }

    fn release(&mut self, id: NodeId) -> Option<TreeNode<T>> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        Some(node)
    }

    /// Attach an allocated, detached `child` as first or last child of a
    /// live `parent`, creating the child list on first use.
    fn attach_child(&mut self, parent: NodeId, child: NodeId, at_start: bool) {
        let handle = match self.node_mut(parent) {
            Some(parent_node) => match parent_node.children.as_mut() {
                Some(list) if at_start => list.insert_at_head(child),
                Some(list) => list.insert_at_tail(child),
                None => {
                    let (list, handle) = List::with_value(child);
                    parent_node.children = Some(list);
                    handle
                }
            },
            None => return,
        };

        if let Some(child_node) = self.node_mut(child) {
            child_node.parent = Some(parent);
            child_node.list_handle = Some(handle);
        }
    }

    /// Remove `id` from its parent's child list, dropping the list when it
    /// becomes empty. The node itself stays allocated.
    fn detach(&mut self, id: NodeId) -> Result<()> {
        let (parent, handle) = self.sibling_position(id, "detach")?;

        if let Some(parent_node) = self.node_mut(parent) {
            if let Some(list) = parent_node.children.as_mut() {
                list.delete(handle)?;
                if list.is_empty() {
                    parent_node.children = None;
                }
            }
        }

        if let Some(node) = self.node_mut(id) {
            node.parent = None;
            node.list_handle = None;
        }
        Ok(())
    }

    /// Parent and list handle of a live, non-root node
    fn sibling_position(&self, id: NodeId, op: &str) -> Result<(NodeId, Handle)> {
        let node = self.live(id)?;
        match (node.parent, node.list_handle) {
            (Some(parent), Some(handle)) => Ok((parent, handle)),
            _ => Err(BlockDocError::IllegalRootOperation { op: op.to_string() }),
        }
    }

    fn insert_beside(&mut self, location: NodeId, value: T, side: Side, op: &str) -> Result<NodeId> {
        let (parent, handle) = self.sibling_position(location, op)?;
        let in_list = self
            .node(parent)
            .and_then(|p| p.children.as_ref())
            .is_some_and(|list| list.contains(handle));
        if !in_list {
            return Err(location.stale());
        }

        let id = self.allocate(TreeNode::new(Some(parent), Some(value)));
        let new_handle = match self.node_mut(parent).and_then(|p| p.children.as_mut()) {
            Some(list) => match side {
                Side::Before => list.insert_before(handle, id)?,
                Side::After => list.insert_after(handle, id)?,
            },
            None => {
                return Err(BlockDocError::Internal {
                    message: "parent lost its child list".to_string(),
                })
            }
        };

        if let Some(node) = self.node_mut(id) {
            node.list_handle = Some(new_handle);
        }
        Ok(id)
    }

    /// Insert `value` as the first child of `parent`
    ///
    /// # Errors
    ///
    /// Returns `StaleNode` if `parent` is not live.
    pub fn insert_at_node_start(&mut self, parent: NodeId, value: T) -> Result<NodeId> {
        self.live(parent)?;
        let id = self.allocate(TreeNode::new(Some(parent), Some(value)));
        self.attach_child(parent, id, true);
        Ok(id)
    }

    /// Insert `value` as the last child of `parent`
    ///
    /// # Errors
    ///
    /// Returns `StaleNode` if `parent` is not live.
    pub fn insert_at_node_end(&mut self, parent: NodeId, value: T) -> Result<NodeId> {
        self.live(parent)?;
        let id = self.allocate(TreeNode::new(Some(parent), Some(value)));
        self.attach_child(parent, id, false);
        Ok(id)
    }

    pub fn insert_at_root_start(&mut self, value: T) -> NodeId {
        let root = self.root;
        let id = self.allocate(TreeNode::new(Some(root), Some(value)));
        self.attach_child(root, id, true);
        id
    }

    pub fn insert_at_root_end(&mut self, value: T) -> NodeId {
        let root = self.root;
        let id = self.allocate(TreeNode::new(Some(root), Some(value)));
        self.attach_child(root, id, false);
        id
    }

    /// Insert `value` as the left sibling of `location`
    ///
    /// # Errors
    ///
    /// Returns `IllegalRootOperation` if `location` is the root, `StaleNode`
    /// if it is not live.
    pub fn insert_before_node(&mut self, location: NodeId, value: T) -> Result<NodeId> {
        self.insert_beside(location, value, Side::Before, "insert before")
    }

    /// Insert `value` as the right sibling of `location`
    ///
    /// # Errors
    ///
    /// Returns `IllegalRootOperation` if `location` is the root, `StaleNode`
    /// if it is not live.
    pub fn insert_after_node(&mut self, location: NodeId, value: T) -> Result<NodeId> {
        self.insert_beside(location, value, Side::After, "insert after")
    }

    fn move_beside(&mut self, id: NodeId, location: NodeId, side: Side, op: &str) -> Result<NodeId> {
        let (old_parent, old_handle) = self.sibling_position(id, op)?;
        let (new_parent, location_handle) = self.sibling_position(location, op)?;
        if id == location {
            return Ok(id);
        }
        if self.ancestors(location).any(|ancestor| ancestor == id) {
            return Err(BlockDocError::CycleDetected { op: op.to_string() });
        }

        if old_parent == new_parent {
            if let Some(list) = self.node_mut(new_parent).and_then(|p| p.children.as_mut()) {
                match side {
                    Side::Before => list.move_before(old_handle, location_handle)?,
                    Side::After => list.move_after(old_handle, location_handle)?,
                }
            }
            return Ok(id);
        }

        self.detach(id)?;
        let new_handle = match self.node_mut(new_parent).and_then(|p| p.children.as_mut()) {
            Some(list) => match side {
                Side::Before => list.insert_before(location_handle, id)?,
                Side::After => list.insert_after(location_handle, id)?,
            },
            None => {
                return Err(BlockDocError::Internal {
                    message: "location parent lost its child list".to_string(),
                })
            }
        };

        if let Some(node) = self.node_mut(id) {
            node.parent = Some(new_parent);
            node.list_handle = Some(new_handle);
        }
        Ok(id)
    }

    /// Move `id` and its whole subtree to become the left sibling of `location`
    ///
    /// `location` may live under a different parent. Moving a node onto
    /// itself is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `IllegalRootOperation` if either operand is the root,
    /// `CycleDetected` if `location` lies inside the subtree of `id`, and
    /// `StaleNode` for dead ids.
    pub fn move_before_node(&mut self, id: NodeId, location: NodeId) -> Result<NodeId> {
        self.move_beside(id, location, Side::Before, "move")
    }

    /// Move `id` and its whole subtree to become the right sibling of `location`
    ///
    /// # Errors
    ///
    /// Same as [`Tree::move_before_node`].
    pub fn move_after_node(&mut self, id: NodeId, location: NodeId) -> Result<NodeId> {
        self.move_beside(id, location, Side::After, "move")
    }

    /// Remove `id` and its subtree, returning the removed payloads in pre-order
    ///
    /// Every id of the subtree becomes stale.
    ///
    /// # Errors
    ///
    /// Returns `IllegalRootOperation` on the root and `StaleNode` for a dead id.
    pub fn delete_node(&mut self, id: NodeId) -> Result<Vec<T>> {
        self.sibling_position(id, "delete")?;
        self.detach(id)?;

        let mut removed = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.release(current) else {
                continue;
            };
            if let Some(children) = node.children {
                let ids: Vec<NodeId> = children.iter().copied().collect();
                stack.extend(ids.into_iter().rev());
            }
            if let Some(value) = node.value {
                removed.push(value);
            }
        }
        Ok(removed)
    }
}

impl<T: Clone> Tree<T> {
    /// Deep-copy the subtree under `id` and insert it as `id`'s right sibling
    ///
    /// Payloads are cloned as-is; giving copies a fresh identity is up to
    /// the caller.
    ///
    /// # Errors
    ///
    /// Returns `IllegalRootOperation` on the root and `StaleNode` for a dead id.
    pub fn duplicate_node(&mut self, id: NodeId) -> Result<NodeId> {
        self.sibling_position(id, "duplicate")?;
        let value = self
            .live(id)?
            .value
            .clone()
            .ok_or_else(|| BlockDocError::Internal {
                message: "non-root node without payload".to_string(),
            })?;
        let copy = self.insert_after_node(id, value)?;

        let mut stack: Vec<(NodeId, NodeId)> = self
            .children(id)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .map(|child| (child, copy))
            .collect();

        while let Some((source, target_parent)) = stack.pop() {
            let Some(value) = self.node(source).map(|node| node.value.clone()) else {
                continue;
            };
            let new_id = self.allocate(TreeNode::new(Some(target_parent), value));
            self.attach_child(target_parent, new_id, false);

            let children: Vec<NodeId> = self.children(source).collect();
            stack.extend(children.into_iter().rev().map(|child| (child, new_id)));
        }

        Ok(copy)
    }
}
