//! Tree traversals
//!
//! Both iterators use explicit state instead of recursion, so arbitrarily
//! deep trees cannot exhaust the call stack.

use super::{NodeId, Tree};

/// Pre-order traversal yielding `(node, depth)`
///
/// Siblings are visited in child-list order. Depth is relative to the node
/// the traversal started from.
pub struct Dfs<'a, T> {
    tree: &'a Tree<T>,
    stack: Vec<(NodeId, usize)>,
}

impl<'a, T> Dfs<'a, T> {
    pub(crate) fn new(tree: &'a Tree<T>, start: NodeId) -> Self {
        let stack = if tree.contains(start) {
            vec![(start, 0)]
        } else {
            Vec::new()
        };
        Self { tree, stack }
    }
}

impl<T> Iterator for Dfs<'_, T> {
    type Item = (NodeId, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, depth) = self.stack.pop()?;

        // push children tail-first so the head is popped next
        if let Some(children) = self.tree.node(id).and_then(|node| node.children()) {
            let mut current = children.tail();
            while let Some(handle) = current {
                if let Some(child) = children.get(handle) {
                    self.stack.push((*child, depth + 1));
                }
                current = children.prev(handle);
            }
        }

        Some((id, depth))
    }
}

/// Walk from a node's parent up to the root
pub struct Ancestors<'a, T> {
    tree: &'a Tree<T>,
    next: Option<NodeId>,
}

impl<'a, T> Ancestors<'a, T> {
    pub(crate) fn new(tree: &'a Tree<T>, first: Option<NodeId>) -> Self {
        Self { tree, next: first }
    }
}

impl<T> Iterator for Ancestors<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}
