//! Document - identity-indexed hierarchy of blocks
//!
//! A [`Document`] binds a [`Tree`] of [`Block`]s to an id index and a
//! listener registry. The tree root carries no block; its aggregate
//! checksum is the document checksum.
//!
//! Every mutating operation resolves ids, delegates the structural change
//! to the tree, refreshes memoized checksums from the affected parent up to
//! the root and finally notifies listeners. Mutators live in
//! [`editing`]; this module holds construction, lookup and propagation.

pub mod editing;
pub mod listeners;

use std::collections::HashMap;

use blockdoc_core_types::{BlockId, ListenerId};

use crate::checksum;
use crate::errors::{BlockDocError, Result};
use crate::model::Block;
use crate::render;
use crate::rules;
use crate::tree::{NodeId, Tree};

pub use listeners::{Listener, ListenerRegistry};

/// Label used for the block-less root in integrity reports
pub const ROOT_LABEL: &str = "<root>";

/// Maps block content to a string (hashing input or display text)
pub type ContentFn<T> = Box<dyn Fn(&T) -> String>;

pub struct Document<T> {
    name: String,
    tree: Tree<Block<T>>,
    index: HashMap<BlockId, NodeId>,
    hasher: ContentFn<T>,
    display: Option<ContentFn<T>>,
    listeners: ListenerRegistry,
    checksum: String,
}

impl<T> Document<T> {
    /// Create an empty document
    ///
    /// `hasher` turns content into the string fed to CRC-32; it also renders
    /// content in markup unless a display function is set.
    pub fn new(name: impl Into<String>, hasher: impl Fn(&T) -> String + 'static) -> Self {
        Self {
            name: name.into(),
            tree: Tree::new(),
            index: HashMap::new(),
            hasher: Box::new(hasher),
            display: None,
            listeners: ListenerRegistry::new(),
            checksum: String::new(),
        }
    }

    /// Override how content is rendered in markup (checksums are unaffected)
    pub fn with_display(mut self, display: impl Fn(&T) -> String + 'static) -> Self {
        self.display = Some(Box::new(display));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Document-level aggregate over the top-level blocks' compound checksums
    ///
    /// Empty while the document has no blocks.
    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    pub fn tree(&self) -> &Tree<Block<T>> {
        &self.tree
    }

    /// Number of live blocks
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, id: &BlockId) -> bool {
        self.resolve(id).is_ok()
    }

    pub(crate) fn index(&self) -> &HashMap<BlockId, NodeId> {
        &self.index
    }

    #[cfg(test)]
    pub(crate) fn tree_mut(&mut self) -> &mut Tree<Block<T>> {
        &mut self.tree
    }

    #[cfg(test)]
    pub(crate) fn index_mut(&mut self) -> &mut HashMap<BlockId, NodeId> {
        &mut self.index
    }

    /// Tree node currently holding block `id`
    ///
    /// # Errors
    ///
    /// Returns `BlockNotFound` if the id was never issued or has been deleted.
    pub fn resolve(&self, id: &BlockId) -> Result<NodeId> {
        self.index
            .get(id)
            .copied()
            .filter(|node| self.tree.contains(*node))
            .ok_or_else(|| BlockDocError::BlockNotFound {
                block_id: id.to_string(),
            })
    }

    /// # Errors
    ///
    /// Returns `BlockNotFound` for an unknown id.
    pub fn get_block(&self, id: &BlockId) -> Result<&Block<T>> {
        let node = self.resolve(id)?;
        self.tree
            .get(node)
            .ok_or_else(|| BlockDocError::BlockNotFound {
                block_id: id.to_string(),
            })
    }

    /// Fetch several blocks at once, failing on the first unknown id
    ///
    /// # Errors
    ///
    /// Returns `BlockNotFound` for the first id that does not resolve.
    pub fn get_blocks(&self, ids: &[BlockId]) -> Result<Vec<&Block<T>>> {
        ids.iter().map(|id| self.get_block(id)).collect()
    }

    /// Parent block of `id`, `None` for a top-level block
    ///
    /// # Errors
    ///
    /// Returns `BlockNotFound` for an unknown id.
    pub fn parent_of(&self, id: &BlockId) -> Result<Option<&Block<T>>> {
        let node = self.resolve(id)?;
        Ok(self.tree.parent(node).and_then(|parent| self.tree.get(parent)))
    }

    /// Direct children of `id` in sibling order
    ///
    /// # Errors
    ///
    /// Returns `BlockNotFound` for an unknown id.
    pub fn children_of(&self, id: &BlockId) -> Result<Vec<&Block<T>>> {
        let node = self.resolve(id)?;
        Ok(self
            .tree
            .children(node)
            .filter_map(|child| self.tree.get(child))
            .collect())
    }

    /// Top-level blocks in order
    ///
    /// Each call starts a fresh pass.
    pub fn blocks(&self) -> impl Iterator<Item = &Block<T>> + '_ {
        self.tree
            .children(self.tree.root())
            .filter_map(|node| self.tree.get(node))
    }

    /// Every block in pre-order with its depth (top-level blocks at depth 1)
    pub fn iter_preorder(&self) -> impl Iterator<Item = (&Block<T>, usize)> + '_ {
        self.tree
            .dfs()
            .filter_map(|(node, depth)| self.tree.get(node).map(|block| (block, depth)))
    }

    /// Text used for `block` in rendered markup
    pub fn display_string(&self, block: &Block<T>) -> String {
        match &self.display {
            Some(display) => display(block.content()),
            None => (self.hasher)(block.content()),
        }
    }

    /// Render the document as indented markup
    pub fn to_markup(&self) -> String {
        render::render_markup(self)
    }

    /// Compare every memoized subtree checksum against a full recomputation
    ///
    /// # Errors
    ///
    /// Returns `ChecksumDrift` for the first mismatch found.
    pub fn verify_checksums(&self) -> Result<()> {
        match rules::invariants::find_checksum_drift(self).into_iter().next() {
            Some(drift) => Err(BlockDocError::ChecksumDrift {
                block_id: drift
                    .block_id
                    .map_or_else(|| ROOT_LABEL.to_string(), |id| id.to_string()),
                stored: drift.stored,
                recomputed: drift.recomputed,
            }),
            None => Ok(()),
        }
    }

    /// Check tree links and the id index for consistency
    ///
    /// # Errors
    ///
    /// Returns `IntegrityViolation` describing the first broken link.
    pub fn validate(&self) -> Result<()> {
        rules::validation::validate_document(self)
    }

    pub(crate) fn hasher(&self) -> &dyn Fn(&T) -> String {
        &*self.hasher
    }

    /// Register a change listener
    pub fn add_listener(&mut self, listener: impl FnMut(&BlockId, &str, &str) + 'static) -> ListenerId {
        self.listeners.add(Box::new(listener))
    }

    /// Unregister a listener, returning whether it was registered
    pub fn remove_listener(&mut self, id: &ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Recompute subtree checksums from `start` up to and including the root
    fn refresh_upward(&mut self, start: NodeId) {
        let mut current = Some(start);
        let mut visited = 0usize;
        while let Some(node) = current {
            let aggregate = checksum::subtree_checksum(
                self.tree
                    .children(node)
                    .filter_map(|child| self.tree.get(child))
                    .map(Block::compound_crc),
            );
            if self.tree.is_root(node) {
                self.checksum = aggregate;
            } else if let Some(block) = self.tree.get_mut(node) {
                block.set_subtree_checksum(aggregate);
            }
            visited += 1;
            current = self.tree.parent(node);
        }
        tracing::debug!(ancestors = visited, "subtree checksums refreshed");
    }

    /// Refresh checksums above `node`, i.e. from its parent upward
    fn refresh_above(&mut self, node: NodeId) {
        if let Some(parent) = self.tree.parent(node) {
            self.refresh_upward(parent);
        }
    }

    fn notify(&mut self, node: NodeId) {
        if let Some(block) = self.tree.get(node) {
            let crc = block.crc();
            let compound = block.compound_crc();
            self.listeners.notify(block.id(), &crc, &compound);
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Document<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("name", &self.name)
            .field("blocks", &self.index.len())
            .field("checksum", &self.checksum)
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}
