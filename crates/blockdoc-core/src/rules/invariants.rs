use std::collections::HashMap;

use blockdoc_core_types::BlockId;

use crate::checksum;
use crate::document::Document;
use crate::model::Block;
use crate::tree::{NodeId, Tree};

/// A memoized checksum that disagrees with a from-scratch recomputation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriftReport {
    /// `None` for the document root
    pub block_id: Option<BlockId>,
    pub stored: String,
    pub recomputed: String,
}

/// Recompute every compound checksum bottom-up and report mismatches
///
/// Blocks are compared on their compound checksum (own content and style
/// checksums plus subtree checksum); the root is compared against the
/// document checksum. Reports come deepest first.
pub fn find_checksum_drift<T>(doc: &Document<T>) -> Vec<DriftReport> {
    let tree = doc.tree();
    let hasher = doc.hasher();
    let order: Vec<NodeId> = tree.dfs().map(|(node, _)| node).collect();
    let mut recomputed: HashMap<NodeId, String> = HashMap::with_capacity(order.len());
    let mut drift = Vec::new();

    for &node in order.iter().rev() {
        let subtree = checksum::subtree_checksum(
            tree.children(node)
                .filter_map(|child| recomputed.get(&child).map(String::as_str)),
        );

        match tree.get(node) {
            Some(block) => {
                let fresh = format!(
                    "{}{}{}",
                    checksum::content_checksum(&hasher(block.content())),
                    checksum::style_checksum(block.style()),
                    subtree
                );
                let stored = block.compound_crc();
                if stored != fresh {
                    drift.push(DriftReport {
                        block_id: Some(block.id().clone()),
                        stored,
                        recomputed: fresh.clone(),
                    });
                }
                recomputed.insert(node, fresh);
            }
            None => {
                if doc.checksum() != subtree {
                    drift.push(DriftReport {
                        block_id: None,
                        stored: doc.checksum().to_string(),
                        recomputed: subtree,
                    });
                }
            }
        }
    }

    drift
}

/// Find non-root nodes whose list handle does not lead back to themselves
///
/// Returns the offending nodes.
pub fn find_broken_list_handles<T>(tree: &Tree<T>) -> Vec<NodeId> {
    tree.dfs()
        .map(|(node, _)| node)
        .filter(|&node| !tree.is_root(node))
        .filter(|&node| {
            let linked = tree
                .parent(node)
                .and_then(|parent| tree.node(parent))
                .and_then(|parent| parent.children())
                .zip(tree.list_handle(node))
                .and_then(|(list, handle)| list.get(handle).copied());
            linked != Some(node)
        })
        .collect()
}

/// Find nodes holding an empty child list instead of none at all
pub fn find_empty_child_lists<T>(tree: &Tree<T>) -> Vec<NodeId> {
    tree.dfs()
        .map(|(node, _)| node)
        .filter(|&node| {
            tree.node(node)
                .and_then(|n| n.children())
                .is_some_and(|list| list.is_empty())
        })
        .collect()
}

/// Find child lists whose recorded length differs from a forward walk
///
/// Returns list of (owner, recorded_len, walked_len) tuples
pub fn find_child_list_length_mismatches<T>(tree: &Tree<T>) -> Vec<(NodeId, usize, usize)> {
    tree.dfs()
        .filter_map(|(node, _)| {
            let list = tree.node(node)?.children()?;
            let walked = list.iter().count();
            (walked != list.len()).then_some((node, list.len(), walked))
        })
        .collect()
}

/// Find children listed under one node while pointing at another parent
///
/// Returns list of (child, listed_under) tuples
pub fn find_parent_mismatches<T>(tree: &Tree<T>) -> Vec<(NodeId, NodeId)> {
    let mut mismatches = Vec::new();
    for (node, _) in tree.dfs() {
        for child in tree.children(node) {
            if tree.parent(child) != Some(node) {
                mismatches.push((child, node));
            }
        }
    }
    mismatches
}

/// Find index entries that no longer lead to a live block with that id
pub fn find_stale_index_entries<T>(doc: &Document<T>) -> Vec<BlockId> {
    let mut stale: Vec<BlockId> = doc
        .index()
        .iter()
        .filter(|&(id, node)| doc.tree().get(*node).map(Block::id) != Some(id))
        .map(|(id, _)| id.clone())
        .collect();
    stale.sort();
    stale
}

/// Find blocks in the tree that the index cannot reach
pub fn find_unindexed_blocks<T>(doc: &Document<T>) -> Vec<BlockId> {
    doc.iter_preorder()
        .map(|(block, _)| block)
        .filter(|block| doc.index().get(block.id()).copied() != block.node())
        .map(|block| block.id().clone())
        .collect()
}
