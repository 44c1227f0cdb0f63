use crate::document::Document;
use crate::errors::{BlockDocError, Result};
use crate::tree::Tree;

use super::invariants;

/// Validate cross-layer referential integrity of a tree
///
/// Checks that:
/// 1. every non-root node's list handle dereferences to that node inside
///    its parent's child list
/// 2. every listed child points back at the node listing it
/// 3. leaves carry no child list rather than an empty one
/// 4. every child list's recorded length matches a forward walk
///
/// # Errors
/// Returns the first violation found as `IntegrityViolation`. For exhaustive
/// reporting, call the individual invariant functions directly.
pub fn validate_tree<T>(tree: &Tree<T>) -> Result<()> {
    if let Some(node) = invariants::find_broken_list_handles(tree).first() {
        return Err(violation(format!(
            "node {}:{} is not where its list handle points",
            node.index(),
            node.generation()
        )));
    }

    if let Some((child, listed_under)) = invariants::find_parent_mismatches(tree).first() {
        return Err(violation(format!(
            "node {}:{} is listed under {}:{} but points at another parent",
            child.index(),
            child.generation(),
            listed_under.index(),
            listed_under.generation()
        )));
    }

    if let Some(node) = invariants::find_empty_child_lists(tree).first() {
        return Err(violation(format!(
            "node {}:{} holds an empty child list",
            node.index(),
            node.generation()
        )));
    }

    if let Some((node, recorded, walked)) =
        invariants::find_child_list_length_mismatches(tree).first()
    {
        return Err(violation(format!(
            "child list of node {}:{} records {} entries but holds {}",
            node.index(),
            node.generation(),
            recorded,
            walked
        )));
    }

    Ok(())
}

/// Validate a whole document: tree links, then the id index
///
/// # Errors
/// Returns `IntegrityViolation` for the first broken link or index entry.
pub fn validate_document<T>(doc: &Document<T>) -> Result<()> {
    validate_tree(doc.tree())?;

    if let Some(id) = invariants::find_stale_index_entries(doc).first() {
        return Err(violation(format!("index entry {} is stale", id)));
    }

    if let Some(id) = invariants::find_unindexed_blocks(doc).first() {
        return Err(violation(format!("block {} is not reachable by id", id)));
    }

    Ok(())
}

fn violation(reason: String) -> BlockDocError {
    BlockDocError::IntegrityViolation { reason }
}
