//! Block editing operations
//!
//! Each public operation owns its lifecycle logging:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Checksum propagation only logs at debug level.
//!
//! Failures are detected before anything is mutated, so a failed operation
//! leaves the document exactly as it was and notifies nobody.

use std::time::Instant;

use blockdoc_core_types::BlockId;

use super::Document;
use crate::errors::Result;
use crate::model::{Block, BlockInput, Style};
use crate::tree::{NodeId, Tree};
use crate::{log_op_end, log_op_error, log_op_start};

impl<T> Document<T> {
    /// Insert a new top-level block before all others
    ///
    /// # Errors
    ///
    /// Infallible in practice; returns `Result` like every other mutator.
    pub fn insert_block_at_root_start(&mut self, input: BlockInput<T>) -> Result<BlockId> {
        self.instrumented("insert_block_at_root_start", None, |doc| {
            doc.place(input, |tree, block| Ok(tree.insert_at_root_start(block)))
        })
    }

    /// Insert a new top-level block after all others
    ///
    /// # Errors
    ///
    /// Infallible in practice; returns `Result` like every other mutator.
    pub fn insert_block_at_root_end(&mut self, input: BlockInput<T>) -> Result<BlockId> {
        self.instrumented("insert_block_at_root_end", None, |doc| {
            doc.place(input, |tree, block| Ok(tree.insert_at_root_end(block)))
        })
    }

    /// Insert a new block as the first child of `parent`
    ///
    /// # Errors
    ///
    /// Returns `BlockNotFound` if `parent` does not resolve.
    pub fn insert_subblock_at_block_start(
        &mut self,
        parent: &BlockId,
        input: BlockInput<T>,
    ) -> Result<BlockId> {
        self.instrumented("insert_subblock_at_block_start", Some(parent), |doc| {
            let parent = doc.resolve(parent)?;
            doc.place(input, |tree, block| tree.insert_at_node_start(parent, block))
        })
    }

    /// Insert a new block as the last child of `parent`
    ///
    /// # Errors
    ///
    /// Returns `BlockNotFound` if `parent` does not resolve.
    pub fn insert_subblock_at_block_end(
        &mut self,
        parent: &BlockId,
        input: BlockInput<T>,
    ) -> Result<BlockId> {
        self.instrumented("insert_subblock_at_block_end", Some(parent), |doc| {
            let parent = doc.resolve(parent)?;
            doc.place(input, |tree, block| tree.insert_at_node_end(parent, block))
        })
    }

    /// Insert a new block as the left sibling of `location`
    ///
    /// # Errors
    ///
    /// Returns `BlockNotFound` if `location` does not resolve.
    pub fn insert_block_before_block(
        &mut self,
        location: &BlockId,
        input: BlockInput<T>,
    ) -> Result<BlockId> {
        self.instrumented("insert_block_before_block", Some(location), |doc| {
            let location = doc.resolve(location)?;
            doc.place(input, |tree, block| tree.insert_before_node(location, block))
        })
    }

    /// Insert a new block as the right sibling of `location`
    ///
    /// # Errors
    ///
    /// Returns `BlockNotFound` if `location` does not resolve.
    pub fn insert_block_after_block(
        &mut self,
        location: &BlockId,
        input: BlockInput<T>,
    ) -> Result<BlockId> {
        self.instrumented("insert_block_after_block", Some(location), |doc| {
            let location = doc.resolve(location)?;
            doc.place(input, |tree, block| tree.insert_after_node(location, block))
        })
    }

    /// Move `id` with its subtree to become the left sibling of `location`
    ///
    /// `location` may sit under another parent.
    ///
    /// # Errors
    ///
    /// Returns `BlockNotFound` for unknown ids and `CycleDetected` when
    /// `location` lies inside the subtree of `id`.
    pub fn move_block_before_block(&mut self, id: &BlockId, location: &BlockId) -> Result<()> {
        self.instrumented("move_block_before_block", Some(id), |doc| {
            doc.relocate(id, location, Tree::move_before_node)
        })
    }

    /// Move `id` with its subtree to become the right sibling of `location`
    ///
    /// # Errors
    ///
    /// Same as [`Document::move_block_before_block`].
    pub fn move_block_after_block(&mut self, id: &BlockId, location: &BlockId) -> Result<()> {
        self.instrumented("move_block_after_block", Some(id), |doc| {
            doc.relocate(id, location, Tree::move_after_node)
        })
    }

    /// Remove block `id` and its whole subtree
    ///
    /// Every removed id is purged from the index. Listeners receive the
    /// removed block's final checksums.
    ///
    /// # Errors
    ///
    /// Returns `BlockNotFound` if `id` does not resolve.
    pub fn delete_block(&mut self, id: &BlockId) -> Result<()> {
        self.instrumented("delete_block", Some(id), |doc| {
            let node = doc.resolve(id)?;
            let parent = doc.tree.parent(node);
            let removed = doc.tree.delete_node(node)?;

            for block in &removed {
                doc.index.remove(block.id());
            }
            if let Some(parent) = parent {
                doc.refresh_upward(parent);
            }
            tracing::debug!(removed = removed.len(), "subtree purged from index");

            if let Some(block) = removed.first() {
                let crc = block.crc();
                let compound = block.compound_crc();
                doc.listeners.notify(block.id(), &crc, &compound);
            }
            Ok(())
        })
    }

    /// Replace both content and style of block `id`
    ///
    /// # Errors
    ///
    /// Returns `BlockNotFound` if `id` does not resolve.
    pub fn edit_block(&mut self, id: &BlockId, input: BlockInput<T>) -> Result<()> {
        self.instrumented("edit_block", Some(id), |doc| {
            doc.update(id, |block, hasher| {
                block.set_content(input.content, hasher);
                block.set_style(input.style);
            })
        })
    }

    /// Replace the content of block `id`, keeping its style
    ///
    /// # Errors
    ///
    /// Returns `BlockNotFound` if `id` does not resolve.
    pub fn edit_block_content(&mut self, id: &BlockId, content: T) -> Result<()> {
        self.instrumented("edit_block_content", Some(id), |doc| {
            doc.update(id, |block, hasher| block.set_content(content, hasher))
        })
    }

    /// Replace the style of block `id`; `None` clears it
    ///
    /// Style is part of a block's own checksum, so ancestors are refreshed
    /// exactly as for a content edit.
    ///
    /// # Errors
    ///
    /// Returns `BlockNotFound` if `id` does not resolve.
    pub fn edit_block_style(&mut self, id: &BlockId, style: Option<Style>) -> Result<()> {
        self.instrumented("edit_block_style", Some(id), |doc| {
            doc.update(id, |block, _| block.set_style(style))
        })
    }

    fn instrumented<R>(
        &mut self,
        op: &'static str,
        block_id: Option<&BlockId>,
        run: impl FnOnce(&mut Self) -> Result<R>,
    ) -> Result<R> {
        let block_id = block_id.map_or("", BlockId::as_str);
        log_op_start!(op, block_id = block_id);
        let start = Instant::now();

        let result = run(self).map_err(|e| {
            log_op_error!(
                op,
                &e,
                duration_ms = start.elapsed().as_millis() as u64,
                block_id = block_id
            );
            e
        })?;

        log_op_end!(
            op,
            duration_ms = start.elapsed().as_millis() as u64,
            block_id = block_id,
            blocks = self.index.len()
        );
        Ok(result)
    }

    /// Build a block from `input`, let `attach` link it into the tree, then
    /// index it, refresh checksums and notify.
    fn place(
        &mut self,
        input: BlockInput<T>,
        attach: impl FnOnce(&mut Tree<Block<T>>, Block<T>) -> Result<NodeId>,
    ) -> Result<BlockId> {
        let id = BlockId::new();
        let block = Block::new(id.clone(), input, &*self.hasher);
        let node = attach(&mut self.tree, block)?;

        if let Some(block) = self.tree.get_mut(node) {
            block.set_node(node);
        }
        self.index.insert(id.clone(), node);
        self.refresh_above(node);
        self.notify(node);
        Ok(id)
    }

    fn relocate(
        &mut self,
        id: &BlockId,
        location: &BlockId,
        relink: impl FnOnce(&mut Tree<Block<T>>, NodeId, NodeId) -> Result<NodeId>,
    ) -> Result<()> {
        let node = self.resolve(id)?;
        let location = self.resolve(location)?;
        let old_parent = self.tree.parent(node);

        relink(&mut self.tree, node, location)?;

        if let Some(old_parent) = old_parent {
            self.refresh_upward(old_parent);
        }
        if self.tree.parent(node) != old_parent {
            self.refresh_above(node);
        }
        self.notify(node);
        Ok(())
    }

    fn update(
        &mut self,
        id: &BlockId,
        change: impl FnOnce(&mut Block<T>, &dyn Fn(&T) -> String),
    ) -> Result<()> {
        let node = self.resolve(id)?;
        let hasher: &dyn Fn(&T) -> String = &*self.hasher;
        if let Some(block) = self.tree.get_mut(node) {
            change(block, hasher);
        }
        self.refresh_above(node);
        self.notify(node);
        Ok(())
    }
}

impl<T: Clone> Document<T> {
    /// Deep-copy block `id` with its subtree as its right sibling
    ///
    /// Every copied block receives a fresh id. Returns the id of the copy of
    /// `id` itself.
    ///
    /// # Errors
    ///
    /// Returns `BlockNotFound` if `id` does not resolve.
    pub fn duplicate_block(&mut self, id: &BlockId) -> Result<BlockId> {
        self.instrumented("duplicate_block", Some(id), |doc| {
            let node = doc.resolve(id)?;
            let copy = doc.tree.duplicate_node(node)?;

            let copied: Vec<NodeId> = doc.tree.dfs_from(copy).map(|(n, _)| n).collect();
            for &copied_node in &copied {
                let fresh = BlockId::new();
                if let Some(block) = doc.tree.get_mut(copied_node) {
                    block.set_id(fresh.clone());
                    block.set_node(copied_node);
                }
                doc.index.insert(fresh, copied_node);
            }
            tracing::debug!(copied = copied.len(), "subtree duplicated");

            doc.refresh_above(copy);
            doc.notify(copy);
            doc.tree
                .get(copy)
                .map(|block| block.id().clone())
                .ok_or_else(|| crate::errors::BlockDocError::Internal {
                    message: "duplicated node lost its block".to_string(),
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::BlockDocError;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn text_doc() -> Document<String> {
        Document::new("Doc", |s: &String| s.clone())
    }

    fn input(text: &str) -> BlockInput<String> {
        BlockInput::new(text.to_string())
    }

    fn contents(doc: &Document<String>) -> Vec<(String, usize)> {
        doc.iter_preorder()
            .map(|(block, depth)| (block.content().clone(), depth))
            .collect()
    }

    #[test]
    fn test_root_inserts_order() {
        let mut doc = text_doc();
        doc.insert_block_at_root_end(input("b")).unwrap();
        doc.insert_block_at_root_start(input("a")).unwrap();
        doc.insert_block_at_root_end(input("c")).unwrap();

        let top: Vec<&str> = doc.blocks().map(|b| b.content().as_str()).collect();
        assert_eq!(top, vec!["a", "b", "c"]);
        assert_eq!(doc.len(), 3);
    }

    #[test]
    fn test_sibling_inserts() {
        let mut doc = text_doc();
        let mid = doc.insert_block_at_root_end(input("mid")).unwrap();
        doc.insert_block_before_block(&mid, input("left")).unwrap();
        doc.insert_block_after_block(&mid, input("right")).unwrap();

        let top: Vec<&str> = doc.blocks().map(|b| b.content().as_str()).collect();
        assert_eq!(top, vec!["left", "mid", "right"]);
    }

    #[test]
    fn test_inserted_block_knows_its_node() {
        let mut doc = text_doc();
        let id = doc.insert_block_at_root_end(input("x")).unwrap();
        let node = doc.resolve(&id).unwrap();
        assert_eq!(doc.get_block(&id).unwrap().node(), Some(node));
    }

    #[test]
    fn test_subblock_insert_updates_parent_subtree_checksum() {
        let mut doc = text_doc();
        let parent = doc.insert_block_at_root_end(input("parent")).unwrap();
        assert_eq!(doc.get_block(&parent).unwrap().subtree_checksum(), "");

        let child = doc
            .insert_subblock_at_block_start(&parent, input("child"))
            .unwrap();
        let child_compound = doc.get_block(&child).unwrap().compound_crc();
        assert_eq!(
            doc.get_block(&parent).unwrap().subtree_checksum(),
            crate::checksum::crc32_hex(&child_compound)
        );
        doc.verify_checksums().unwrap();
    }

    #[test]
    fn test_content_edit_changes_ancestors_only_on_its_path() {
        let mut doc = text_doc();
        let a = doc.insert_block_at_root_end(input("a")).unwrap();
        let b = doc.insert_block_at_root_end(input("b")).unwrap();
        let a1 = doc.insert_subblock_at_block_end(&a, input("a1")).unwrap();
        doc.insert_subblock_at_block_end(&b, input("b1")).unwrap();

        let a_before = doc.get_block(&a).unwrap().subtree_checksum().to_string();
        let b_before = doc.get_block(&b).unwrap().subtree_checksum().to_string();
        let doc_before = doc.checksum().to_string();

        doc.edit_block_content(&a1, "a1 edited".to_string()).unwrap();

        assert_ne!(doc.get_block(&a).unwrap().subtree_checksum(), a_before);
        assert_eq!(doc.get_block(&b).unwrap().subtree_checksum(), b_before);
        assert_ne!(doc.checksum(), doc_before);
        doc.verify_checksums().unwrap();
    }

    #[test]
    fn test_style_edit_propagates_to_ancestors() {
        let mut doc = text_doc();
        let parent = doc.insert_block_at_root_end(input("p")).unwrap();
        let child = doc.insert_subblock_at_block_end(&parent, input("c")).unwrap();
        let before = doc.get_block(&parent).unwrap().subtree_checksum().to_string();

        doc.edit_block_style(
            &child,
            Some(Style {
                color: Some("red".to_string()),
                ..Style::default()
            }),
        )
        .unwrap();

        assert_ne!(doc.get_block(&parent).unwrap().subtree_checksum(), before);
        doc.verify_checksums().unwrap();

        doc.edit_block_style(&child, None).unwrap();
        assert_eq!(doc.get_block(&parent).unwrap().subtree_checksum(), before);
    }

    #[test]
    fn test_edit_block_replaces_content_and_style() {
        let mut doc = text_doc();
        let id = doc.insert_block_at_root_end(input("old")).unwrap();
        let style = Style {
            font_size: Some("12px".to_string()),
            ..Style::default()
        };

        doc.edit_block(&id, input("new").with_style(style.clone()))
            .unwrap();

        let block = doc.get_block(&id).unwrap();
        assert_eq!(block.content(), "new");
        assert_eq!(block.style(), Some(&style));
    }

    #[test]
    fn test_move_across_parents_refreshes_both_chains() {
        let mut doc = text_doc();
        let a = doc.insert_block_at_root_end(input("a")).unwrap();
        let b = doc.insert_block_at_root_end(input("b")).unwrap();
        let a1 = doc.insert_subblock_at_block_end(&a, input("a1")).unwrap();
        let b1 = doc.insert_subblock_at_block_end(&b, input("b1")).unwrap();

        doc.move_block_after_block(&a1, &b1).unwrap();

        assert_eq!(doc.get_block(&a).unwrap().subtree_checksum(), "");
        assert_eq!(
            contents(&doc),
            vec![
                ("a".to_string(), 1),
                ("b".to_string(), 1),
                ("b1".to_string(), 2),
                ("a1".to_string(), 2),
            ]
        );
        doc.verify_checksums().unwrap();
        doc.validate().unwrap();
    }

    #[test]
    fn test_move_into_own_subtree_fails_without_change() {
        let mut doc = text_doc();
        let a = doc.insert_block_at_root_end(input("a")).unwrap();
        let a1 = doc.insert_subblock_at_block_end(&a, input("a1")).unwrap();
        let before = doc.checksum().to_string();

        let err = doc.move_block_before_block(&a, &a1).unwrap_err();
        assert!(matches!(err, BlockDocError::CycleDetected { .. }));
        assert_eq!(doc.checksum(), before);
        assert_eq!(doc.parent_of(&a1).unwrap().map(Block::id), Some(&a));
    }

    #[test]
    fn test_delete_purges_whole_subtree() {
        let mut doc = text_doc();
        let a = doc.insert_block_at_root_end(input("a")).unwrap();
        let a1 = doc.insert_subblock_at_block_end(&a, input("a1")).unwrap();
        let a11 = doc.insert_subblock_at_block_end(&a1, input("a11")).unwrap();
        doc.insert_block_at_root_end(input("b")).unwrap();

        doc.delete_block(&a).unwrap();

        assert_eq!(doc.len(), 1);
        for gone in [&a, &a1, &a11] {
            assert!(matches!(
                doc.get_block(gone),
                Err(BlockDocError::BlockNotFound { .. })
            ));
        }
        assert!(matches!(
            doc.delete_block(&a1),
            Err(BlockDocError::BlockNotFound { .. })
        ));
        doc.verify_checksums().unwrap();
    }

    #[test]
    fn test_delete_last_block_empties_checksum() {
        let mut doc = text_doc();
        let a = doc.insert_block_at_root_end(input("a")).unwrap();
        doc.delete_block(&a).unwrap();
        assert_eq!(doc.checksum(), "");
        assert!(doc.is_empty());
    }

    #[test]
    fn test_duplicate_assigns_fresh_ids() {
        let mut doc = text_doc();
        let a = doc.insert_block_at_root_end(input("a")).unwrap();
        let a1 = doc.insert_subblock_at_block_end(&a, input("a1")).unwrap();

        let copy = doc.duplicate_block(&a).unwrap();
        assert_ne!(copy, a);
        assert_eq!(doc.len(), 4);

        let copy_children = doc.children_of(&copy).unwrap();
        assert_eq!(copy_children.len(), 1);
        assert_ne!(copy_children[0].id(), &a1);
        assert_eq!(copy_children[0].content(), "a1");

        let copied_child = copy_children[0].id().clone();
        assert_eq!(doc.parent_of(&copied_child).unwrap().map(Block::id), Some(&copy));
        doc.verify_checksums().unwrap();
        doc.validate().unwrap();
    }

    #[test]
    fn test_listener_notified_with_block_checksums() {
        let mut doc = text_doc();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        doc.add_listener(move |id: &BlockId, crc: &str, compound: &str| {
            sink.borrow_mut()
                .push((id.clone(), crc.to_string(), compound.to_string()))
        });

        let id = doc.insert_block_at_root_end(input("x")).unwrap();
        let block = doc.get_block(&id).unwrap();

        assert_eq!(
            *seen.borrow(),
            vec![(id.clone(), block.crc(), block.compound_crc())]
        );
    }

    #[test]
    fn test_failed_operation_notifies_nobody() {
        let mut doc = text_doc();
        let hits = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&hits);
        doc.add_listener(move |_: &BlockId, _: &str, _: &str| *counter.borrow_mut() += 1);

        let missing = BlockId::from_string("missing".to_string());
        assert!(doc.edit_block_content(&missing, "x".to_string()).is_err());
        assert!(doc.insert_block_after_block(&missing, input("x")).is_err());
        assert_eq!(*hits.borrow(), 0);
        assert!(doc.is_empty());
    }
}
