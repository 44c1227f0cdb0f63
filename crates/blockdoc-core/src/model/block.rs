use blockdoc_core_types::BlockId;
use serde::{Deserialize, Serialize};

use super::style::Style;
use crate::checksum;
use crate::tree::NodeId;

/// Content and optional style supplied when inserting or editing a block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockInput<T> {
    pub content: T,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
}

impl<T> BlockInput<T> {
    pub fn new(content: T) -> Self {
        Self {
            content,
            style: None,
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }
}

/// Block - a versioned payload occupying one tree node of a document
///
/// A block memoizes three checksums. The content and style checksums are
/// refreshed whenever the block itself changes; the subtree checksum is
/// refreshed by the document whenever the block's children change.
#[derive(Debug, Clone)]
pub struct Block<T> {
    id: BlockId,
    content: T,
    style: Option<Style>,
    content_checksum: String,
    style_checksum: String,
    subtree_checksum: String,
    node: Option<NodeId>,
}

impl<T> Block<T> {
    /// Create a block, computing its content and style checksums
    ///
    /// `hash` is the document's content hasher. The subtree checksum starts
    /// empty and the owning node is set once the block is placed in a tree.
    pub fn new(id: BlockId, input: BlockInput<T>, hash: &dyn Fn(&T) -> String) -> Self {
        let content_checksum = checksum::content_checksum(&hash(&input.content));
        let style_checksum = checksum::style_checksum(input.style.as_ref());
        Self {
            id,
            content: input.content,
            style: input.style,
            content_checksum,
            style_checksum,
            subtree_checksum: String::new(),
            node: None,
        }
    }

    pub fn id(&self) -> &BlockId {
        &self.id
    }

    pub fn content(&self) -> &T {
        &self.content
    }

    pub fn style(&self) -> Option<&Style> {
        self.style.as_ref()
    }

    pub fn content_checksum(&self) -> &str {
        &self.content_checksum
    }

    pub fn style_checksum(&self) -> &str {
        &self.style_checksum
    }

    pub fn subtree_checksum(&self) -> &str {
        &self.subtree_checksum
    }

    /// Own checksum: content checksum followed by style checksum
    pub fn crc(&self) -> String {
        format!("{}{}", self.content_checksum, self.style_checksum)
    }

    /// Own checksum followed by the memoized subtree checksum
    pub fn compound_crc(&self) -> String {
        format!(
            "{}{}{}",
            self.content_checksum, self.style_checksum, self.subtree_checksum
        )
    }

    /// Tree node currently holding this block
    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    pub(crate) fn set_id(&mut self, id: BlockId) {
        self.id = id;
    }

    pub(crate) fn set_node(&mut self, node: NodeId) {
        self.node = Some(node);
    }

    pub(crate) fn set_content(&mut self, content: T, hash: &dyn Fn(&T) -> String) {
        self.content_checksum = checksum::content_checksum(&hash(&content));
        self.content = content;
    }

    pub(crate) fn set_style(&mut self, style: Option<Style>) {
        self.style_checksum = checksum::style_checksum(style.as_ref());
        self.style = style;
    }

    pub(crate) fn set_subtree_checksum(&mut self, subtree_checksum: String) {
        self.subtree_checksum = subtree_checksum;
    }
}

impl<T: Clone> Block<T> {
    /// The block's current content and style as an input value
    pub fn to_input(&self) -> BlockInput<T> {
        BlockInput {
            content: self.content.clone(),
            style: self.style.clone(),
        }
    }
}
