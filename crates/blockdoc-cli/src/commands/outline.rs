//! JSON outline input
//!
//! An outline is a convenience input format for the CLI:
//!
//! ```json
//! { "name": "Notes",
//!   "blocks": [ { "content": "a", "style": { "color": "red" },
//!                 "children": [ { "content": "b" } ] } ] }
//! ```

use std::path::Path;

use blockdoc_core::{BlockId, BlockInput, Document, Style};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Outline {
    pub name: String,
    #[serde(default)]
    pub blocks: Vec<OutlineBlock>,
}

#[derive(Debug, Deserialize)]
pub struct OutlineBlock {
    pub content: String,
    #[serde(default)]
    pub style: Option<Style>,
    #[serde(default)]
    pub children: Vec<OutlineBlock>,
}

impl Outline {
    /// Build a text document, inserting blocks in outline order
    pub fn into_document(self) -> Result<Document<String>, Box<dyn std::error::Error>> {
        let mut doc = Document::new(self.name, |content: &String| content.clone());

        let mut pending: Vec<(Option<BlockId>, OutlineBlock)> =
            self.blocks.into_iter().rev().map(|b| (None, b)).collect();

        while let Some((parent, block)) = pending.pop() {
            let input = BlockInput {
                content: block.content,
                style: block.style,
            };
            let id = match &parent {
                None => doc.insert_block_at_root_end(input)?,
                Some(parent) => doc.insert_subblock_at_block_end(parent, input)?,
            };
            pending.extend(
                block
                    .children
                    .into_iter()
                    .rev()
                    .map(|child| (Some(id.clone()), child)),
            );
        }

        tracing::debug!(blocks = doc.len(), "outline loaded");
        Ok(doc)
    }
}

/// Read and parse an outline file into a document
pub fn load(path: &Path) -> Result<Document<String>, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    let outline: Outline = serde_json::from_str(&raw)?;
    outline.into_document()
}
