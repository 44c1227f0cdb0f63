use blockdoc_core::{BlockId, BlockInput, Document, Tree};

/// Create an empty text document whose content is its own hash input
#[allow(dead_code)]
pub fn text_document(name: &str) -> Document<String> {
    Document::new(name, |content: &String| content.clone())
}

/// Shorthand for a style-less text block input
#[allow(dead_code)]
pub fn text(content: &str) -> BlockInput<String> {
    BlockInput::new(content.to_string())
}

/// Build the three-block, three-subblock document used across tests
///
/// Returns the document and the ids of the three top-level blocks.
#[allow(dead_code)]
pub fn first_document() -> (Document<String>, [BlockId; 3]) {
    let mut doc = text_document("My First Document");
    let first = doc.insert_block_at_root_end(text("First block")).unwrap();
    let second = doc.insert_block_at_root_end(text("Second block")).unwrap();
    let third = doc.insert_block_at_root_end(text("Third block")).unwrap();

    doc.insert_subblock_at_block_end(&second, text("First subblock"))
        .unwrap();
    doc.insert_subblock_at_block_end(&second, text("Second subblock"))
        .unwrap();
    doc.insert_subblock_at_block_end(&third, text("Third subblock"))
        .unwrap();

    (doc, [first, second, third])
}

/// Payloads of a tree in pre-order, root included when it has one
#[allow(dead_code)]
pub fn dfs_values(tree: &Tree<i32>) -> Vec<i32> {
    tree.dfs()
        .filter_map(|(id, _)| tree.get(id).copied())
        .collect()
}

/// Contents of every block in pre-order
#[allow(dead_code)]
pub fn preorder_contents(doc: &Document<String>) -> Vec<String> {
    doc.iter_preorder()
        .map(|(block, _)| block.content().clone())
        .collect()
}
