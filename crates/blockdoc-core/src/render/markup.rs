use crate::document::Document;

/// Indentation emitted per nesting level
pub const INDENT: &str = "  ";

/// Render a document as indented markup
///
/// The first line is the document name. Every block follows in pre-order,
/// indented by [`INDENT`] once per depth level, with a trailing newline.
/// Line breaks inside a block's display text are re-indented to the
/// block's depth.
pub fn render_markup<T>(doc: &Document<T>) -> String {
    let mut output = format!("{}\n", doc.name());

    for (block, depth) in doc.iter_preorder() {
        let indent = INDENT.repeat(depth);
        let text = doc
            .display_string(block)
            .replace('\n', &format!("\n{}", indent));
        output.push_str(&indent);
        output.push_str(&text);
        output.push('\n');
    }

    output
}
