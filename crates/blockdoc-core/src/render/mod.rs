//! Text renderings of a document

pub mod markup;

pub use markup::{render_markup, INDENT};
