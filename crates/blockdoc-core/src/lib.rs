//! BlockDoc Core - hierarchical block documents with incremental checksums
//!
//! This crate provides:
//! - An arena-backed doubly linked sibling list with O(1) relinking
//! - A single-rooted ordered tree built on those lists
//! - Blocks carrying CRC-32 content, style and subtree checksums
//! - Documents that index blocks by id, keep checksums current on every
//!   edit and notify listeners
//! - Markup rendering and integrity audits

pub mod checksum;
pub mod document;
pub mod errors;
pub mod list;
pub mod logging_facility;
pub mod model;
pub mod render;
pub mod rules;
pub mod tree;

// Logging macros refer to `$crate::schema`
pub use blockdoc_core_types::schema;

// Re-export commonly used types
pub use blockdoc_core_types::{BlockId, ListenerId};
pub use document::Document;
pub use errors::{BlockDocError, ExError, ExErrorKind, Result};
pub use list::{Handle, List};
pub use model::{Block, BlockInput, Style};
pub use tree::{NodeId, Tree};
