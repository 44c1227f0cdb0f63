//! Core types shared across blockdoc facilities
//!
//! This crate provides foundational types used by the document model,
//! the error facility and the logging facility:
//!
//! - **Identifiers**: BlockId, ListenerId
//! - **Schema constants**: Canonical field keys and event names

pub mod ids;
pub mod schema;

pub use ids::{BlockId, ListenerId};
