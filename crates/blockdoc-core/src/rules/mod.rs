//! Integrity audits
//!
//! `invariants` exposes individual finders that return every violation;
//! `validation` turns the first one into an error.

pub mod invariants;
pub mod validation;
