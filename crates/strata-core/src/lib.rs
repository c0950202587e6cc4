//! Core value model for strata configuration trees.
//!
//! A configuration tree is a plain `serde_json::Value` (with insertion-ordered
//! maps): scalars, sequences, and mappings. This crate owns the pieces the
//! rest of the workspace builds on: container shape classification and the
//! typed address used for get/set resolution.

mod address;
mod shape;

/// Typed key/section/subsection address resolved against a tree walk.
pub use address::Address;
/// Container shape classification.
pub use shape::{Shape, classify, is_container};
