//! Ini dialect for nested configuration trees.
//!
//! Converts insertion-ordered trees to and from a flat "ini" text form:
//! section headers for level-1 mappings, bracket paths for level-2 structure,
//! and delimiter-joined scalar runs for anything nested three levels deep or
//! more. The text form is deliberately lossy below level 3; the deserializer
//! recovers structure only up to what delimiter splitting preserves.

mod de;
mod delimiter;
mod error;
mod grammar;
mod ser;

/// Deserialization entry points (text/file to tree).
pub use de::{from_file, from_str};
/// Level-indexed delimiter table with legacy compatibility rules.
pub use delimiter::Delimiters;
/// File I/O errors raised by ini reading and writing.
pub use error::IniError;
/// Typed-ini grammar shared by config loading and deserialization.
pub use grammar::{parse_document, parse_scalar};
/// Tree-to-text serialization.
pub use ser::IniSerializer;
