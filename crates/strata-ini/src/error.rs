//! Error types for ini file I/O.

use thiserror::Error;

/// Errors returned while reading or writing ini files.
///
/// Text-level serialization and deserialization never fail structurally;
/// malformed fragments are skipped best-effort.
#[derive(Debug, Error)]
pub enum IniError {
    /// Reading an ini file failed.
    #[error("failed to read ini file: {0}")]
    ReadFailed(#[from] std::io::Error),
    /// Writing an ini file failed.
    #[error("failed to write ini file: {0}")]
    WriteFailed(std::io::Error),
}
