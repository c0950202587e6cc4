//! Error types for configuration resolution.

use thiserror::Error;

/// Errors returned while resolving configuration sources.
///
/// Only the total absence of data escalates to a hard failure; discovery and
/// parse problems for individual sources are logged and recovered locally so
/// partial configuration stays usable.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No file on any search path and no override supplied.
    #[error("no configuration source found for '{0}'")]
    NoSource(String),
    /// Reading a discovered file failed.
    #[error("failed to read config: {0}")]
    ReadFailed(#[from] std::io::Error),
    /// A discovered file could not be parsed in its detected format.
    #[error("failed to parse {format} config at {path}: {message}")]
    ParseFailed {
        format: String,
        path: String,
        message: String,
    },
    /// Malformed resolve arguments.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
