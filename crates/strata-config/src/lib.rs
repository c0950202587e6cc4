//! Configuration resolution: source discovery, format parsing, merging, and
//! the resolved read/write store.
//!
//! A caller asks for a logical name; the resolver finds the best candidate
//! file across the search path, parses it by detected format, folds in any
//! override source, and hands back a `ResolvedConfig` addressed through
//! key/section/subsection lookups.

mod error;
mod resolver;
mod service;
mod store;

/// Public error type for resolution failures.
pub use error::ConfigError;
/// Discovery, parsing, and merge entry points.
pub use resolver::{OverrideSource, Resolver, ResolverOptions, SourceDescriptor, SourceFormat};
/// Lazily-caching, dependency-injected service owning one tree per name.
pub use service::ConfigService;
/// The merged result of one or more sources.
pub use store::ResolvedConfig;
