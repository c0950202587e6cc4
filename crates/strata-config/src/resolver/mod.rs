//! Source discovery and merged resolution for logical config names.
//!
//! A logical name becomes a candidate filename (optionally prefixed with a
//! namespace segment), searched across the working directory and a fixed
//! configuration directory with a fixed format priority. The winning file is
//! parsed by detected format and deep-merged with any override source, later
//! sources winning at matching keys.

pub(crate) mod merge;
mod source_io;


use crate::{ConfigError, ResolvedConfig};
use directories::UserDirs;
use log::{error, info, warn};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

pub use source_io::{SourceDescriptor, SourceFormat};

/// Options controlling where candidate files are searched.
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// Working directory searched first.
    pub cwd: PathBuf,
    /// Fixed configuration directory searched second.
    pub config_dir: Option<PathBuf>,
}

impl ResolverOptions {
    /// Options rooted at a working directory, defaulting the configuration
    /// directory to `<cwd>/cfg`.
    pub fn new(cwd: impl AsRef<Path>) -> Self {
        let cwd = cwd.as_ref().to_path_buf();
        let config_dir = Some(cwd.join("cfg"));
        Self { cwd, config_dir }
    }

    /// Use an explicit configuration directory.
    pub fn with_config_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Use `~/.config/<app>` as the configuration directory when a home
    /// directory is available.
    pub fn with_user_config_dir(mut self, app: &str) -> Self {
        self.config_dir = UserDirs::new().map(|dirs| dirs.home_dir().join(".config").join(app));
        self
    }
}

/// Override source applied on top of the discovered base.
#[derive(Debug, Clone)]
pub enum OverrideSource {
    /// A logical name to rediscover; failing that, raw ini text; failing
    /// that, raw JSON text.
    Text(String),
    /// Logical names resolved recursively and merged in order.
    Paths(Vec<String>),
    /// An in-memory tree merged as-is.
    Tree(Value),
}

/// Discovers, parses, and merges configuration sources.
#[derive(Debug, Clone)]
pub struct Resolver {
    options: ResolverOptions,
}

impl Resolver {
    /// A resolver over the given search locations.
    pub fn new(options: ResolverOptions) -> Self {
        Self { options }
    }

    /// The active search locations.
    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Resolve a logical name into a merged configuration.
    ///
    /// A missing base file is only a warning when an override source can
    /// stand alone; nothing found and nothing supplied fails with
    /// [`ConfigError::NoSource`]. Parse failures contribute an empty mapping
    /// so partial configuration stays usable.
    pub fn resolve(
        &self,
        name: &str,
        namespace: Option<&str>,
        override_source: Option<OverrideSource>,
    ) -> Result<ResolvedConfig, ConfigError> {
        if name.is_empty() {
            return Err(ConfigError::InvalidArgument(
                "logical name must not be empty".to_string(),
            ));
        }
        let filename = match namespace {
            Some(namespace) if !namespace.is_empty() => format!("{namespace}/{name}"),
            _ => name.to_string(),
        };
        let discovered = source_io::discover(&self.options, &filename);
        if discovered.is_none() && override_source.is_none() {
            return Err(ConfigError::NoSource(filename));
        }
        let base = match &discovered {
            Some(descriptor) => match source_io::parse_source(descriptor) {
                Ok(value) => value,
                Err(err) => {
                    error!(
                        "error processing file {}: {err}",
                        descriptor.path.display()
                    );
                    empty_mapping()
                }
            },
            None => {
                warn!("file '{filename}' not found");
                empty_mapping()
            }
        };
        let mut merged = empty_mapping();
        merge::merge_values(&mut merged, &base);
        if let Some(source) = override_source {
            let overlay = self.resolve_override(source);
            merge::merge_values(&mut merged, &overlay);
        }
        info!("resolved configuration for '{filename}'");
        Ok(ResolvedConfig::new(merged))
    }

    /// Merge an additional source into an already-resolved configuration.
    pub fn reload_into(&self, config: &mut ResolvedConfig, source: OverrideSource) {
        let overlay = self.resolve_override(source);
        config.merge_overlay(&overlay);
    }

    /// Turn an override source into a tree, degrading to an empty mapping on
    /// failure so resolution continues.
    fn resolve_override(&self, source: OverrideSource) -> Value {
        match source {
            OverrideSource::Text(text) => {
                if let Some(descriptor) = source_io::discover(&self.options, &text) {
                    return match source_io::parse_source(&descriptor) {
                        Ok(value) => value,
                        Err(err) => {
                            error!(
                                "error processing file {}: {err}",
                                descriptor.path.display()
                            );
                            empty_mapping()
                        }
                    };
                }
                let parsed = strata_ini::parse_document(&text);
                if parsed.as_object().is_some_and(|map| !map.is_empty()) {
                    return parsed;
                }
                match json5::from_str::<Value>(&text) {
                    Ok(value) if value.is_object() => value,
                    _ => {
                        error!("unable to process override source '{text}'");
                        empty_mapping()
                    }
                }
            }
            OverrideSource::Paths(paths) => {
                let mut merged = empty_mapping();
                for path in paths {
                    match self.resolve(&path, None, None) {
                        Ok(config) => merge::merge_values(&mut merged, config.tree()),
                        Err(err) => warn!("skipping override path '{path}': {err}"),
                    }
                }
                merged
            }
            OverrideSource::Tree(value) => {
                if value.is_object() {
                    value
                } else {
                    warn!("override tree is not a mapping; ignoring");
                    empty_mapping()
                }
            }
        }
    }
}

fn empty_mapping() -> Value {
    Value::Object(Map::new())
}
