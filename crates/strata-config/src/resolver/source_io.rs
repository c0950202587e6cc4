//! Candidate discovery and format-aware parsing of config sources.

use super::ResolverOptions;
use crate::ConfigError;
use log::debug;
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// On-disk format of a discovered source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Typed ini with sections and bracket keys.
    Ini,
    /// Standard JSON, order-preserving on read.
    Json,
    /// Native nested-structure file, parsed as JSON5.
    Json5,
}

impl SourceFormat {
    /// File extension tried during discovery.
    pub fn extension(self) -> &'static str {
        match self {
            SourceFormat::Ini => "ini",
            SourceFormat::Json => "json",
            SourceFormat::Json5 => "json5",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Fixed format priority during discovery: first existing file wins.
const FORMAT_PRIORITY: &[SourceFormat] =
    &[SourceFormat::Ini, SourceFormat::Json, SourceFormat::Json5];

/// A located candidate file; ephemeral, recomputed on each load.
#[derive(Debug, Clone)]
pub struct SourceDescriptor {
    /// Location on disk.
    pub path: PathBuf,
    /// Format detected from the winning extension.
    pub format: SourceFormat,
}

/// Search the working directory, then the config directory, trying formats
/// in priority order within each.
pub(super) fn discover(options: &ResolverOptions, filename: &str) -> Option<SourceDescriptor> {
    let mut locations = vec![options.cwd.clone()];
    if let Some(config_dir) = &options.config_dir {
        locations.push(config_dir.clone());
    }
    for location in locations {
        for format in FORMAT_PRIORITY {
            let path = location.join(format!("{filename}.{}", format.extension()));
            if path.exists() {
                debug!(
                    "discovered source (format={format}, path={})",
                    path.display()
                );
                return Some(SourceDescriptor {
                    path,
                    format: *format,
                });
            }
        }
    }
    None
}

/// Read and parse a discovered source in its detected format.
pub(super) fn parse_source(descriptor: &SourceDescriptor) -> Result<Value, ConfigError> {
    debug!(
        "parsing source (format={}, path={})",
        descriptor.format,
        descriptor.path.display()
    );
    let contents = fs::read_to_string(&descriptor.path)?;
    match descriptor.format {
        SourceFormat::Ini => Ok(strata_ini::parse_document(&contents)),
        SourceFormat::Json => {
            serde_json::from_str(&contents).map_err(|err| parse_failed(descriptor, err))
        }
        SourceFormat::Json5 => {
            json5::from_str(&contents).map_err(|err| parse_failed(descriptor, err))
        }
    }
}

fn parse_failed(descriptor: &SourceDescriptor, err: impl fmt::Display) -> ConfigError {
    ConfigError::ParseFailed {
        format: descriptor.format.to_string(),
        path: descriptor.path.display().to_string(),
        message: err.to_string(),
    }
}
