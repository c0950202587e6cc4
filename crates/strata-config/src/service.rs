//! Lazily-caching configuration service.

use crate::{ConfigError, OverrideSource, Resolver, ResolverOptions, ResolvedConfig};
use log::debug;
use std::collections::HashMap;

/// Explicitly constructed owner of one resolved tree per logical name.
///
/// Replaces the classic process-wide singleton: the top-level application
/// builds one service and passes it to consumers. Trees are resolved lazily
/// on first request and reused afterwards. Single-threaded call-and-return
/// model; multi-threaded hosts wrap the service in their own exclusion.
#[derive(Debug)]
pub struct ConfigService {
    resolver: Resolver,
    cache: HashMap<String, ResolvedConfig>,
}

impl ConfigService {
    /// A service resolving against the given search locations.
    pub fn new(options: ResolverOptions) -> Self {
        Self {
            resolver: Resolver::new(options),
            cache: HashMap::new(),
        }
    }

    /// The underlying resolver.
    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// The shared configuration for a logical name, resolving it on first
    /// request.
    pub fn config(&mut self, name: &str) -> Result<&mut ResolvedConfig, ConfigError> {
        self.config_with(name, None, None)
    }

    /// Like [`ConfigService::config`], with a namespace and override source.
    ///
    /// When the name is already cached, the override source is merged into
    /// the existing tree instead of re-resolving from scratch (partial
    /// re-load).
    pub fn config_with(
        &mut self,
        name: &str,
        namespace: Option<&str>,
        override_source: Option<OverrideSource>,
    ) -> Result<&mut ResolvedConfig, ConfigError> {
        if self.cache.contains_key(name) {
            let config = self.cache.get_mut(name).expect("entry just checked");
            if let Some(source) = override_source {
                debug!("merging override into cached config '{name}'");
                self.resolver.reload_into(config, source);
            }
            return Ok(self.cache.get_mut(name).expect("entry just checked"));
        }
        let resolved = self.resolver.resolve(name, namespace, override_source)?;
        self.cache.insert(name.to_string(), resolved);
        Ok(self.cache.get_mut(name).expect("entry just inserted"))
    }

    /// Drop a cached tree so the next request re-resolves it.
    pub fn invalidate(&mut self, name: &str) -> Option<ResolvedConfig> {
        self.cache.remove(name)
    }
}
