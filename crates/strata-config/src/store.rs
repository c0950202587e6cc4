//! Read/write store over a resolved configuration tree.

use crate::resolver::merge;
use log::error;
use serde_json::Value;
use strata_core::Address;

/// The merged result of one or more sources for a logical name.
///
/// Callers read and write through key/section/subsection addressing; the
/// backing tree is never handed out mutably. Missing keys resolve to `None`,
/// never an error.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    data: Value,
}

impl ResolvedConfig {
    pub(crate) fn new(data: Value) -> Self {
        Self { data }
    }

    /// Borrow the whole backing tree.
    pub fn tree(&self) -> &Value {
        &self.data
    }

    /// Consume the store and take the backing tree.
    pub fn into_tree(self) -> Value {
        self.data
    }

    /// Look up a value; the key `"all"` (any case) returns the whole tree.
    pub fn get(&self, key: &str, section: Option<&str>, subsection: Option<&str>) -> Option<&Value> {
        if key.eq_ignore_ascii_case("all") {
            return Some(&self.data);
        }
        Address::new(key, section, subsection).lookup(&self.data)
    }

    /// Whether an entry exists at the resolved address.
    pub fn key_exists(&self, key: &str, section: Option<&str>, subsection: Option<&str>) -> bool {
        Address::new(key, section, subsection).contains(&self.data)
    }

    /// Write a value, creating intermediate mappings as needed.
    ///
    /// Always returns the store for chaining; an empty key logs an error and
    /// leaves the tree untouched.
    pub fn set(
        &mut self,
        key: &str,
        value: Value,
        section: Option<&str>,
        subsection: Option<&str>,
    ) -> &mut Self {
        if key.is_empty() {
            error!("invalid arguments supplied to set: empty key");
            return self;
        }
        Address::new(key, section, subsection).assign(&mut self.data, value);
        self
    }

    /// Deep-merge an overlay tree into this configuration (partial re-load).
    pub fn merge_overlay(&mut self, overlay: &Value) -> &mut Self {
        merge::merge_values(&mut self.data, overlay);
        self
    }
}
