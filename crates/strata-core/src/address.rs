//! Typed addressing into a configuration tree.
//!
//! Replaces stringly-typed section/subsection lookups with an ordered list of
//! path segments resolved against a tree walk. Missing keys resolve to `None`
//! rather than overloading a scalar value as an error signal.

use serde_json::{Map, Value};

/// An ordered outer-to-inner path of mapping keys.
///
/// Built from the classic `(key, section, subsection)` triple, including the
/// legacy aliasing rule: `section == "main"` means "treat the subsection as
/// the section and drop the subsection". Preserved for compatibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    segments: Vec<String>,
}

impl Address {
    /// Build an address from a key plus optional section and subsection.
    ///
    /// Empty strings count as absent.
    pub fn new(key: &str, section: Option<&str>, subsection: Option<&str>) -> Self {
        let mut section = non_empty(section);
        let mut subsection = non_empty(subsection);
        if section == Some("main") {
            section = subsection;
            subsection = None;
        }
        let mut segments = Vec::with_capacity(3);
        if let Some(section) = section {
            segments.push(section.to_string());
            // A subsection without a section is ignored.
            if let Some(subsection) = subsection {
                segments.push(subsection.to_string());
            }
        }
        segments.push(key.to_string());
        Self { segments }
    }

    /// The outer-to-inner segments of this address.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Walk the tree; `None` is the not-found sentinel and never panics on
    /// missing parents.
    pub fn lookup<'tree>(&self, root: &'tree Value) -> Option<&'tree Value> {
        let mut current = root;
        for segment in &self.segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Whether the address resolves to an entry, mirroring `lookup`.
    pub fn contains(&self, root: &Value) -> bool {
        self.lookup(root).is_some()
    }

    /// Write a value at this address, creating intermediate mappings.
    ///
    /// An intermediate slot holding a scalar or sequence is replaced by a
    /// mapping so the write always lands.
    pub fn assign(&self, root: &mut Value, value: Value) {
        if !root.is_object() {
            *root = Value::Object(Map::new());
        }
        let mut current = root;
        let (last, parents) = self
            .segments
            .split_last()
            .expect("address always has a key segment");
        for segment in parents {
            let map = current.as_object_mut().expect("parent slot is a mapping");
            let slot = map
                .entry(segment.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            current = slot;
        }
        let map = current.as_object_mut().expect("parent slot is a mapping");
        map.insert(last.clone(), value);
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.is_empty())
}
