//! Recursive tree-to-ini serialization.
//!
//! Formatting is driven by an explicit entry-level counter threaded through
//! the recursion, not by literal container depth: root entries are level 1,
//! section bodies are level 2, and anything at level 3 or deeper flattens to
//! a delimiter-joined scalar run. Output is deterministic given the tree, the
//! delimiter table, and a fixed generation timestamp.

use crate::delimiter::Delimiters;
use crate::error::IniError;
use chrono::Local;
use log::{info, warn};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use strata_core::{Shape, classify, is_container};

/// Timestamp format for `@@@` substitution and generated file headers.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %Z";

/// Placeholder token replaced by the generation timestamp in comment values.
const TIMESTAMP_PLACEHOLDER: &str = "@@@";

/// Header prefix written when no explicit file header is supplied.
const DEFAULT_FILE_HEADER: &str = "; Config file generated at ";

/// Entry level at which containers stop expanding and flatten instead.
const FLATTEN_LEVEL: u32 = 3;

/// Serializes configuration trees into the ini dialect.
#[derive(Debug, Clone, Default)]
pub struct IniSerializer {
    delimiters: Delimiters,
    generated_at: Option<String>,
}

impl IniSerializer {
    /// A serializer with the default delimiter table.
    pub fn new() -> Self {
        Self {
            delimiters: Delimiters::new(),
            generated_at: None,
        }
    }

    /// A serializer with an explicit delimiter table.
    pub fn with_delimiters(delimiters: Delimiters) -> Self {
        Self {
            delimiters,
            generated_at: None,
        }
    }

    /// Pin the generation timestamp, making output byte-reproducible.
    pub fn with_generated_at(mut self, timestamp: impl Into<String>) -> Self {
        self.generated_at = Some(timestamp.into());
        self
    }

    /// The active delimiter table.
    pub fn delimiters(&self) -> &Delimiters {
        &self.delimiters
    }

    /// Mutable access for delimiter reconfiguration.
    pub fn delimiters_mut(&mut self) -> &mut Delimiters {
        &mut self.delimiters
    }

    /// Serialize a tree (or one filtered section of it) to ini text.
    ///
    /// When `section` is given, only the matching section body plus top-level
    /// scalar keys are emitted.
    pub fn serialize(&self, tree: &Value, section: Option<&str>) -> String {
        match tree.as_object() {
            Some(map) if !map.is_empty() => {
                let mut out = String::new();
                self.render_map(&mut out, map, 0, section);
                out
            }
            Some(_) => {
                info!("mapping is empty");
                String::new()
            }
            None => {
                warn!("cannot serialize a non-mapping root");
                String::new()
            }
        }
    }

    /// Write a generated ini file: header line, optional timestamp, body.
    ///
    /// Whole-file overwrite, not transactional; callers needing atomicity
    /// write to a temporary path and rename.
    pub fn write_file(
        &self,
        tree: &Value,
        path: impl AsRef<Path>,
        header: Option<&str>,
        timestamp: bool,
    ) -> Result<(), IniError> {
        let mut contents = String::from(header.unwrap_or(DEFAULT_FILE_HEADER));
        if timestamp {
            contents.push_str(&self.generation_timestamp());
        }
        contents.push('\n');
        contents.push_str(&self.serialize(tree, None));
        fs::write(path, contents).map_err(IniError::WriteFailed)
    }

    fn render_map(&self, out: &mut String, map: &Map<String, Value>, level: u32, section: Option<&str>) {
        let level = level + 1;
        for (key, value) in scalars_first(map) {
            if key.starts_with(';') {
                self.render_comment(out, value);
                continue;
            }
            if !is_container(value) {
                out.push_str(&format!("{key} = {}\n", format_scalar(value)));
                continue;
            }
            if level == 1 {
                match value.as_object() {
                    Some(body) => {
                        // Empty sections are dropped rather than emitted headerless.
                        if section.is_none_or(|wanted| wanted == key) && !body.is_empty() {
                            out.push_str(&format!("\n[{key}]\n"));
                            self.render_map(out, body, level, None);
                        }
                    }
                    None => self.render_bracketed(out, key, value, level),
                }
            } else if level >= FLATTEN_LEVEL {
                out.push_str(&format!("{key} = \"{}\"\n", self.flatten(value, level)));
            } else {
                self.render_bracketed(out, key, value, level);
            }
        }
    }

    /// Expand a container entry into bracket-path lines.
    ///
    /// `level` is the entry level of the container itself; its elements sit
    /// one level deeper and flatten once they reach the threshold.
    fn render_bracketed(&self, out: &mut String, label: &str, value: &Value, level: u32) {
        let element_level = level + 1;
        match classify(value) {
            Shape::Empty => {}
            Shape::Sequential => {
                for item in sequential_items(value) {
                    if !is_container(item) {
                        out.push_str(&format!("{label}[] = {}\n", format_scalar(item)));
                    } else if element_level >= FLATTEN_LEVEL {
                        out.push_str(&format!(
                            "{label}[] = \"{}\"\n",
                            self.flatten(item, element_level)
                        ));
                    } else {
                        self.render_bracketed(out, &format!("{label}[]"), item, element_level);
                    }
                }
            }
            Shape::Numeric | Shape::Associative => {
                let entries = value.as_object().expect("numeric and associative shapes are mappings");
                for (sub, item) in entries {
                    if !is_container(item) {
                        out.push_str(&format!("{label}[{sub}] = {}\n", format_scalar(item)));
                    } else if element_level >= FLATTEN_LEVEL {
                        out.push_str(&format!(
                            "{label}[{sub}] = \"{}\"\n",
                            self.flatten(item, element_level)
                        ));
                    } else {
                        self.render_bracketed(out, &format!("{label}[{sub}]"), item, element_level);
                    }
                }
            }
        }
    }

    /// Join every leaf scalar of a subtree with level-appropriate delimiters.
    ///
    /// Nested containers join at the next-deeper level, which is what the
    /// deserializer's recursive split inverts. Structure below the threshold
    /// is only recoverable up to that splitting.
    fn flatten(&self, value: &Value, level: u32) -> String {
        let delimiter = match self.delimiters.get(level) {
            Some(token) => token.to_string(),
            None => {
                warn!("no delimiter configured for level {level}; joining without one");
                String::new()
            }
        };
        let children: Vec<&Value> = match value {
            Value::Array(items) => items.iter().collect(),
            Value::Object(map) => map.values().collect(),
            _ => Vec::new(),
        };
        let parts: Vec<String> = children
            .into_iter()
            .map(|child| {
                if is_container(child) {
                    self.flatten(child, level + 1)
                } else {
                    bare_scalar(child)
                }
            })
            .collect();
        parts.join(&delimiter)
    }

    fn render_comment(&self, out: &mut String, value: &Value) {
        let text = bare_scalar(value).replace(TIMESTAMP_PLACEHOLDER, &self.generation_timestamp());
        out.push_str(&format!("; {text}\n"));
    }

    fn generation_timestamp(&self) -> String {
        self.generated_at
            .clone()
            .unwrap_or_else(|| Local::now().format(TIMESTAMP_FORMAT).to_string())
    }
}

/// Typed scalar formatting: quoted strings, bare numbers and booleans.
fn format_scalar(value: &Value) -> String {
    match value {
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::String(text) => format!("\"{text}\""),
        _ => "null".to_string(),
    }
}

/// Scalar text without quoting, used inside delimiter-joined runs.
fn bare_scalar(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => format_scalar(other),
    }
}

/// Stable ordering that lists scalar-valued keys before container-valued
/// ones, so section bodies show flat keys before sub-tables.
fn scalars_first(map: &Map<String, Value>) -> Vec<(&String, &Value)> {
    let (scalars, containers): (Vec<_>, Vec<_>) =
        map.iter().partition(|(_, value)| !is_container(value));
    scalars.into_iter().chain(containers).collect()
}

fn sequential_items(value: &Value) -> Box<dyn Iterator<Item = &Value> + '_> {
    match value {
        Value::Array(items) => Box::new(items.iter()),
        Value::Object(map) => Box::new(map.values()),
        _ => Box::new(std::iter::empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn serializer() -> IniSerializer {
        IniSerializer::new()
    }

    #[test]
    fn scalars_format_by_type() {
        let tree = json!({
            "flag": true,
            "count": 3,
            "ratio": 0.5,
            "name": "strata",
            "missing": null,
        });
        let text = serializer().serialize(&tree, None);
        assert_eq!(
            text,
            "flag = true\ncount = 3\nratio = 0.5\nname = \"strata\"\nmissing = null\n"
        );
    }

    #[test]
    fn scalar_keys_precede_sections() {
        let tree = json!({"db": {"host": "localhost"}, "debug": true});
        let text = serializer().serialize(&tree, None);
        assert_eq!(text, "debug = true\n\n[db]\nhost = \"localhost\"\n");
    }

    #[test]
    fn section_filter_keeps_top_level_scalars() {
        let tree = json!({
            "debug": true,
            "db": {"host": "localhost"},
            "web": {"port": 80},
        });
        let text = serializer().serialize(&tree, Some("db"));
        assert!(text.contains("debug = true\n"));
        assert!(text.contains("[db]\n"));
        assert!(!text.contains("[web]"));
        assert!(!text.contains("port"));
    }

    #[test]
    fn level_two_mappings_use_bracket_paths() {
        let tree = json!({"db": {"opts": {"cache": true, "retries": 2}}});
        let text = serializer().serialize(&tree, None);
        assert_eq!(
            text,
            "\n[db]\nopts[cache] = true\nopts[retries] = 2\n"
        );
    }

    #[test]
    fn level_two_sequences_use_append_brackets() {
        let tree = json!({"db": {"replicas": ["one", "two"]}});
        let text = serializer().serialize(&tree, None);
        assert_eq!(text, "\n[db]\nreplicas[] = \"one\"\nreplicas[] = \"two\"\n");
    }

    #[test]
    fn level_three_sequences_flatten_with_the_level_delimiter() {
        let tree = json!({"section": {"inner": {"list": ["x", "y", "z"]}}});
        let text = serializer().serialize(&tree, None);
        assert_eq!(text, "\n[section]\ninner[list] = \"x◉y◉z\"\n");
    }

    #[test]
    fn nested_flattening_uses_deeper_delimiters() {
        let tree = json!({"section": {"inner": {"list": ["x", ["a", "b"], "z"]}}});
        let text = serializer().serialize(&tree, None);
        assert_eq!(text, "\n[section]\ninner[list] = \"x◉a✔b◉z\"\n");
    }

    #[test]
    fn numeric_shapes_keep_their_integer_keys() {
        let tree = json!({"db": {"slots": {"0": "a", "2": "b"}}});
        let text = serializer().serialize(&tree, None);
        assert_eq!(text, "\n[db]\nslots[0] = \"a\"\nslots[2] = \"b\"\n");
    }

    #[test]
    fn top_level_sequences_expand_without_a_header() {
        let tree = json!({"list": ["x", "y"]});
        let text = serializer().serialize(&tree, None);
        assert_eq!(text, "list[] = \"x\"\nlist[] = \"y\"\n");
    }

    #[test]
    fn comment_keys_pass_through_with_timestamp_substitution() {
        let tree = json!({";gen": "generated at @@@", "key": 1});
        let text = IniSerializer::new()
            .with_generated_at("2020-01-01 00:00:00 UTC")
            .serialize(&tree, None);
        assert_eq!(
            text,
            "; generated at 2020-01-01 00:00:00 UTC\nkey = 1\n"
        );
    }

    #[test]
    fn empty_sections_are_dropped() {
        let tree = json!({"db": {}, "debug": true});
        let text = serializer().serialize(&tree, None);
        assert_eq!(text, "debug = true\n");
    }

    #[test]
    fn non_mapping_roots_serialize_to_nothing() {
        assert_eq!(serializer().serialize(&json!(["a"]), None), "");
        assert_eq!(serializer().serialize(&json!({}), None), "");
    }

    #[test]
    fn generated_files_carry_a_header_line() {
        let temp = tempfile::TempDir::new().expect("tmp");
        let path = temp.path().join("out.ini");
        IniSerializer::new()
            .with_generated_at("2020-01-01 00:00:00 UTC")
            .write_file(&json!({"key": 1}), &path, None, true)
            .expect("write");
        let contents = std::fs::read_to_string(&path).expect("read");
        assert_eq!(
            contents,
            "; Config file generated at 2020-01-01 00:00:00 UTC\nkey = 1\n"
        );
    }

    #[test]
    fn output_is_reproducible() {
        let tree = json!({"db": {"host": "localhost"}, ";gen": "run @@@"});
        let first = IniSerializer::new()
            .with_generated_at("fixed")
            .serialize(&tree, None);
        let second = IniSerializer::new()
            .with_generated_at("fixed")
            .serialize(&tree, None);
        assert_eq!(first, second);
    }
}
