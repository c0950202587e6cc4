//! Ini text to tree deserialization.
//!
//! Parses the typed-ini grammar, then undoes the serializer's deep-nesting
//! compaction: any string containing the level-3 delimiter splits into a
//! sequence, and each part splits again at the next-deeper level. This is
//! lossy in the same direction as flattening — only what delimiter splitting
//! preserves comes back.

use crate::delimiter::Delimiters;
use crate::error::IniError;
use crate::grammar;
use log::debug;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Level the expansion starts at; flattening never happens shallower.
const EXPAND_LEVEL: u32 = 3;

/// Parse ini text into a nested tree, expanding delimiter-joined runs.
pub fn from_str(text: &str, delimiters: &Delimiters) -> Value {
    debug!("deserializing ini text (len={})", text.len());
    expand(grammar::parse_document(text), EXPAND_LEVEL, delimiters)
}

/// Read and parse an ini file, expanding delimiter-joined runs.
pub fn from_file(path: impl AsRef<Path>, delimiters: &Delimiters) -> Result<Value, IniError> {
    debug!("deserializing ini file: {}", path.as_ref().display());
    let contents = fs::read_to_string(path)?;
    Ok(from_str(&contents, delimiters))
}

/// Recursively split delimiter-joined strings back into sequences.
///
/// The flattening context is gone at this point, so every string is tried
/// against the level-3 delimiter regardless of its depth in the parsed tree.
fn expand(value: Value, level: u32, delimiters: &Delimiters) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key, expand(value, level, delimiters)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| expand(item, level, delimiters))
                .collect(),
        ),
        Value::String(text) => expand_string(text, level, delimiters),
        other => other,
    }
}

fn expand_string(text: String, level: u32, delimiters: &Delimiters) -> Value {
    match delimiters.get(level) {
        Some(delimiter) if !delimiter.is_empty() && text.contains(delimiter) => Value::Array(
            text.split(delimiter)
                .map(|part| expand_part(part, level + 1, delimiters))
                .collect(),
        ),
        _ => Value::String(text),
    }
}

/// A split part is either joined again at a deeper level or re-typed as a
/// scalar (numeric and boolean text regain their types).
fn expand_part(part: &str, level: u32, delimiters: &Delimiters) -> Value {
    if let Some(delimiter) = delimiters.get(level)
        && !delimiter.is_empty()
        && part.contains(delimiter)
    {
        return Value::Array(
            part.split(delimiter)
                .map(|nested| expand_part(nested, level + 1, delimiters))
                .collect(),
        );
    }
    grammar::parse_scalar(part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ser::IniSerializer;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn plain_documents_parse_without_expansion() {
        let tree = from_str("[db]\nhost = \"localhost\"\nport = 5432\n", &Delimiters::new());
        assert_eq!(tree, json!({"db": {"host": "localhost", "port": 5432}}));
    }

    #[test]
    fn delimited_values_split_into_sequences() {
        let tree = from_str("list = \"x◉y◉z\"\n", &Delimiters::new());
        assert_eq!(tree, json!({"list": ["x", "y", "z"]}));
    }

    #[test]
    fn nested_delimiters_split_recursively() {
        let tree = from_str("list = \"x◉a✔b◉z\"\n", &Delimiters::new());
        assert_eq!(tree, json!({"list": ["x", ["a", "b"], "z"]}));
    }

    #[test]
    fn split_parts_regain_scalar_types() {
        let tree = from_str("list = \"1◉2.5◉true◉text\"\n", &Delimiters::new());
        assert_eq!(tree, json!({"list": [1, 2.5, true, "text"]}));
    }

    #[test]
    fn shallow_trees_round_trip() {
        let tree = json!({
            "debug": true,
            "retries": 3,
            "ratio": 0.5,
            "name": "strata",
            "db": {
                "host": "localhost",
                "port": 5432,
                "replicas": ["one", "two"],
                "opts": {"cache": true, "size": 8},
            },
        });
        let text = IniSerializer::new().serialize(&tree, None);
        let parsed = from_str(&text, &Delimiters::new());
        assert_eq!(parsed, tree);
    }

    #[test]
    fn level_three_flattening_round_trips() {
        let tree = json!({"section": {"inner": {"list": ["x", "y", "z"]}}});
        let text = IniSerializer::new().serialize(&tree, None);
        let parsed = from_str(&text, &Delimiters::new());
        assert_eq!(parsed, tree);
    }

    #[test]
    fn delimiter_collisions_corrupt_the_round_trip() {
        // Known limitation: delimiters are not escaped, so a literal value
        // containing one splits on the way back.
        let tree = json!({"section": {"inner": {"list": ["a◉b", "c"]}}});
        let text = IniSerializer::new().serialize(&tree, None);
        let parsed = from_str(&text, &Delimiters::new());
        assert_eq!(
            parsed,
            json!({"section": {"inner": {"list": ["a", "b", "c"]}}})
        );
    }

    #[test]
    fn files_parse_like_text() {
        let temp = TempDir::new().expect("tmp");
        let path = temp.path().join("sample.ini");
        std::fs::write(&path, "[db]\nhost = \"localhost\"\n").expect("write");
        let tree = from_file(&path, &Delimiters::new()).expect("parse");
        assert_eq!(tree, json!({"db": {"host": "localhost"}}));
    }

    #[test]
    fn missing_files_report_read_errors() {
        let temp = TempDir::new().expect("tmp");
        let missing = temp.path().join("absent.ini");
        assert!(from_file(&missing, &Delimiters::new()).is_err());
    }
}
