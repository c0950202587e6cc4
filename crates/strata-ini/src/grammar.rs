//! Typed ini grammar: section headers, typed scalars, and bracket-path keys.
//!
//! Shared by configuration file loading and ini deserialization. Parsing is
//! best-effort: comment lines and fragments that do not fit the grammar are
//! skipped with a debug log, never raised as errors.

use log::debug;
use serde_json::{Map, Number, Value};

/// One step of a bracket-suffixed key path.
enum Segment {
    /// `key[]` — append to a sequence.
    Append,
    /// `key[name]` — descend into a mapping entry.
    Key(String),
}

/// Parse typed ini text into a nested tree.
pub fn parse_document(text: &str) -> Value {
    let mut root = Map::new();
    let mut section: Option<String> = None;
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') {
            continue;
        }
        if let Some(name) = section_header(line) {
            let entry = root
                .entry(name.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            section = Some(name.to_string());
            continue;
        }
        let Some((raw_key, raw_value)) = line.split_once('=') else {
            debug!("skipping unparseable ini line: {line}");
            continue;
        };
        let value = parse_scalar(raw_value.trim());
        let (name, segments) = parse_key(raw_key.trim());
        if name.is_empty() {
            debug!("skipping ini line with empty key: {line}");
            continue;
        }
        let target = match &section {
            Some(current) => root
                .get_mut(current)
                .and_then(Value::as_object_mut)
                .expect("section entry conformed to a mapping"),
            None => &mut root,
        };
        insert(target, &name, &segments, value);
    }
    Value::Object(root)
}

/// Infer a typed scalar from raw ini text.
///
/// Double-quoted text is a string; `true`/`false`/`null` and bare numbers
/// carry their types; anything else stays a bare string.
pub fn parse_scalar(raw: &str) -> Value {
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        return Value::String(raw[1..raw.len() - 1].to_string());
    }
    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        "null" | "" => return Value::Null,
        _ => {}
    }
    if let Ok(int) = raw.parse::<i64>() {
        return Value::Number(int.into());
    }
    if let Ok(float) = raw.parse::<f64>()
        && let Some(number) = Number::from_f64(float)
    {
        return Value::Number(number);
    }
    Value::String(raw.to_string())
}

fn section_header(line: &str) -> Option<&str> {
    let inner = line.strip_prefix('[')?.strip_suffix(']')?.trim();
    if inner.is_empty() || inner.contains('[') || inner.contains(']') {
        return None;
    }
    Some(inner)
}

/// Split a raw key into its name and bracket segments.
///
/// Malformed bracket syntax degrades to treating the whole key as a plain
/// name.
fn parse_key(raw: &str) -> (String, Vec<Segment>) {
    let Some(open) = raw.find('[') else {
        return (raw.to_string(), Vec::new());
    };
    let name = raw[..open].trim_end();
    if name.is_empty() {
        return (raw.to_string(), Vec::new());
    }
    let mut segments = Vec::new();
    let mut rest = &raw[open..];
    while !rest.is_empty() {
        let stripped = match rest.strip_prefix('[') {
            Some(stripped) => stripped,
            None => {
                debug!("malformed bracket key treated as plain name: {raw}");
                return (raw.to_string(), Vec::new());
            }
        };
        let Some(close) = stripped.find(']') else {
            debug!("malformed bracket key treated as plain name: {raw}");
            return (raw.to_string(), Vec::new());
        };
        let inner = stripped[..close].trim();
        segments.push(if inner.is_empty() {
            Segment::Append
        } else {
            Segment::Key(inner.to_string())
        });
        rest = &stripped[close + 1..];
    }
    (name.to_string(), segments)
}

/// Insert a value along a bracket path, conforming slots to the container
/// kind each segment requires.
fn insert(target: &mut Map<String, Value>, name: &str, segments: &[Segment], value: Value) {
    if segments.is_empty() {
        target.insert(name.to_string(), value);
        return;
    }
    let slot = target.entry(name.to_string()).or_insert(Value::Null);
    conform(slot, &segments[0]);
    let mut current = slot;
    for index in 0..segments.len() {
        let last = index + 1 == segments.len();
        match &segments[index] {
            Segment::Append => {
                let items = current.as_array_mut().expect("slot conformed to sequence");
                if last {
                    items.push(value);
                    return;
                }
                items.push(Value::Null);
                let next = items.last_mut().expect("element just appended");
                conform(next, &segments[index + 1]);
                current = next;
            }
            Segment::Key(key) => {
                let map = current.as_object_mut().expect("slot conformed to mapping");
                if last {
                    map.insert(key.clone(), value);
                    return;
                }
                let next = map.entry(key.clone()).or_insert(Value::Null);
                conform(next, &segments[index + 1]);
                current = next;
            }
        }
    }
}

fn conform(slot: &mut Value, segment: &Segment) {
    match segment {
        Segment::Append => {
            if !slot.is_array() {
                *slot = Value::Array(Vec::new());
            }
        }
        Segment::Key(_) => {
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
        }
    }
}
