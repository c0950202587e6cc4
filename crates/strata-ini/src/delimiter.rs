//! Level-indexed delimiter policy for deep-nesting flattening.

use log::warn;
use std::collections::BTreeMap;

/// Built-in delimiter glyphs for levels 3, 4, and 5.
const DEFAULT_DELIMITERS: &[(u32, &str)] = &[(3, "◉"), (4, "✔"), (5, "❄")];

/// Lowest level that flattens; shallower lookups coerce up to it.
const MIN_LEVEL: u32 = 3;

/// Mapping from nesting level (>= 3) to the token used to join scalar leaves.
///
/// Tokens are not escaped when they occur inside joined values; a literal
/// value containing its level's delimiter corrupts the round-trip. Callers
/// pick tokens that cannot appear in their data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiters {
    table: BTreeMap<u32, String>,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self::new()
    }
}

impl Delimiters {
    /// A table seeded with the built-in defaults for levels 3 through 5.
    pub fn new() -> Self {
        let table = DEFAULT_DELIMITERS
            .iter()
            .map(|(level, token)| (*level, token.to_string()))
            .collect();
        Self { table }
    }

    /// Delimiter for a level; levels below 3 coerce to 3.
    pub fn get(&self, level: u32) -> Option<&str> {
        let level = level.max(MIN_LEVEL);
        self.table.get(&level).map(String::as_str)
    }

    /// Configure one level's delimiter. `None` defaults to level 3.
    ///
    /// Compatibility quirk, preserved: a level below 3 is shifted by +3, so
    /// callers passing 0/1/2 mean "this many levels past the flattening
    /// threshold", not an absolute level.
    pub fn set(&mut self, delimiter: impl Into<String>, level: Option<u32>) -> &mut Self {
        let delimiter = delimiter.into();
        if delimiter.is_empty() {
            warn!("ignoring empty delimiter token");
            return self;
        }
        let level = level.unwrap_or(MIN_LEVEL);
        let level = if level < MIN_LEVEL { level + MIN_LEVEL } else { level };
        self.table.insert(level, delimiter);
        self
    }

    /// Merge a whole table of level/delimiter entries.
    ///
    /// Legacy behavior, preserved: when the first supplied level is not 3 the
    /// entries are re-keyed sequentially starting at 3 before merging.
    pub fn replace(&mut self, entries: impl IntoIterator<Item = (u32, String)>) -> &mut Self {
        let entries: Vec<(u32, String)> = entries.into_iter().collect();
        let rekey = !matches!(entries.first(), Some((MIN_LEVEL, _)));
        for (position, (level, token)) in entries.into_iter().enumerate() {
            if token.is_empty() {
                warn!("ignoring empty delimiter token for level {level}");
                continue;
            }
            let level = if rekey {
                MIN_LEVEL + position as u32
            } else {
                level
            };
            self.table.insert(level, token);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_cover_levels_three_to_five() {
        let delimiters = Delimiters::new();
        assert_eq!(delimiters.get(3), Some("◉"));
        assert_eq!(delimiters.get(4), Some("✔"));
        assert_eq!(delimiters.get(5), Some("❄"));
        assert_eq!(delimiters.get(6), None);
    }

    #[test]
    fn sub_three_levels_coerce_to_three() {
        let delimiters = Delimiters::new();
        assert_eq!(delimiters.get(0), delimiters.get(3));
        assert_eq!(delimiters.get(1), delimiters.get(3));
        assert_eq!(delimiters.get(2), delimiters.get(3));
    }

    #[test]
    fn set_without_level_targets_level_three() {
        let mut delimiters = Delimiters::new();
        delimiters.set("|", None);
        assert_eq!(delimiters.get(3), Some("|"));
    }

    #[test]
    fn set_shifts_sub_three_levels_up() {
        let mut delimiters = Delimiters::new();
        delimiters.set("|", Some(1));
        assert_eq!(delimiters.get(4), Some("|"));
        assert_eq!(delimiters.get(3), Some("◉"));
    }

    #[test]
    fn set_ignores_empty_tokens() {
        let mut delimiters = Delimiters::new();
        delimiters.set("", Some(3));
        assert_eq!(delimiters.get(3), Some("◉"));
    }

    #[test]
    fn replace_rekeys_tables_not_starting_at_three() {
        let mut delimiters = Delimiters::new();
        delimiters.replace([(0, "|".to_string()), (1, "/".to_string())]);
        assert_eq!(delimiters.get(3), Some("|"));
        assert_eq!(delimiters.get(4), Some("/"));
        assert_eq!(delimiters.get(5), Some("❄"));
    }

    #[test]
    fn replace_merges_tables_starting_at_three() {
        let mut delimiters = Delimiters::new();
        delimiters.replace([(3, "|".to_string()), (5, "/".to_string())]);
        assert_eq!(delimiters.get(3), Some("|"));
        assert_eq!(delimiters.get(4), Some("✔"));
        assert_eq!(delimiters.get(5), Some("/"));
    }
}
