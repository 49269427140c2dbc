use std::collections::{BTreeMap, HashMap};

/// Bidirectional text <-> integer mapping for Enumerated AVPs
///
/// Lookups are case-sensitive. When two names share a value, the first one
/// inserted wins for `value_to_text`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumTable {
    by_text: HashMap<String, i64>,
    by_value: BTreeMap<i64, String>,
}

impl EnumTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(name, value)` pairs
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for (text, value) in pairs {
            table.insert(text, value);
        }
        table
    }

    pub fn insert(&mut self, text: impl Into<String>, value: i64) {
        let text = text.into();
        self.by_value.entry(value).or_insert_with(|| text.clone());
        self.by_text.insert(text, value);
    }

    pub fn text_to_value(&self, text: &str) -> Option<i64> {
        self.by_text.get(text).copied()
    }

    pub fn value_to_text(&self, value: i64) -> Option<&str> {
        self.by_value.get(&value).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disconnect_cause() -> EnumTable {
        EnumTable::from_pairs([("REBOOTING", 0), ("BUSY", 1), ("DO_NOT_WANT_TO_TALK_TO_YOU", 2)])
    }

    #[test]
    fn test_text_to_value() {
        let table = disconnect_cause();
        assert_eq!(table.text_to_value("BUSY"), Some(1));
        assert_eq!(table.text_to_value("busy"), None);
        assert_eq!(table.text_to_value("UNKNOWN"), None);
    }

    #[test]
    fn test_value_to_text() {
        let table = disconnect_cause();
        assert_eq!(table.value_to_text(2), Some("DO_NOT_WANT_TO_TALK_TO_YOU"));
        assert_eq!(table.value_to_text(9), None);
    }

    #[test]
    fn test_alias_keeps_first_name_for_reverse_lookup() {
        let mut table = EnumTable::new();
        table.insert("INITIAL_REQUEST", 1);
        table.insert("INITIAL", 1);

        assert_eq!(table.text_to_value("INITIAL"), Some(1));
        assert_eq!(table.value_to_text(1), Some("INITIAL_REQUEST"));
        assert_eq!(table.len(), 2);
    }
}
