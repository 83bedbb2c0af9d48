//! Raw option values as collected from the command line and settings file.

use std::collections::BTreeMap;

/// A single unvalidated option value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// A scalar given as text.
    Text(String),
    /// A multi-valued option.
    List(Vec<String>),
    /// A boolean given natively (settings file only).
    Flag(bool),
}

impl RawValue {
    /// Render a single value as text; lists are rejected.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text.clone()),
            Self::Flag(flag) => Some(flag.to_string()),
            Self::List(_) => None,
        }
    }

    /// Render as a list; whitespace separates items given as plain text.
    pub fn as_list(&self) -> Vec<String> {
        match self {
            Self::List(items) => items.clone(),
            Self::Text(text) => text.split_whitespace().map(str::to_string).collect(),
            Self::Flag(flag) => vec![flag.to_string()],
        }
    }
}

/// Normalize an option name to its storage form (`input_blob_name_1`).
pub fn normalize_key(key: &str) -> String {
    key.trim()
        .trim_start_matches('-')
        .replace('-', "_")
        .to_ascii_lowercase()
}

/// Flat mapping of option name to raw value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOptions {
    values: BTreeMap<String, RawValue>,
}

impl RawOptions {
    /// Create an empty set of options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, replacing any previous one.
    pub fn insert(&mut self, key: &str, value: RawValue) {
        self.values.insert(normalize_key(key), value);
    }

    /// Set a text value when present.
    pub fn set_text(&mut self, key: &str, value: Option<String>) {
        if let Some(value) = value {
            self.insert(key, RawValue::Text(value));
        }
    }

    /// Set a list value when present.
    pub fn set_list(&mut self, key: &str, value: Option<Vec<String>>) {
        if let Some(value) = value {
            self.insert(key, RawValue::List(value));
        }
    }

    /// Look up a value.
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.values.get(&normalize_key(key))
    }

    /// Whether a value is set.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(&normalize_key(key))
    }

    /// Option names currently set.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Fill in values that are not already set from `fallback`.
    ///
    /// Command-line options take precedence over settings file entries.
    pub fn or_fill(mut self, fallback: Self) -> Self {
        for (key, value) in fallback.values {
            self.values.entry(key).or_insert(value);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("--api-url-base"), "api_url_base");
        assert_eq!(normalize_key("Input_Blob_Name_1"), "input_blob_name_1");
    }

    #[test]
    fn test_insert_and_get_use_normalized_keys() {
        let mut options = RawOptions::new();
        options.insert("access-key", RawValue::Text("k".to_string()));
        assert_eq!(
            options.get("access_key"),
            Some(&RawValue::Text("k".to_string()))
        );
        assert!(options.contains("--access-key"));
    }

    #[test]
    fn test_or_fill_prefers_existing_values() {
        let mut cli = RawOptions::new();
        cli.set_text("poll", Some("false".to_string()));
        let mut file = RawOptions::new();
        file.insert("poll", RawValue::Flag(true));
        file.insert("sas_duration", RawValue::Text("12".to_string()));

        let merged = cli.or_fill(file);
        assert_eq!(merged.get("poll"), Some(&RawValue::Text("false".to_string())));
        assert_eq!(
            merged.get("sas_duration"),
            Some(&RawValue::Text("12".to_string()))
        );
    }

    #[test]
    fn test_value_conversions() {
        assert_eq!(RawValue::Flag(true).as_text(), Some("true".to_string()));
        assert_eq!(RawValue::List(vec![]).as_text(), None);
        assert_eq!(
            RawValue::Text("a_1.fq  b_1.fq".to_string()).as_list(),
            vec!["a_1.fq".to_string(), "b_1.fq".to_string()]
        );
    }
}
