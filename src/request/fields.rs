//! Typed access to merged raw options.

use crate::config::{RawOptions, RawValue};
use crate::error::{Error, Result};

const REQUIRED: &str = "this argument is required";

/// Read-only view over merged options that reports failures per option.
pub(crate) struct Fields<'a> {
    raw: &'a RawOptions,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(raw: &'a RawOptions) -> Self {
        Self { raw }
    }

    /// Single value as text; lists are rejected.
    pub(crate) fn text(&self, key: &str) -> Result<Option<String>> {
        match self.raw.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_text()
                .map(Some)
                .ok_or_else(|| Error::invalid_argument(key, "expected a single value")),
        }
    }

    /// Single value passed through `parse`; `Ok(None)` when unset.
    pub(crate) fn parsed<T, F>(&self, key: &str, parse: F) -> Result<Option<T>>
    where
        F: FnOnce(&str) -> std::result::Result<T, String>,
    {
        self.text(key)?
            .map(|value| parse(&value).map_err(|msg| Error::invalid_argument(key, msg)))
            .transpose()
    }

    /// Like [`Fields::parsed`], but the option must be present.
    pub(crate) fn required<T, F>(&self, key: &str, parse: F) -> Result<T>
    where
        F: FnOnce(&str) -> std::result::Result<T, String>,
    {
        self.parsed(key, parse)?
            .ok_or_else(|| Error::invalid_argument(key, REQUIRED))
    }

    /// Optional validator that may itself map a value to "unset".
    pub(crate) fn optional<T, F>(&self, key: &str, parse: F) -> Result<Option<T>>
    where
        F: FnOnce(&str) -> std::result::Result<Option<T>, String>,
    {
        Ok(self.parsed(key, parse)?.flatten())
    }

    /// Boolean option; a native `Flag` from the settings file is taken as is.
    pub(crate) fn flag(&self, key: &str) -> Result<Option<bool>> {
        match self.raw.get(key) {
            Some(RawValue::Flag(flag)) => Ok(Some(*flag)),
            _ => self.optional(key, crate::validate::parse_bool),
        }
    }

    /// Plain text with surrounding whitespace removed; blank counts as unset.
    pub(crate) fn trimmed(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .text(key)?
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty()))
    }

    /// Multi-valued option with every item passed through `parse`.
    pub(crate) fn list<T, F>(&self, key: &str, mut parse: F) -> Result<Vec<T>>
    where
        F: FnMut(&str) -> std::result::Result<T, String>,
    {
        let Some(value) = self.raw.get(key) else {
            return Ok(Vec::new());
        };
        value
            .as_list()
            .iter()
            .map(|item| parse(item).map_err(|msg| Error::invalid_argument(key, msg)))
            .collect()
    }

    /// Like [`Fields::list`], but at least one item is needed.
    pub(crate) fn required_list<T, F>(&self, key: &str, parse: F) -> Result<Vec<T>>
    where
        F: FnMut(&str) -> std::result::Result<T, String>,
    {
        let items = self.list(key, parse)?;
        if items.is_empty() {
            return Err(Error::invalid_argument(key, REQUIRED));
        }
        Ok(items)
    }
}
