//! Settings file loading.
//!
//! The settings file is a flat TOML table whose keys are option names:
//!
//! ```toml
//! api_url_base = "https://genomics.example.net"
//! access_key = "..."
//! process_args = "R=hg38m1x"
//! input_blob_name_1 = ["sample_1.fq.gz"]
//! input_blob_name_2 = ["sample_2.fq.gz"]
//! poll = true
//! ```

use crate::config::{RawOptions, RawValue};
use crate::error::{Error, Result};
use std::path::Path;
use tracing::{debug, warn};

fn scalar_to_text(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        toml::Value::Datetime(d) => Some(d.to_string()),
        toml::Value::Array(_) | toml::Value::Table(_) => None,
    }
}

fn convert_value(path: &Path, key: &str, value: &toml::Value) -> Result<RawValue> {
    let unsupported = |reason: &str| Error::ConfigValue {
        path: path.to_path_buf(),
        key: key.to_string(),
        reason: reason.to_string(),
    };

    match value {
        toml::Value::Boolean(b) => Ok(RawValue::Flag(*b)),
        toml::Value::Array(items) => items
            .iter()
            .map(|item| scalar_to_text(item).ok_or_else(|| unsupported("nested values are not allowed")))
            .collect::<Result<Vec<_>>>()
            .map(RawValue::List),
        toml::Value::Table(_) => Err(unsupported("tables are not allowed")),
        other => scalar_to_text(other)
            .map(RawValue::Text)
            .ok_or_else(|| unsupported("unsupported value type")),
    }
}

/// Parse settings file contents.
pub fn parse_options(contents: &str, path: &Path) -> Result<RawOptions> {
    let table: toml::Table = toml::from_str(contents).map_err(|e| Error::ConfigParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut options = RawOptions::new();
    for (key, value) in &table {
        options.insert(key, convert_value(path, key, value)?);
    }
    Ok(options)
}

/// Load options from a settings file.
pub fn load_options_file(path: &Path) -> Result<RawOptions> {
    let contents = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let options = parse_options(&contents, path)?;
    debug!(
        "Read {} setting(s) from {}",
        options.keys().count(),
        path.display()
    );
    Ok(options)
}

/// Load the settings file for this invocation.
///
/// An explicitly requested file that does not exist is skipped with a
/// warning. Without an explicit file, the platform default is read when
/// present.
pub fn load_invocation_options(explicit: Option<&Path>) -> Result<RawOptions> {
    if let Some(path) = explicit {
        if !path.is_file() {
            warn!(
                "Path '{}' is not a file or doesn't exist, not reading settings from it",
                path.display()
            );
            return Ok(RawOptions::new());
        }
        return load_options_file(path);
    }

    match super::config_file_path() {
        Ok(path) if path.is_file() => load_options_file(&path),
        _ => Ok(RawOptions::new()),
    }
}
