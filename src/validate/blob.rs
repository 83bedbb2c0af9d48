//! Blob and container name validation.
//!
//! Names may carry an access token appended after a single `?`. Input blob
//! names and output container names may be tokened; output blob names may not.

use crate::constants::limits;

/// Separator between a name and its embedded access token.
pub const TOKEN_SEPARATOR: char = '?';

/// Where a blob name is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobRole {
    /// Read by the service; may carry a token.
    Input,
    /// Written by the service; never carries a token.
    Output,
}

/// Split a value into its name and optional embedded token.
pub fn split_token(value: &str) -> (&str, Option<&str>) {
    match value.split_once(TOKEN_SEPARATOR) {
        Some((name, token)) => (name, Some(token)),
        None => (value, None),
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '/' | '-')
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '&' | '?' | '=' | '%' | '/' | '-')
}

fn check_token(token: &str) -> Result<(), String> {
    if let Some(bad) = token.chars().find(|c| !is_token_char(*c)) {
        return Err(format!(
            "each access token should only contain alphanumeric characters, question mark, \
             equals, percent, slash, hyphen and ampersand; found '{bad}' in [{token}]"
        ));
    }
    Ok(())
}

/// Validate a blob name, returning it trimmed.
pub fn validate_blob_name(s: &str, role: BlobRole) -> Result<String, String> {
    let value = s.trim();
    if value.is_empty() {
        return Err(format!(
            "empty or whitespace-only names are not allowed; found [{s}]"
        ));
    }

    let length = value.chars().count();
    if length > limits::BLOB_NAME {
        return Err(format!(
            "maximum length is {} characters; found a value of length {length}",
            limits::BLOB_NAME
        ));
    }

    if value.starts_with('/') {
        return Err(format!(
            "blob names cannot start with a slash; found [{value}]"
        ));
    }

    let parts: Vec<&str> = value.split(TOKEN_SEPARATOR).collect();
    if parts[0].chars().any(|c| !is_name_char(c)) {
        return Err(format!(
            "each name should only contain alphanumeric characters, dot, hyphen, underscore, \
             and slash; found [{}]",
            parts[0]
        ));
    }

    match (role, parts.len()) {
        (_, 1) => {}
        (BlobRole::Input, 2) => check_token(parts[1])?,
        (BlobRole::Input, n) => {
            return Err(format!(
                "blob names cannot have more than one question mark; found {} of them",
                n - 1
            ));
        }
        (BlobRole::Output, _) => {
            return Err("an output access token can only be appended to the container name"
                .to_string());
        }
    }

    Ok(value.to_string())
}

/// Validate an optional output blob name; blank means "not set".
pub fn validate_output_blob_name(s: &str) -> Result<Option<String>, String> {
    if s.trim().is_empty() {
        return Ok(None);
    }
    validate_blob_name(s, BlobRole::Output).map(Some)
}

/// Validate a container name, returning it trimmed.
pub fn validate_container_name(s: &str, allow_token: bool) -> Result<String, String> {
    let value = s.trim();
    if value.is_empty() {
        return Err("a non-empty, non-whitespace string is expected".to_string());
    }

    let parts: Vec<&str> = value.split(TOKEN_SEPARATOR).collect();
    if parts[0].chars().any(|c| !is_name_char(c)) {
        return Err(format!(
            "container name should only contain alphanumeric characters and hyphens; found [{}]",
            parts[0]
        ));
    }

    match parts.len() {
        1 => {}
        2 if allow_token => check_token(parts[1])?,
        2 => {
            return Err(format!(
                "an access token cannot be appended to this container; found [{value}]"
            ));
        }
        n => {
            return Err(format!(
                "container names cannot have more than one question mark; found {} of them",
                n - 1
            ));
        }
    }

    Ok(value.to_string())
}
