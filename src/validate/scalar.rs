//! Scalar option validators.

/// Require a value that is not empty after trimming; returns the trimmed value.
pub fn parse_non_empty(s: &str) -> Result<String, String> {
    let value = s.trim();
    if value.is_empty() {
        return Err("a non-empty, non-whitespace string is expected".to_string());
    }
    Ok(value.to_string())
}

/// Parse a case-insensitive `true`/`false`.
///
/// An empty value yields `Ok(None)` so that defaults are kept when a
/// setting is present but blank.
pub fn parse_bool(s: &str) -> Result<Option<bool>, String> {
    let value = s.trim();
    if value.is_empty() {
        return Ok(None);
    }
    if value.eq_ignore_ascii_case("true") {
        Ok(Some(true))
    } else if value.eq_ignore_ascii_case("false") {
        Ok(Some(false))
    } else {
        Err(format!("a 'true' or 'false' is expected, got '{value}'"))
    }
}

/// Parse a strictly positive integer.
pub fn parse_positive_int(s: &str) -> Result<u32, String> {
    let value = s.trim();
    let parsed: i64 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a valid integer"))?;

    if parsed <= 0 {
        return Err(format!("expected a positive value, got {parsed}"));
    }

    u32::try_from(parsed).map_err(|_| format!("{parsed} is too large"))
}

/// Cut a value down to `max` characters.
///
/// Returns the kept prefix and whether anything was dropped.
pub fn truncate_chars(s: &str, max: usize) -> (String, bool) {
    match s.char_indices().nth(max) {
        Some((idx, _)) => (s[..idx].to_string(), true),
        None => (s.to_string(), false),
    }
}
