//! Validators for values passed through to the genomics process.

use crate::constants::limits;

/// Delimiter between process argument pairs.
pub const ARG_DELIMITER: char = ';';

/// Delimiter between a process argument key and its value.
pub const KEY_VALUE_DELIMITER: char = '=';

/// Required prefix of a read group line.
pub const READ_GROUP_PREFIX: &str = "@RG";

/// Validate `key=value;key=value` process arguments, returning them trimmed.
///
/// The reference (`R`) must be strictly alphanumeric. Empty segments, such as
/// the one produced by a trailing `;`, are ignored.
pub fn validate_process_args(s: &str) -> Result<String, String> {
    let value = s.trim();
    if value.is_empty() {
        return Err("a non-empty, non-whitespace string is expected".to_string());
    }

    for pair in value.split(ARG_DELIMITER).filter(|p| !p.trim().is_empty()) {
        let Some((key, arg)) = pair.split_once(KEY_VALUE_DELIMITER) else {
            return Err(format!(
                "each process argument should be a key=value pair; found [{pair}]"
            ));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("process argument without a key; found [{pair}]"));
        }
        if key == "R" && !arg.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(format!(
                "the reference should only contain alphanumeric characters; found [{value}]"
            ));
        }
    }

    Ok(value.to_string())
}

fn is_read_group_char(c: char) -> bool {
    (c.is_ascii_alphanumeric() || c.is_ascii_punctuation() || c == ' ' || c == '\t')
        && c != '='
        && c != ';'
}

/// Validate a read group line.
///
/// Blank values mean "not set". Tabs are escaped as a literal `\t` in the
/// returned value.
pub fn validate_read_group(s: &str) -> Result<Option<String>, String> {
    let value = s.trim();
    if value.is_empty() {
        return Ok(None);
    }

    let length = value.chars().count();
    if length > limits::READ_GROUP {
        return Err(format!(
            "read group line should not exceed {} characters; found {length}",
            limits::READ_GROUP
        ));
    }

    if !value.starts_with(READ_GROUP_PREFIX) {
        return Err(format!(
            "read group line should start with {READ_GROUP_PREFIX}; found [{value}]"
        ));
    }

    let illegal: String = value.chars().filter(|c| !is_read_group_char(*c)).collect();
    if !illegal.is_empty() {
        return Err(format!(
            "read group line may contain only ASCII letters and numbers, some punctuation, \
             and spaces; found illegal characters [{illegal}]"
        ));
    }

    Ok(Some(value.replace('\t', "\\t")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_process_args_valid() {
        assert_eq!(
            validate_process_args(" R=hg38m1x ").ok(),
            Some("R=hg38m1x".to_string())
        );
        assert!(validate_process_args("R=b37m1;X=some-value").is_ok());
        assert!(validate_process_args("R=b37m1;").is_ok());
    }

    #[test]
    fn test_process_args_reference_must_be_alphanumeric() {
        let err = validate_process_args("R=hg38-m1").unwrap_err();
        assert!(err.contains("alphanumeric"));
        assert!(validate_process_args("X=1;R=b37 m1").is_err());
    }

    #[test]
    fn test_process_args_other_keys_are_free_form() {
        assert!(validate_process_args("X=a-b.c").is_ok());
    }

    #[test]
    fn test_process_args_malformed() {
        assert!(validate_process_args("").is_err());
        assert!(validate_process_args("   ").is_err());
        assert!(validate_process_args("R").is_err());
        assert!(validate_process_args("=b37m1").is_err());
    }

    #[test]
    fn test_read_group_escapes_tabs() {
        let result = validate_read_group("@RG\tID:lal ala\tSM:my sample").unwrap();
        assert_eq!(result, Some("@RG\\tID:lal ala\\tSM:my sample".to_string()));
    }

    #[test]
    fn test_read_group_blank_is_unset() {
        assert_eq!(validate_read_group("").ok(), Some(None));
        assert_eq!(validate_read_group("  ").ok(), Some(None));
    }

    #[test]
    fn test_read_group_prefix() {
        assert!(validate_read_group("ID:x\tSM:y").is_err());
    }

    #[test]
    fn test_read_group_illegal_characters() {
        let err = validate_read_group("@RG\tID=x").unwrap_err();
        assert!(err.contains("[=]"));
        assert!(validate_read_group("@RG\tID:x;SM:y").is_err());
        assert!(validate_read_group("@RG\tID:ö").is_err());
    }

    #[test]
    fn test_read_group_length() {
        let line = format!("@RG{}", "a".repeat(997));
        assert!(validate_read_group(&line).is_ok());
        let line = format!("@RG{}", "a".repeat(998));
        assert!(validate_read_group(&line).is_err());
    }
}
