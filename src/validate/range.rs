//! Parsing of list ranges.
//!
//! A range selects workflows by creation order: `0` is the oldest workflow
//! and `-1` the most recent. Either end of `start:stop` may be omitted, but
//! when both are given they must share a sign.

/// Sort direction by creation date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Oldest first.
    #[default]
    Ascending,
    /// Most recent first.
    Descending,
}

impl SortOrder {
    /// Query string form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// Paging parameters sent with a list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RangeQuery {
    /// Sort direction.
    pub order: SortOrder,
    /// Number of workflows to skip.
    pub skip: Option<u64>,
    /// Maximum number of workflows to return.
    pub top: Option<u64>,
}

impl RangeQuery {
    const fn new(order: SortOrder, skip: Option<u64>, top: Option<u64>) -> Self {
        Self { order, skip, top }
    }
}

fn parse_end(s: &str) -> Result<Option<i64>, String> {
    if s.is_empty() {
        return Ok(None);
    }
    s.parse()
        .map(Some)
        .map_err(|_| format!("'{s}' is not a valid integer"))
}

/// Parse an index (`N`) or a range (`N:M`, `N:`, `:M`).
pub fn parse_range(s: &str) -> Result<RangeQuery, String> {
    use SortOrder::{Ascending, Descending};

    let value = s.trim();
    if value.is_empty() || value == ":" {
        return Err("an index or a range is expected".to_string());
    }

    let Some((start, stop)) = value.split_once(':') else {
        let single: i64 = value
            .parse()
            .map_err(|_| format!("'{value}' is not a valid integer"))?;
        return Ok(if single < 0 {
            RangeQuery::new(Descending, Some(single.unsigned_abs() - 1), Some(1))
        } else {
            RangeQuery::new(Ascending, Some(single.unsigned_abs()), Some(1))
        });
    };

    let start = parse_end(start.trim())?;
    let stop = parse_end(stop.trim())?;

    let query = match (start, stop) {
        (None, None) => return Err("an index or a range is expected".to_string()),
        (None, Some(b)) if b < 0 => RangeQuery::new(Descending, Some(b.unsigned_abs()), None),
        (None, Some(b)) => RangeQuery::new(Ascending, None, Some(b.unsigned_abs())),
        (Some(a), None) if a < 0 => RangeQuery::new(Descending, None, Some(a.unsigned_abs())),
        (Some(a), None) => RangeQuery::new(Ascending, Some(a.unsigned_abs()), None),
        (Some(a), Some(b)) if a >= 0 && b >= 0 => RangeQuery::new(
            Ascending,
            Some(a.unsigned_abs()),
            Some(b.unsigned_abs().saturating_sub(a.unsigned_abs())),
        ),
        (Some(a), Some(b)) if a < 0 && b < 0 => RangeQuery::new(
            Descending,
            Some(b.unsigned_abs()),
            Some(a.unsigned_abs().saturating_sub(b.unsigned_abs())),
        ),
        _ => {
            return Err(
                "when a range is specified, its ends should be both non-negative or both negative"
                    .to_string(),
            );
        }
    };

    Ok(query)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::SortOrder::{Ascending, Descending};
    use super::*;

    fn q(order: SortOrder, skip: Option<u64>, top: Option<u64>) -> RangeQuery {
        RangeQuery { order, skip, top }
    }

    #[test]
    fn test_single_index() {
        for n in [0_u64, 1, 7, 100] {
            assert_eq!(
                parse_range(&n.to_string()).unwrap(),
                q(Ascending, Some(n), Some(1))
            );
        }
        for n in [1_u64, 2, 7, 100] {
            assert_eq!(
                parse_range(&format!("-{n}")).unwrap(),
                q(Descending, Some(n - 1), Some(1))
            );
        }
    }

    #[test]
    fn test_closed_non_negative_range() {
        assert_eq!(parse_range("2:5").unwrap(), q(Ascending, Some(2), Some(3)));
        assert_eq!(parse_range("5:2").unwrap(), q(Ascending, Some(5), Some(0)));
        assert_eq!(parse_range("0:0").unwrap(), q(Ascending, Some(0), Some(0)));
    }

    #[test]
    fn test_closed_negative_range() {
        assert_eq!(
            parse_range("-5:-2").unwrap(),
            q(Descending, Some(2), Some(3))
        );
        assert_eq!(
            parse_range("-2:-5").unwrap(),
            q(Descending, Some(5), Some(0))
        );
    }

    #[test]
    fn test_open_ranges() {
        assert_eq!(parse_range(":3").unwrap(), q(Ascending, None, Some(3)));
        assert_eq!(parse_range(":-3").unwrap(), q(Descending, Some(3), None));
        assert_eq!(parse_range("3:").unwrap(), q(Ascending, Some(3), None));
        assert_eq!(parse_range("-3:").unwrap(), q(Descending, None, Some(3)));
    }

    #[test]
    fn test_whitespace_around_ends() {
        assert_eq!(
            parse_range(" 1 : 4 ").unwrap(),
            q(Ascending, Some(1), Some(3))
        );
    }

    #[test]
    fn test_mixed_signs_fail() {
        let err = parse_range("-1:5").unwrap_err();
        assert!(err.contains("both non-negative or both negative"));
        assert!(parse_range("1:-5").is_err());
    }

    #[test]
    fn test_invalid_input() {
        assert!(parse_range("").is_err());
        assert!(parse_range(":").is_err());
        assert!(parse_range("abc").is_err());
        assert!(parse_range("1:x").is_err());
        assert!(parse_range("1.5").is_err());
    }
}
