//! Date handling for workflow reports.

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};

/// Timestamp layout used by the service, fractional seconds excluded.
const SERVICE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// RFC 1123 layout with a literal GMT zone.
const RFC1123_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Parse a service timestamp such as `2017-02-08T00:57:16.3403168+00:00`.
///
/// Everything from the first `.` on is dropped and the rest is read as UTC.
pub fn parse_service_date(value: &str) -> Option<DateTime<Utc>> {
    let whole_seconds = value.split('.').next().unwrap_or(value).trim();
    NaiveDateTime::parse_from_str(whole_seconds, SERVICE_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Format as RFC 1123 (`Wed, 08 Feb 2017 00:57:16 GMT`); `None` gives an empty string.
pub fn format_rfc1123(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|date| date.format(RFC1123_FORMAT).to_string())
        .unwrap_or_default()
}

/// Time from `created` to `end`, or to `now` for unfinished workflows.
pub fn wall_clock(
    created: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> TimeDelta {
    end.unwrap_or(now) - created
}

/// Format a duration as `<h>h <m>m <s>s`; negative durations count as zero.
pub fn format_wall_clock(elapsed: TimeDelta) -> String {
    let total = elapsed.num_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours}h {minutes}m {seconds}s")
}
