//! Status lines printed while running workflow actions.

use crate::service::{WorkflowRecord, status_name};
use chrono::{DateTime, TimeZone};
use std::fmt::Display;

const TIME_FORMAT: &str = "%m/%d/%Y %H:%M:%S";

fn display_message(record: &WorkflowRecord) -> &str {
    if !record.message.is_empty() {
        &record.message
    } else {
        record.status_name().unwrap_or("NA")
    }
}

/// Format one status line.
///
/// Records with an id are shown with it; `long` then adds process and
/// description on indented lines. Records without an id show the status
/// code and, when known, the response code.
pub fn status_line<Tz>(
    record: &WorkflowRecord,
    response_code: Option<u16>,
    long: bool,
    now: &DateTime<Tz>,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let time = now.format(TIME_FORMAT);
    let message = display_message(record);

    if record.id > 0 {
        let mut line = format!("[{time} - Workflow ID: {}]: Message: {message}", record.id);
        if long {
            line.push_str(&format!(
                "\n\tProcess: {}\n\tDescription: {}",
                record.process, record.description
            ));
        }
        return line;
    }

    let mut line = format!("[{time}] - Message: {message}  Status Code: {}", record.status);
    if let Some(code) = response_code {
        line.push_str(&format!("  Response Code: {code}"));
    }
    line
}

/// Format an error line with the last known response code and status.
pub fn error_line(error: &dyn Display, response_code: u16, status: Option<i64>) -> String {
    let status = status.and_then(status_name).unwrap_or("NA");
    format!("Exception: {error}, Response Code {response_code}, Status {status}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2017, 2, 8, 0, 57, 16).unwrap()
    }

    #[test]
    fn test_record_without_id() {
        let record = WorkflowRecord::with_message("503: Internal server error");
        assert_eq!(
            status_line(&record, Some(503), false, &now()),
            "[02/08/2017 00:57:16] - Message: 503: Internal server error  Status Code: 0  \
             Response Code: 503"
        );
        assert_eq!(
            status_line(&WorkflowRecord::default(), None, true, &now()),
            "[02/08/2017 00:57:16] - Message: NA  Status Code: 0"
        );
    }

    #[test]
    fn test_record_with_id() {
        let record = WorkflowRecord {
            id: 42,
            status: 10_000,
            process: "snapgatk".to_string(),
            description: "trio".to_string(),
            ..WorkflowRecord::default()
        };
        assert_eq!(
            status_line(&record, Some(200), false, &now()),
            "[02/08/2017 00:57:16 - Workflow ID: 42]: Message: In progress"
        );
        assert_eq!(
            status_line(&record, None, true, &now()),
            "[02/08/2017 00:57:16 - Workflow ID: 42]: Message: In progress\n\
             \tProcess: snapgatk\n\tDescription: trio"
        );
    }

    #[test]
    fn test_error_line() {
        assert_eq!(
            error_line(&"timed out", 0, None),
            "Exception: timed out, Response Code 0, Status NA"
        );
        assert_eq!(
            error_line(&"boom", 200, Some(50_000)),
            "Exception: boom, Response Code 200, Status Failed"
        );
    }
}
