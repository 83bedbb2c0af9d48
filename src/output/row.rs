//! Report rows built from workflow records.

use crate::service::WorkflowRecord;
use crate::utils::date::{format_rfc1123, format_wall_clock, parse_service_date, wall_clock};
use chrono::{DateTime, Utc};

/// Column names, in output order.
pub const COLUMNS: [&str; 9] = [
    "Workflow ID",
    "Status",
    "Message",
    "Process",
    "Description",
    "Created Date",
    "End Date",
    "Wall Clock Time",
    "Bases Processed",
];

/// One workflow, formatted for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportRow {
    /// Workflow identifier.
    pub workflow_id: String,
    /// Status name.
    pub status: String,
    /// Service message.
    pub message: String,
    /// Process name.
    pub process: String,
    /// Description.
    pub description: String,
    /// Creation time (RFC 1123).
    pub created_date: String,
    /// Completion time (RFC 1123); empty while running.
    pub end_date: String,
    /// Elapsed time (`<h>h <m>m <s>s`).
    pub wall_clock_time: String,
    /// Processed bases with a GBase summary.
    pub bases_processed: String,
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

/// Format a base count as `127,434,222,576 (127 GBase)`.
pub fn format_bases(bases: u64) -> String {
    format!(
        "{} ({} GBase)",
        group_thousands(bases),
        group_thousands(bases / 1_000_000_000)
    )
}

impl ReportRow {
    /// Format a record; `now` closes the wall clock of unfinished workflows.
    pub fn from_record(record: &WorkflowRecord, now: DateTime<Utc>) -> Self {
        let created = record.created_date.as_deref().and_then(parse_service_date);
        let end = record.end_date.as_deref().and_then(parse_service_date);

        Self {
            workflow_id: record.id.to_string(),
            status: record.status_name().unwrap_or("NA").to_string(),
            message: record.message.clone(),
            process: record.process.clone(),
            description: record.description.clone(),
            created_date: format_rfc1123(created),
            end_date: format_rfc1123(end),
            wall_clock_time: created
                .map(|created| format_wall_clock(wall_clock(created, end, now)))
                .unwrap_or_default(),
            bases_processed: record.bases_processed.map(format_bases).unwrap_or_default(),
        }
    }

    /// Values in [`COLUMNS`] order.
    pub fn values(&self) -> [&str; 9] {
        [
            self.workflow_id.as_str(),
            self.status.as_str(),
            self.message.as_str(),
            self.process.as_str(),
            self.description.as_str(),
            self.created_date.as_str(),
            self.end_date.as_str(),
            self.wall_clock_time.as_str(),
            self.bases_processed.as_str(),
        ]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(end: Option<&str>, bases: Option<u64>) -> WorkflowRecord {
        WorkflowRecord {
            id: 3167,
            status: 20_000,
            message: String::new(),
            process: "snapgatk-20170207_1".to_string(),
            description: "process_args".to_string(),
            created_date: Some("2017-02-08T00:57:16.3403168+00:00".to_string()),
            end_date: end.map(str::to_string),
            bases_processed: bases,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2017, 2, 8, 2, 0, 0).unwrap()
    }

    #[test]
    fn test_finished_workflow() {
        let row = ReportRow::from_record(
            &record(Some("2017-02-08T01:23:37.0531197+00:00"), None),
            now(),
        );
        assert_eq!(
            row.values(),
            [
                "3167",
                "Completed successfully",
                "",
                "snapgatk-20170207_1",
                "process_args",
                "Wed, 08 Feb 2017 00:57:16 GMT",
                "Wed, 08 Feb 2017 01:23:37 GMT",
                "0h 26m 21s",
                "",
            ]
        );
    }

    #[test]
    fn test_bases_formatting() {
        let row = ReportRow::from_record(&record(None, Some(127_434_222_576)), now());
        assert_eq!(row.bases_processed, "127,434,222,576 (127 GBase)");
        assert_eq!(format_bases(999), "999 (0 GBase)");
        assert_eq!(format_bases(1_234_000_000_000), "1,234,000,000,000 (1,234 GBase)");
    }

    #[test]
    fn test_unfinished_workflow_uses_now() {
        let row = ReportRow::from_record(&record(None, None), now());
        assert_eq!(row.end_date, "");
        assert_eq!(row.wall_clock_time, "1h 2m 44s");
    }

    #[test]
    fn test_unknown_status_and_missing_dates() {
        let bare = WorkflowRecord {
            id: 5,
            status: 7,
            ..WorkflowRecord::default()
        };
        let row = ReportRow::from_record(&bare, now());
        assert_eq!(row.status, "NA");
        assert_eq!(row.created_date, "");
        assert_eq!(row.wall_clock_time, "");
    }
}
