//! Workflow list reports.

mod csv;
mod row;
mod text;
mod writer;

pub use csv::CsvReport;
pub use row::{COLUMNS, ReportRow, format_bases};
pub use text::TextReport;
pub use writer::{ReportWriter, write_report};

use crate::request::ExportFormat;
use std::io::Write;

/// Pick the report writer for an export format; plain text when unset.
pub fn report_writer<'a, W: Write + 'a>(
    format: Option<ExportFormat>,
    out: W,
) -> Box<dyn ReportWriter + 'a> {
    match format {
        Some(ExportFormat::Csv) => Box::new(CsvReport::new(out)),
        None => Box::new(TextReport::new(out)),
    }
}
