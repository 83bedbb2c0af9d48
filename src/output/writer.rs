//! Report writer trait definition.

use crate::error::Result;
use crate::output::ReportRow;

/// Trait for writing workflow reports.
pub trait ReportWriter {
    /// Write the report header; `total` is the number of rows that follow.
    fn write_header(&mut self, total: usize) -> Result<()>;

    /// Write a single row.
    fn write_row(&mut self, row: &ReportRow) -> Result<()>;

    /// Finalize the output (flush, close, etc.).
    fn finalize(&mut self) -> Result<()>;
}

/// Write a complete report.
pub fn write_report(writer: &mut dyn ReportWriter, rows: &[ReportRow]) -> Result<()> {
    writer.write_header(rows.len())?;
    for row in rows {
        writer.write_row(row)?;
    }
    writer.finalize()
}
