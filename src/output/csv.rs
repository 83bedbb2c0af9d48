//! CSV report writer.

use crate::error::{Error, Result};
use crate::output::{COLUMNS, ReportRow, ReportWriter};
use std::io::Write;

/// Writes one CSV record per workflow, header first.
pub struct CsvReport<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvReport<W> {
    /// Create a CSV report over `out`.
    pub fn new(out: W) -> Self {
        let writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .quote_style(csv::QuoteStyle::Necessary)
            .from_writer(out);
        Self { writer }
    }
}

impl<W: Write> ReportWriter for CsvReport<W> {
    fn write_header(&mut self, _total: usize) -> Result<()> {
        self.writer
            .write_record(COLUMNS)
            .map_err(|e| Error::ReportWrite { source: e })
    }

    fn write_row(&mut self, row: &ReportRow) -> Result<()> {
        self.writer
            .write_record(row.values())
            .map_err(|e| Error::ReportWrite { source: e })
    }

    fn finalize(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
