//! Plain-text report writer.

use crate::error::Result;
use crate::output::{COLUMNS, ReportRow, ReportWriter};
use std::io::Write;

/// Writes a banner with the total count, then one `key : value` block per workflow.
pub struct TextReport<W: Write> {
    out: W,
}

impl<W: Write> TextReport<W> {
    /// Create a text report over `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> ReportWriter for TextReport<W> {
    fn write_header(&mut self, total: usize) -> Result<()> {
        write!(
            self.out,
            "\nWorkflow List\n-------------\nTotal Count  : {total}\n\n"
        )?;
        Ok(())
    }

    fn write_row(&mut self, row: &ReportRow) -> Result<()> {
        let block: Vec<String> = COLUMNS
            .iter()
            .zip(row.values())
            .map(|(key, value)| format!("{key:<15} : {value}"))
            .collect();
        write!(self.out, "{}\n\n", block.join("\n"))?;
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}
