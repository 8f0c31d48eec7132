//! One-line terminal summary

use std::io::Write;

use anyhow::Result;

use crate::export::ExportOutcome;
use crate::text::format_number;

use super::ReportFormatter;

/// Plain text summary
pub struct TerminalReport;

impl TerminalReport {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TerminalReport {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for TerminalReport {
    fn render(&self, outcome: &ExportOutcome, writer: &mut dyn Write) -> Result<()> {
        match outcome {
            ExportOutcome::Exported(receipt) => {
                let target = match &receipt.location {
                    Some(path) => path.display().to_string(),
                    None => receipt.filename.clone(),
                };
                writeln!(
                    writer,
                    "exported {} {} ({} bytes) from #{} -> {}",
                    format_number(receipt.rows),
                    if receipt.rows == 1 { "row" } else { "rows" },
                    format_number(receipt.bytes),
                    receipt.table_id,
                    target
                )?;
            }
            ExportOutcome::NotFound { table_id } => {
                writeln!(writer, "table #{} not found, nothing exported", table_id)?;
            }
        }
        Ok(())
    }
}
