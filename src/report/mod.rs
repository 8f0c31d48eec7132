//! Outcome reports for export runs

mod json;
mod terminal;

use std::io::Write;

use anyhow::Result;

use crate::config::ReportFormat;
use crate::export::ExportOutcome;

pub use json::JsonReport;
pub use terminal::TerminalReport;

/// Trait for outcome report formatters
pub trait ReportFormatter {
    /// Render an outcome to a writer
    fn render(&self, outcome: &ExportOutcome, writer: &mut dyn Write) -> Result<()>;
}

/// Factory for creating report formatters
pub struct ReportFactory;

impl ReportFactory {
    /// Create a formatter based on format type
    pub fn create(format: ReportFormat) -> Box<dyn ReportFormatter> {
        match format {
            ReportFormat::Terminal => Box::new(TerminalReport::new()),
            ReportFormat::Json => Box::new(JsonReport::new()),
        }
    }
}

/// Render an outcome to stderr, keeping stdout free for CSV output
pub fn render_to_stderr(outcome: &ExportOutcome, format: ReportFormat) -> Result<()> {
    let formatter = ReportFactory::create(format);
    let mut stderr = std::io::stderr();
    formatter.render(outcome, &mut stderr)
}
