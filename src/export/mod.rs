//! Table to CSV export

mod csv_document;

use std::path::PathBuf;

use serde::Serialize;

use crate::config::QuoteStyle;
use crate::download::{DownloadSink, Payload};
use crate::error::ExportError;
use crate::model::{Document, Table};

pub use csv_document::CsvDocument;

/// Suggested name when the caller gives none
pub const DEFAULT_FILENAME: &str = "export.csv";

/// Details of a delivered export
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadReceipt {
    pub table_id: String,
    /// Name the caller suggested
    pub requested_filename: String,
    /// Name the sink used
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<PathBuf>,
    pub rows: usize,
    pub bytes: usize,
}

/// Result of one export call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExportOutcome {
    Exported(DownloadReceipt),
    /// The id did not resolve; nothing was delivered
    NotFound { table_id: String },
}

impl ExportOutcome {
    pub fn is_exported(&self) -> bool {
        matches!(self, ExportOutcome::Exported(_))
    }

    pub fn receipt(&self) -> Option<&DownloadReceipt> {
        match self {
            ExportOutcome::Exported(receipt) => Some(receipt),
            ExportOutcome::NotFound { .. } => None,
        }
    }
}

/// Exports tables from a document to a download sink.
///
/// The exporter holds no state between calls. The document is only read, so
/// exporting the same table twice yields identical bytes, though each call is
/// a separate delivery.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableExporter {
    quote_style: QuoteStyle,
}

impl TableExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quote_style(mut self, style: QuoteStyle) -> Self {
        self.quote_style = style;
        self
    }

    pub fn quote_style(&self) -> QuoteStyle {
        self.quote_style
    }

    /// CSV text for a table
    pub fn render(&self, table: &Table) -> Result<String, ExportError> {
        CsvDocument::from_table(table).render(self.quote_style)
    }

    /// Export `table_id` from `document` as `filename`.
    ///
    /// An id that does not resolve is a silent no-op: the sink is never
    /// touched and the outcome is [`ExportOutcome::NotFound`]. Errors only come
    /// from the sink.
    pub fn export<S>(
        &self,
        document: &Document,
        table_id: &str,
        filename: &str,
        sink: &mut S,
    ) -> Result<ExportOutcome, ExportError>
    where
        S: DownloadSink + ?Sized,
    {
        let Some(table) = document.table(table_id) else {
            tracing::debug!(table_id, "table not found, skipping export");
            return Ok(ExportOutcome::NotFound {
                table_id: table_id.to_string(),
            });
        };

        let csv = CsvDocument::from_table(table);
        let rows = csv.row_count();
        let payload = Payload::csv(filename, csv.render(self.quote_style)?);
        let bytes = payload.len();

        let delivery = sink.deliver(&payload)?;
        tracing::info!(table_id, rows, bytes, filename = %delivery.filename, "exported table");

        Ok(ExportOutcome::Exported(DownloadReceipt {
            table_id: table_id.to_string(),
            requested_filename: filename.to_string(),
            filename: delivery.filename,
            location: delivery.location,
            rows,
            bytes,
        }))
    }

    /// [`export`](Self::export) with [`DEFAULT_FILENAME`]
    pub fn export_default<S>(
        &self,
        document: &Document,
        table_id: &str,
        sink: &mut S,
    ) -> Result<ExportOutcome, ExportError>
    where
        S: DownloadSink + ?Sized,
    {
        self.export(document, table_id, DEFAULT_FILENAME, sink)
    }
}
