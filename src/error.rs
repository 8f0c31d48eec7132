//! Error types for gscores-export

use thiserror::Error;

/// Errors raised while loading documents or delivering exports.
///
/// A missing table is not an error for [`crate::TableExporter::export`], which
/// reports it as [`crate::ExportOutcome::NotFound`]. The `NotFound` variant is
/// used by callers that want a hard failure instead, such as the CLI's strict
/// mode.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The table id does not resolve in the document
    #[error("table not found: #{table_id}")]
    NotFound { table_id: String },

    /// Reading the host document or writing a delivery failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The host document could not be understood
    #[error("failed to parse {format} document: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },

    /// No parser handles the given input
    #[error("unsupported input format: {0}")]
    UnsupportedFormat(String),

    /// Escaped serialization failed in the csv writer
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ExportError {
    pub fn not_found(table_id: impl Into<String>) -> Self {
        ExportError::NotFound {
            table_id: table_id.into(),
        }
    }

    /// Check if this is the missing-table kind
    pub fn is_not_found(&self) -> bool {
        matches!(self, ExportError::NotFound { .. })
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(e: serde_json::Error) -> Self {
        ExportError::Parse {
            format: "JSON",
            message: e.to_string(),
        }
    }
}
