//! gscores-export - Export G-Scores result tables to CSV
//!
//! Reads a rendered page (or a JSON table dump), resolves a table by its id
//! and hands a `text/csv` file to a download sink.

pub mod config;
pub mod download;
pub mod error;
pub mod export;
pub mod logging;
pub mod model;
pub mod parser;
pub mod report;
pub mod text;

pub use config::Config;
pub use error::ExportError;
pub use export::{ExportOutcome, TableExporter, DEFAULT_FILENAME};
pub use model::{Document, Table};
