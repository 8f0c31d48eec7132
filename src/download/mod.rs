//! Download targets for exported files
//!
//! A sink plays the part of the browser's save-as prompt: it receives the
//! finished bytes with a suggested name and decides where they end up.

mod directory;
mod memory;
mod stdout;

use std::path::PathBuf;

use serde::Serialize;

use crate::error::ExportError;
use crate::export::DEFAULT_FILENAME;

pub use directory::DirectorySink;
pub use memory::MemorySink;
pub use stdout::StdoutSink;

/// MIME type of exported files
pub const CSV_MIME: &str = "text/csv";

/// A file offered for download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    /// Suggested name, as given by the caller
    pub filename: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl Payload {
    /// A `text/csv` payload
    pub fn csv(filename: impl Into<String>, text: String) -> Self {
        Self {
            filename: filename.into(),
            mime: CSV_MIME,
            bytes: text.into_bytes(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Where a payload ended up
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Delivery {
    /// Name actually used, after sanitizing and de-duplication
    pub filename: String,
    /// Path on disk, if the sink wrote a file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<PathBuf>,
}

/// Trait for download targets
pub trait DownloadSink {
    /// Hand the payload to the user. Any transient resource created for the
    /// delivery is released before returning, on success and on error.
    fn deliver(&mut self, payload: &Payload) -> Result<Delivery, ExportError>;
}

impl<S: DownloadSink + ?Sized> DownloadSink for &mut S {
    fn deliver(&mut self, payload: &Payload) -> Result<Delivery, ExportError> {
        (**self).deliver(payload)
    }
}

impl<S: DownloadSink + ?Sized> DownloadSink for Box<S> {
    fn deliver(&mut self, payload: &Payload) -> Result<Delivery, ExportError> {
        (**self).deliver(payload)
    }
}

/// Make a suggested name safe to create inside a directory, the way browsers
/// do for downloads: path separators, reserved and control characters become
/// `_`, surrounding whitespace and leading dots are dropped, and an empty
/// result falls back to [`DEFAULT_FILENAME`].
pub fn sanitize_filename(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = replaced.trim().trim_start_matches('.').trim_start();
    if trimmed.is_empty() {
        DEFAULT_FILENAME.to_string()
    } else {
        trimmed.to_string()
    }
}
