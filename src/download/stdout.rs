//! Stream downloads to stdout

use std::io::{self, Write};

use crate::error::ExportError;

use super::{Delivery, DownloadSink, Payload};

/// Writes payload bytes unchanged to a stream, stdout by default
pub struct StdoutSink<W: Write = io::Stdout> {
    writer: W,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self {
            writer: io::stdout(),
        }
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> StdoutSink<W> {
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DownloadSink for StdoutSink<W> {
    fn deliver(&mut self, payload: &Payload) -> Result<Delivery, ExportError> {
        self.writer.write_all(&payload.bytes)?;
        self.writer.flush()?;
        Ok(Delivery {
            filename: payload.filename.clone(),
            location: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_bytes_unchanged() {
        let mut sink = StdoutSink::with_writer(Vec::new());
        let delivery = sink
            .deliver(&Payload::csv("x.csv", "\"a\"\n\"b\"".to_string()))
            .unwrap();
        assert_eq!(delivery.filename, "x.csv");
        assert!(delivery.location.is_none());
        assert_eq!(sink.into_inner(), b"\"a\"\n\"b\"");
    }
}
