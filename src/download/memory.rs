//! Keep downloads in memory

use crate::error::ExportError;

use super::{Delivery, DownloadSink, Payload};

/// Collects payloads instead of writing them anywhere
#[derive(Debug, Default)]
pub struct MemorySink {
    deliveries: Vec<Payload>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every payload received, oldest first
    pub fn deliveries(&self) -> &[Payload] {
        &self.deliveries
    }

    pub fn last(&self) -> Option<&Payload> {
        self.deliveries.last()
    }

    /// Text of the most recent payload
    pub fn last_text(&self) -> Option<String> {
        self.last()
            .map(|p| String::from_utf8_lossy(&p.bytes).into_owned())
    }

    pub fn is_empty(&self) -> bool {
        self.deliveries.is_empty()
    }
}

impl DownloadSink for MemorySink {
    fn deliver(&mut self, payload: &Payload) -> Result<Delivery, ExportError> {
        self.deliveries.push(payload.clone());
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
    fn test_collects_in_order() {
        let mut sink = MemorySink::new();
        assert!(sink.is_empty());
        sink.deliver(&Payload::csv("a.csv", "1".to_string())).unwrap();
        sink.deliver(&Payload::csv("b.csv", "2".to_string())).unwrap();

        assert_eq!(sink.deliveries().len(), 2);
        assert_eq!(sink.deliveries()[0].filename, "a.csv");
        assert_eq!(sink.last_text().as_deref(), Some("2"));
    }
}
