//! JSON outcome report

use std::io::Write;

use anyhow::Result;

use crate::export::ExportOutcome;

use super::ReportFormatter;

/// JSON report formatter
pub struct JsonReport {
    pretty: bool,
}

impl JsonReport {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonReport {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for JsonReport {
    fn render(&self, outcome: &ExportOutcome, writer: &mut dyn Write) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, outcome)?;
        } else {
            serde_json::to_writer(&mut *writer, outcome)?;
        }
        writeln!(writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::DownloadReceipt;

    #[test]
    fn test_compact_exported() {
        let outcome = ExportOutcome::Exported(DownloadReceipt {
            table_id: "scores".to_string(),
            requested_filename: "export.csv".to_string(),
            filename: "export.csv".to_string(),
            location: None,
            rows: 2,
            bytes: 26,
        });
        let mut out = Vec::new();
        JsonReport::compact().render(&outcome, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"status\":\"exported\",\"table_id\":\"scores\",\"requested_filename\":\"export.csv\",\"filename\":\"export.csv\",\"rows\":2,\"bytes\":26}\n"
        );
    }

    #[test]
    fn test_pretty_is_valid_json() {
        let outcome = ExportOutcome::NotFound {
            table_id: "t".to_string(),
        };
        let mut out = Vec::new();
        JsonReport::new().render(&outcome, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["status"], "not_found");
    }
}
