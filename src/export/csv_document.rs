//! In-memory CSV text for one export

use crate::config::QuoteStyle;
use crate::error::ExportError;
use crate::model::Table;

/// Normalized cell values of one table, ready to serialize.
///
/// Row and cell cardinality mirror the source table exactly; ragged rows stay
/// ragged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvDocument {
    rows: Vec<Vec<String>>,
}

impl CsvDocument {
    /// Snapshot a table, normalizing whitespace in every cell
    pub fn from_table(table: &Table) -> Self {
        let rows = table
            .rows
            .iter()
            .map(|row| row.cells.iter().map(|cell| cell.normalized()).collect())
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Serialize: every field in double quotes, fields joined by `,`, rows
    /// joined by `\n`, no trailing newline.
    pub fn render(&self, style: QuoteStyle) -> Result<String, ExportError> {
        let lines: Vec<String> = match style {
            QuoteStyle::Verbatim => self.rows.iter().map(|r| verbatim_row(r)).collect(),
            QuoteStyle::Escaped => escaped_rows(&self.rows)?,
        };
        Ok(lines.join("\n"))
    }
}

fn verbatim_row(fields: &[String]) -> String {
    fields
        .iter()
        .map(|f| format!("\"{}\"", f))
        .collect::<Vec<_>>()
        .join(",")
}

fn escaped_rows(rows: &[Vec<String>]) -> Result<Vec<String>, ExportError> {
    let mut lines = Vec::with_capacity(rows.len());
    for row in rows {
        if row.is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Always)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        writer.write_record(row)?;
        let bytes = writer.into_inner().map_err(|e| e.into_error())?;
        let mut line = String::from_utf8_lossy(&bytes).into_owned();
        if line.ends_with('\n') {
            line.pop();
        }
        lines.push(line);
    }
    Ok(lines)
}
