//! JSON table dump parser
//!
//! Expects a top-level object mapping table id to an array of rows, each row
//! an array of cell values:
//!
//! ```json
//! { "scores": [["Name", "Score"], ["A", 10]] }
//! ```
//!
//! Tables keep source order. A repeated id keeps its first table, the same
//! rule the HTML reader applies.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer};
use serde_json::Value;

use crate::config::InputFormat;
use crate::error::ExportError;
use crate::model::{Cell, Document, Table};

use super::Parser;

/// Parser for JSON table dumps
pub struct JsonParser;

impl Parser for JsonParser {
    fn parse_str(&self, source: &str) -> Result<Document, ExportError> {
        let TableEntries(entries) = serde_json::from_str::<TableEntries>(source)?;
        let document = tables_to_document(entries)?;
        tracing::debug!(tables = document.len(), "parsed JSON document");
        Ok(document)
    }

    fn format(&self) -> InputFormat {
        InputFormat::Json
    }

    fn supports_extension(&self, ext: &str) -> bool {
        ext.eq_ignore_ascii_case("json")
    }
}

fn parse_error(message: impl Into<String>) -> ExportError {
    ExportError::Parse {
        format: InputFormat::Json.name(),
        message: message.into(),
    }
}

/// Top-level `(id, rows)` pairs in source order, repeated ids included
struct TableEntries(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for TableEntries {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;
        impl<'de> de::Visitor<'de> for EntriesVisitor {
            type Value = TableEntries;
            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of tables")
            }
            fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, Value>()? {
                    entries.push(entry);
                }
                Ok(TableEntries(entries))
            }
        }
        d.deserialize_map(EntriesVisitor)
    }
}

fn tables_to_document(tables: Vec<(String, Value)>) -> Result<Document, ExportError> {
    let mut document = Document::new();
    for (id, rows) in tables {
        let Value::Array(rows) = rows else {
            return Err(parse_error(format!("table \"{}\" must be an array of rows", id)));
        };

        let mut table = Table::new(id);
        for (i, row) in rows.iter().enumerate() {
            let cells = match row {
                Value::Array(values) => values.iter().map(json_value_to_cell).collect(),
                // a bare value is a one-cell row
                other => vec![json_value_to_cell(other)],
            };
            table.add_row(cells, i + 1);
        }
        document.insert(table);
    }
    Ok(document)
}

fn json_value_to_cell(value: &Value) -> Cell {
    let text = match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        // nested structures are kept as their compact JSON text
        Value::Array(_) | Value::Object(_) => value.to_string(),
    };
    Cell::data(text)
}
