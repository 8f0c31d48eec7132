//! Table, Row, and Cell data structures

use serde::{Deserialize, Serialize};

use crate::text::normalize_whitespace;

/// Which element a cell came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    /// `th`
    Header,
    /// `td`, or any cell from a source without header markup
    #[default]
    Data,
}

/// A single cell holding its rendered text as read from the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub kind: CellKind,
    /// Rendered text before whitespace normalization
    pub text: String,
}

impl Cell {
    pub fn new(kind: CellKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn data(text: impl Into<String>) -> Self {
        Self::new(CellKind::Data, text)
    }

    pub fn header(text: impl Into<String>) -> Self {
        Self::new(CellKind::Header, text)
    }

    /// Text with whitespace runs collapsed and the ends trimmed
    pub fn normalized(&self) -> String {
        normalize_whitespace(&self.text)
    }

    pub fn is_header(&self) -> bool {
        self.kind == CellKind::Header
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::data(s)
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::data(s)
    }
}

/// A row in the table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// Cells in column order
    pub cells: Vec<Cell>,
    /// Line in the source document where the row starts (1-indexed, 0 if unknown)
    pub source_line: usize,
}

impl Row {
    pub fn new(cells: Vec<Cell>, source_line: usize) -> Self {
        Self { cells, source_line }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// A read-only snapshot of one table in the host document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Lookup key assigned by the host
    pub id: String,
    /// All rows in document order, possibly ragged
    pub rows: Vec<Row>,
}

impl Table {
    /// Create a new empty table
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rows: Vec::new(),
        }
    }

    /// Build a table of data cells from plain strings
    pub fn from_rows<R, C>(id: impl Into<String>, rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let mut table = Self::new(id);
        for (i, row) in rows.into_iter().enumerate() {
            let cells = row.into_iter().map(|s| Cell::data(s)).collect();
            table.add_row(cells, i + 1);
        }
        table
    }

    /// Add a row to the table
    pub fn add_row(&mut self, cells: Vec<Cell>, source_line: usize) {
        self.rows.push(Row::new(cells, source_line));
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
