//! The host view: tables addressable by id

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::table::Table;

/// Tables of one host document, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    tables: IndexMap<String, Table>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table. The first table seen under an id is kept, later
    /// duplicates are ignored. Returns whether the table was added.
    pub fn insert(&mut self, table: Table) -> bool {
        if self.tables.contains_key(&table.id) {
            tracing::debug!(table_id = %table.id, "duplicate table id ignored");
            return false;
        }
        self.tables.insert(table.id.clone(), table);
        true
    }

    /// Look up a table by id
    pub fn table(&self, id: &str) -> Option<&Table> {
        self.tables.get(id)
    }

    /// Table ids in document order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl FromIterator<Table> for Document {
    fn from_iter<I: IntoIterator<Item = Table>>(iter: I) -> Self {
        let mut doc = Document::new();
        for table in iter {
            doc.insert(table);
        }
        doc
    }
}
