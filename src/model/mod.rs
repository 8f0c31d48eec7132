//! Data model for host tables

mod document;
mod table;

pub use document::Document;
pub use table::{Cell, CellKind, Row, Table};
