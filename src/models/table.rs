use crate::schema::TableName;

use super::StandRecord;

/// An in-memory CASFRI attribute table (`cas`, `eco`, `lyr`, `nfl` or
/// `dst`), area already joined in.
#[derive(Debug, Clone)]
pub struct InventoryTable {
    pub name: TableName,
    /// Column names present in the source, plus `casfri_area` for tables
    /// where it was joined in.
    pub columns: Vec<String>,
    pub rows: Vec<StandRecord>,
}

impl InventoryTable {
    pub fn new(name: TableName, columns: Vec<String>, rows: Vec<StandRecord>) -> Self {
        Self {
            name,
            columns,
            rows,
        }
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The `hdr` table: free-form inventory metadata carried through to
/// reports untouched.
#[derive(Debug, Clone)]
pub struct HeaderTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl HeaderTable {
    /// Value of a header field from the first row, if present.
    pub fn field(&self, column: &str) -> Option<&str> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.rows.first()?.get(idx).map(String::as_str)
    }
}
