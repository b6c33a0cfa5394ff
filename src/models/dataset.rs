use crate::schema::TableName;

use super::{HeaderTable, InventoryTable};

/// A fully-loaded CASFRI inventory: the `hdr` metadata table plus the five
/// attribute tables, with `casfri_area` already joined onto `eco`, `lyr`,
/// `nfl` and `dst`.
#[derive(Debug, Clone)]
pub struct CasfriDataset {
    pub hdr: HeaderTable,
    pub cas: InventoryTable,
    pub eco: InventoryTable,
    pub lyr: InventoryTable,
    pub nfl: InventoryTable,
    pub dst: InventoryTable,
}

impl CasfriDataset {
    /// Look up an attribute table by name. `hdr` is not an attribute table
    /// and returns `None`.
    pub fn table(&self, name: TableName) -> Option<&InventoryTable> {
        match name {
            TableName::Hdr => None,
            TableName::Cas => Some(&self.cas),
            TableName::Eco => Some(&self.eco),
            TableName::Lyr => Some(&self.lyr),
            TableName::Nfl => Some(&self.nfl),
            TableName::Dst => Some(&self.dst),
        }
    }
}
