use std::collections::HashMap;

use super::Category;

/// One row of an attribute table: a stand/polygon identifier, its joined
/// CASFRI area, the structural layer (where the table has one), and the
/// parsed analysis-column values.
///
/// Attribute cells that were empty in the source are absent from the map;
/// grouping skips them, mirroring how the upstream tooling drops missing
/// group keys.
#[derive(Debug, Clone)]
pub struct StandRecord {
    pub cas_id: String,
    pub layer: Option<i64>,
    pub casfri_area: f64,
    pub attributes: HashMap<String, Category>,
}

impl StandRecord {
    pub fn attribute(&self, column: &str) -> Option<&Category> {
        self.attributes.get(column)
    }
}
