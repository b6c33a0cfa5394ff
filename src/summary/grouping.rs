use std::collections::{BTreeMap, HashSet};

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::models::{Category, InventoryTable};

/// Area totals for one analysis column: each distinct category value maps
/// to the summed `casfri_area` of the rows carrying it.
///
/// Bins are keyed by [`Category`], so iteration is sorted by category
/// value (numerics first, then labels) like a grouped index.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedResult {
    pub column: String,
    pub bins: BTreeMap<Category, f64>,
}

impl GroupedResult {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            bins: BTreeMap::new(),
        }
    }

    /// Add area to a category bin.
    pub fn add(&mut self, category: Category, area: f64) {
        *self.bins.entry(category).or_insert(0.0) += area;
    }

    /// Sum of all binned areas.
    pub fn total_area(&self) -> f64 {
        self.bins.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Split off CASFRI's undefined categories.
    ///
    /// Returns the cleaned result (only defined categories) and the total
    /// area of the undefined ones. When every category is undefined there
    /// is no cleaned result, only the null area.
    pub fn split_undefined(&self) -> (Option<GroupedResult>, f64) {
        let mut cleaned = GroupedResult::new(self.column.clone());
        let mut null_area = 0.0;
        for (category, &area) in &self.bins {
            if category.is_undefined() {
                null_area += area;
            } else {
                cleaned.add(category.clone(), area);
            }
        }
        if cleaned.is_empty() {
            (None, null_area)
        } else {
            (Some(cleaned), null_area)
        }
    }
}

impl Serialize for GroupedResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.bins.len()))?;
        for (category, area) in &self.bins {
            map.serialize_entry(&category.to_string(), area)?;
        }
        map.end()
    }
}

/// Group a table's rows by one analysis column and sum `casfri_area` per
/// category, optionally restricted to a single structural layer.
///
/// Rows with no value for the column are skipped, as are rows outside the
/// requested layer.
pub fn group_area_by_column(
    table: &InventoryTable,
    column: &str,
    layer: Option<i64>,
) -> GroupedResult {
    let mut grouped = GroupedResult::new(column);
    for row in &table.rows {
        if layer.is_some() && row.layer != layer {
            continue;
        }
        if let Some(category) = row.attribute(column) {
            grouped.add(category.clone(), row.casfri_area);
        }
    }
    grouped
}

/// Total `casfri_area` of a table with rows deduplicated on `cas_id`.
///
/// A stand appearing on several rows (multiple layers, multiple
/// disturbance events) contributes its area once.
pub fn deduplicated_total_area(table: &InventoryTable) -> f64 {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut total = 0.0;
    for row in &table.rows {
        if seen.insert(row.cas_id.as_str()) {
            total += row.casfri_area;
        }
    }
    total
}

/// Distinct layer ids in first-appearance order.
pub fn distinct_layers(table: &InventoryTable) -> Vec<i64> {
    let mut seen: HashSet<i64> = HashSet::new();
    let mut layers = Vec::new();
    for row in &table.rows {
        if let Some(layer) = row.layer {
            if seen.insert(layer) {
                layers.push(layer);
            }
        }
    }
    layers
}
