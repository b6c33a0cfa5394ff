use std::collections::HashMap;

use serde::Serialize;
use tracing::info;

use crate::error::CasfriError;
use crate::models::CasfriDataset;
use crate::schema::{
    self, TableName, CAS_ANALYSIS_COLS, DST_ANALYSIS_COLS, ECO_ANALYSIS_COLS, LYR_ANALYSIS_COLS,
    LYR_SPECIES_COLS, NFL_ANALYSIS_COLS,
};

use super::grouping::{deduplicated_total_area, distinct_layers, group_area_by_column, GroupedResult};

/// Identity of one summary entry: table, optional structural layer, and
/// the analysis column that was grouped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SummaryKey {
    pub table: TableName,
    pub layer: Option<i64>,
    pub column: String,
}

impl std::fmt::Display for SummaryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.layer {
            Some(layer) => write!(f, "{}.layer_{}.{}", self.table, layer, self.column),
            None => write!(f, "{}.{}", self.table, self.column),
        }
    }
}

/// Everything stored for one key: the raw grouped result, the cleaned
/// result (absent when every category was undefined), and the undefined
/// area split out of it.
#[derive(Debug, Clone)]
pub struct SummaryRecord {
    pub raw: GroupedResult,
    pub cleaned: Option<GroupedResult>,
    pub null_area: f64,
}

/// One row of the null-accounting report for a `(table, layer)` partition.
#[derive(Debug, Clone, Serialize)]
pub struct NullSummaryRow {
    pub key: String,
    pub null_value_area: f64,
    pub total_area: f64,
    pub percent_null: f64,
}

#[derive(Debug)]
struct LayerEntry {
    layer: Option<i64>,
    keys: Vec<SummaryKey>,
}

#[derive(Debug)]
struct TableEntry {
    table: TableName,
    layers: Vec<LayerEntry>,
}

/// Area-weighted attribute summaries for one CASFRI inventory, with
/// undefined-category accounting.
///
/// The directory (table, then layer, then key) preserves insertion order
/// throughout, so reports and exports iterate deterministically. Each key
/// owns a single [`SummaryRecord`]; raw result, cleaned result and null
/// area can never go out of sync.
#[derive(Debug)]
pub struct SummaryAccumulator {
    directory: Vec<TableEntry>,
    records: HashMap<SummaryKey, SummaryRecord>,
    table_totals: HashMap<TableName, f64>,
}

impl SummaryAccumulator {
    /// An empty accumulator with precomputed per-table area totals (the
    /// denominators for percent-null reporting).
    pub fn new(table_totals: HashMap<TableName, f64>) -> Self {
        Self {
            directory: Vec::new(),
            records: HashMap::new(),
            table_totals,
        }
    }

    /// Compile the full summary for a dataset.
    ///
    /// Validates the dataset against the static schema first, computes the
    /// deduplicated area total per attribute table, then groups every
    /// analysis column: `cas` and `eco` once, `lyr` (structural columns,
    /// then species components), `nfl` and `dst` once per distinct layer.
    pub fn compile(dataset: &CasfriDataset) -> Result<Self, CasfriError> {
        schema::validate(dataset)?;

        let mut table_totals = HashMap::new();
        for name in schema::ATTRIBUTE_TABLES {
            if let Some(table) = dataset.table(name) {
                table_totals.insert(name, deduplicated_total_area(table));
            }
        }
        let mut acc = SummaryAccumulator::new(table_totals);

        info!("summarizing cas");
        for column in CAS_ANALYSIS_COLS {
            let grouped = group_area_by_column(&dataset.cas, column, None);
            acc.insert(grouped, TableName::Cas, None)?;
        }

        info!("summarizing eco");
        for column in ECO_ANALYSIS_COLS {
            let grouped = group_area_by_column(&dataset.eco, column, None);
            acc.insert(grouped, TableName::Eco, None)?;
        }

        info!("summarizing lyr");
        let lyr_layers = distinct_layers(&dataset.lyr);
        for &layer in &lyr_layers {
            for column in LYR_ANALYSIS_COLS {
                let grouped = group_area_by_column(&dataset.lyr, column, Some(layer));
                acc.insert(grouped, TableName::Lyr, Some(layer))?;
            }
        }

        info!("summarizing lyr species components");
        for &layer in &lyr_layers {
            for column in LYR_SPECIES_COLS {
                let grouped = group_area_by_column(&dataset.lyr, column, Some(layer));
                acc.insert(grouped, TableName::Lyr, Some(layer))?;
            }
        }

        info!("summarizing nfl");
        for layer in distinct_layers(&dataset.nfl) {
            for column in NFL_ANALYSIS_COLS {
                let grouped = group_area_by_column(&dataset.nfl, column, Some(layer));
                acc.insert(grouped, TableName::Nfl, Some(layer))?;
            }
        }

        info!("summarizing dst");
        for layer in distinct_layers(&dataset.dst) {
            for column in DST_ANALYSIS_COLS {
                let grouped = group_area_by_column(&dataset.dst, column, Some(layer));
                acc.insert(grouped, TableName::Dst, Some(layer))?;
            }
        }

        Ok(acc)
    }

    /// Insert one grouped result under `(table, layer, column)`.
    ///
    /// Classifies undefined categories, registers the key in the
    /// directory, and stores the record. A second insert for the same key
    /// fails with [`CasfriError::DuplicateKey`] and leaves the first entry
    /// intact.
    pub fn insert(
        &mut self,
        grouped: GroupedResult,
        table: TableName,
        layer: Option<i64>,
    ) -> Result<(), CasfriError> {
        let key = SummaryKey {
            table,
            layer,
            column: grouped.column.clone(),
        };
        if self.records.contains_key(&key) {
            return Err(CasfriError::DuplicateKey(key.to_string()));
        }

        let table_idx = match self.directory.iter().position(|e| e.table == table) {
            Some(idx) => idx,
            None => {
                self.directory.push(TableEntry {
                    table,
                    layers: Vec::new(),
                });
                self.directory.len() - 1
            }
        };
        let table_entry = &mut self.directory[table_idx];
        let layer_idx = match table_entry.layers.iter().position(|e| e.layer == layer) {
            Some(idx) => idx,
            None => {
                table_entry.layers.push(LayerEntry {
                    layer,
                    keys: Vec::new(),
                });
                table_entry.layers.len() - 1
            }
        };
        table_entry.layers[layer_idx].keys.push(key.clone());

        let (cleaned, null_area) = grouped.split_undefined();
        self.records.insert(
            key,
            SummaryRecord {
                raw: grouped,
                cleaned,
                null_area,
            },
        );
        Ok(())
    }

    /// Tables with at least one summary entry, in insertion order.
    pub fn tables(&self) -> Vec<TableName> {
        self.directory.iter().map(|e| e.table).collect()
    }

    /// Layer partitions recorded for a table, in insertion order.
    pub fn layers(&self, table: TableName) -> Result<Vec<Option<i64>>, CasfriError> {
        let entry = self.table_entry(table)?;
        Ok(entry.layers.iter().map(|l| l.layer).collect())
    }

    /// Deduplicated area total for a table, if known.
    pub fn table_total(&self, table: TableName) -> Option<f64> {
        self.table_totals.get(&table).copied()
    }

    /// Null accounting for one `(table, layer)` partition.
    ///
    /// One row per key, with the undefined area, the table's deduplicated
    /// area total, and the percentage. Returns `Ok(None)` when the
    /// partition holds no records; callers must not confuse that with a
    /// zero-percent-null result.
    pub fn null_summary(
        &self,
        table: TableName,
        layer: Option<i64>,
    ) -> Result<Option<Vec<NullSummaryRow>>, CasfriError> {
        let layer_entry = self.layer_entry(table, layer)?;
        if layer_entry.keys.is_empty() {
            return Ok(None);
        }
        let total_area = self.table_totals.get(&table).copied().unwrap_or(0.0);
        let rows = layer_entry
            .keys
            .iter()
            .filter_map(|key| self.records.get(key).map(|record| (key, record)))
            .map(|(key, record)| NullSummaryRow {
                key: key.to_string(),
                null_value_area: record.null_area,
                total_area,
                percent_null: if total_area > 0.0 {
                    record.null_area / total_area * 100.0
                } else {
                    0.0
                },
            })
            .collect::<Vec<_>>();
        if rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(rows))
    }

    /// Grouped results for one `(table, layer)` partition, in insertion
    /// order.
    ///
    /// With `cleaned` set, keys whose every category was undefined are
    /// silently skipped; otherwise every key's raw result is returned.
    pub fn summary_data(
        &self,
        table: TableName,
        layer: Option<i64>,
        cleaned: bool,
    ) -> Result<Vec<(String, &GroupedResult)>, CasfriError> {
        let layer_entry = self.layer_entry(table, layer)?;
        let mut data = Vec::new();
        for key in &layer_entry.keys {
            let Some(record) = self.records.get(key) else {
                continue;
            };
            if cleaned {
                if let Some(result) = &record.cleaned {
                    data.push((key.to_string(), result));
                }
            } else {
                data.push((key.to_string(), &record.raw));
            }
        }
        Ok(data)
    }

    /// Every stored record in directory order, for export.
    pub fn records_in_order(&self) -> Vec<(&SummaryKey, &SummaryRecord)> {
        let mut out = Vec::with_capacity(self.records.len());
        for table_entry in &self.directory {
            for layer_entry in &table_entry.layers {
                for key in &layer_entry.keys {
                    if let Some(record) = self.records.get(key) {
                        out.push((key, record));
                    }
                }
            }
        }
        out
    }

    fn table_entry(&self, table: TableName) -> Result<&TableEntry, CasfriError> {
        self.directory
            .iter()
            .find(|e| e.table == table)
            .ok_or_else(|| CasfriError::NotFound(format!("no summary entries for table '{table}'")))
    }

    fn layer_entry(&self, table: TableName, layer: Option<i64>) -> Result<&LayerEntry, CasfriError> {
        let table_entry = self.table_entry(table)?;
        table_entry
            .layers
            .iter()
            .find(|e| e.layer == layer)
            .ok_or_else(|| match layer {
                Some(layer) => CasfriError::NotFound(format!(
                    "no layer {layer} summary entries for table '{table}'"
                )),
                None => CasfriError::NotFound(format!(
                    "no layerless summary entries for table '{table}'"
                )),
            })
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use proptest::prelude::*;

    use super::*;
    use crate::models::test_support::sample_dataset;
    use crate::models::Category;

    fn grouped(column: &str, bins: &[(Category, f64)]) -> GroupedResult {
        let mut g = GroupedResult::new(column);
        for (category, area) in bins {
            g.add(category.clone(), *area);
        }
        g
    }

    fn empty_acc() -> SummaryAccumulator {
        SummaryAccumulator::new(HashMap::new())
    }

    #[test]
    fn test_key_display_without_layer() {
        let key = SummaryKey {
            table: TableName::Cas,
            layer: None,
            column: "stand_structure".to_string(),
        };
        assert_eq!(key.to_string(), "cas.stand_structure");
    }

    #[test]
    fn test_key_display_with_layer() {
        let key = SummaryKey {
            table: TableName::Lyr,
            layer: Some(1),
            column: "site_class".to_string(),
        };
        assert_eq!(key.to_string(), "lyr.layer_1.site_class");
    }

    #[test]
    fn test_insert_and_retrieve_raw() {
        let mut acc = empty_acc();
        acc.insert(
            grouped("site_class", &[(Category::Label("G".into()), 5.0)]),
            TableName::Lyr,
            Some(1),
        )
        .unwrap();

        let data = acc.summary_data(TableName::Lyr, Some(1), false).unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].0, "lyr.layer_1.site_class");
        assert_approx_eq!(data[0].1.total_area(), 5.0);
    }

    #[test]
    fn test_duplicate_insert_rejected_first_entry_intact() {
        let mut acc = empty_acc();
        acc.insert(
            grouped("site_class", &[(Category::Label("G".into()), 5.0)]),
            TableName::Lyr,
            Some(1),
        )
        .unwrap();

        let err = acc
            .insert(
                grouped("site_class", &[(Category::Label("P".into()), 99.0)]),
                TableName::Lyr,
                Some(1),
            )
            .unwrap_err();
        assert!(matches!(err, CasfriError::DuplicateKey(_)));
        assert!(err.to_string().contains("lyr.layer_1.site_class"));

        let data = acc.summary_data(TableName::Lyr, Some(1), false).unwrap();
        assert_eq!(data.len(), 1);
        assert_approx_eq!(data[0].1.bins[&Category::Label("G".to_string())], 5.0);
    }

    #[test]
    fn test_directory_preserves_insertion_order() {
        let mut acc = empty_acc();
        for column in ["a_col", "b_col", "c_col"] {
            acc.insert(
                grouped(column, &[(Category::Numeric(1.0), 1.0)]),
                TableName::Nfl,
                Some(1),
            )
            .unwrap();
        }
        let data = acc.summary_data(TableName::Nfl, Some(1), false).unwrap();
        let keys: Vec<&str> = data.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec!["nfl.layer_1.a_col", "nfl.layer_1.b_col", "nfl.layer_1.c_col"]
        );
    }

    #[test]
    fn test_tables_and_layers_in_insertion_order() {
        let mut acc = empty_acc();
        acc.insert(
            grouped("x", &[(Category::Numeric(1.0), 1.0)]),
            TableName::Dst,
            Some(2),
        )
        .unwrap();
        acc.insert(
            grouped("x", &[(Category::Numeric(1.0), 1.0)]),
            TableName::Cas,
            None,
        )
        .unwrap();
        acc.insert(
            grouped("y", &[(Category::Numeric(1.0), 1.0)]),
            TableName::Dst,
            Some(1),
        )
        .unwrap();

        assert_eq!(acc.tables(), vec![TableName::Dst, TableName::Cas]);
        assert_eq!(acc.layers(TableName::Dst).unwrap(), vec![Some(2), Some(1)]);
        assert_eq!(acc.layers(TableName::Cas).unwrap(), vec![None]);
    }

    #[test]
    fn test_cleaned_data_skips_all_null_keys() {
        let mut acc = empty_acc();
        acc.insert(
            grouped(
                "wetland_type",
                &[
                    (Category::Label("NULL_VALUE".into()), 3.0),
                    (Category::Label("NOT_APPLICABLE".into()), 2.0),
                ],
            ),
            TableName::Eco,
            None,
        )
        .unwrap();
        acc.insert(
            grouped("eco_site", &[(Category::Label("FEN".into()), 4.0)]),
            TableName::Eco,
            None,
        )
        .unwrap();

        let cleaned = acc.summary_data(TableName::Eco, None, true).unwrap();
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].0, "eco.eco_site");

        let raw = acc.summary_data(TableName::Eco, None, false).unwrap();
        assert_eq!(raw.len(), 2);
        assert_eq!(raw[0].0, "eco.wetland_type");
    }

    #[test]
    fn test_null_summary_percentages() {
        let mut totals = HashMap::new();
        totals.insert(TableName::Lyr, 1000.0);
        let mut acc = SummaryAccumulator::new(totals);
        acc.insert(
            grouped(
                "origin_upper",
                &[
                    (Category::Numeric(-8888.0), 250.0),
                    (Category::Numeric(1950.0), 750.0),
                ],
            ),
            TableName::Lyr,
            Some(1),
        )
        .unwrap();

        let rows = acc.null_summary(TableName::Lyr, Some(1)).unwrap().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key, "lyr.layer_1.origin_upper");
        assert_approx_eq!(rows[0].null_value_area, 250.0);
        assert_approx_eq!(rows[0].total_area, 1000.0);
        assert_approx_eq!(rows[0].percent_null, 25.0);
    }

    #[test]
    fn test_null_summary_unknown_table_is_not_found() {
        let acc = empty_acc();
        let err = acc.null_summary(TableName::Lyr, Some(1)).unwrap_err();
        assert!(matches!(err, CasfriError::NotFound(_)));
    }

    #[test]
    fn test_null_summary_unknown_layer_is_not_found() {
        let mut acc = empty_acc();
        acc.insert(
            grouped("x", &[(Category::Numeric(1.0), 1.0)]),
            TableName::Lyr,
            Some(1),
        )
        .unwrap();
        let err = acc.null_summary(TableName::Lyr, Some(9)).unwrap_err();
        assert!(matches!(err, CasfriError::NotFound(_)));
        assert!(err.to_string().contains("layer 9"));
    }

    #[test]
    fn test_summary_data_unknown_table_is_not_found() {
        let acc = empty_acc();
        let err = acc.summary_data(TableName::Eco, None, true).unwrap_err();
        assert!(matches!(err, CasfriError::NotFound(_)));
    }

    #[test]
    fn test_area_conservation_per_key() {
        let mut acc = empty_acc();
        acc.insert(
            grouped(
                "dist_year_1",
                &[
                    (Category::Numeric(-9999.0), 5.5),
                    (Category::Numeric(2001.0), 10.25),
                    (Category::Numeric(2010.0), 4.0),
                ],
            ),
            TableName::Dst,
            Some(1),
        )
        .unwrap();

        let raw = acc.summary_data(TableName::Dst, Some(1), false).unwrap();
        let cleaned = acc.summary_data(TableName::Dst, Some(1), true).unwrap();
        let nulls = acc.null_summary(TableName::Dst, Some(1)).unwrap().unwrap();
        assert_approx_eq!(
            cleaned[0].1.total_area() + nulls[0].null_value_area,
            raw[0].1.total_area()
        );
    }

    #[test]
    fn test_compile_sample_dataset() {
        let dataset = sample_dataset();
        let acc = SummaryAccumulator::compile(&dataset).unwrap();

        // cas, eco, lyr, nfl, dst all have rows, so all appear.
        assert_eq!(
            acc.tables(),
            vec![
                TableName::Cas,
                TableName::Eco,
                TableName::Lyr,
                TableName::Nfl,
                TableName::Dst
            ]
        );

        // One entry per analysis column, per layer for layered tables.
        assert_eq!(acc.summary_data(TableName::Cas, None, false).unwrap().len(), 3);
        assert_eq!(acc.summary_data(TableName::Eco, None, false).unwrap().len(), 5);
        assert_eq!(
            acc.summary_data(TableName::Lyr, Some(1), false).unwrap().len(),
            33
        );
        assert_eq!(
            acc.summary_data(TableName::Lyr, Some(2), false).unwrap().len(),
            33
        );
        assert_eq!(
            acc.summary_data(TableName::Nfl, Some(1), false).unwrap().len(),
            9
        );
        assert_eq!(
            acc.summary_data(TableName::Dst, Some(1), false).unwrap().len(),
            12
        );
    }

    #[test]
    fn test_compile_key_order_structural_before_species() {
        let dataset = sample_dataset();
        let acc = SummaryAccumulator::compile(&dataset).unwrap();
        let data = acc.summary_data(TableName::Lyr, Some(1), false).unwrap();
        assert_eq!(data[0].0, "lyr.layer_1.soil_moist_reg");
        assert_eq!(data[13].0, "lyr.layer_1.species_1");
    }

    #[test]
    fn test_compile_deduplicates_table_totals() {
        let dataset = sample_dataset();
        let acc = SummaryAccumulator::compile(&dataset).unwrap();
        // dst has two rows for the same stand of area 10.0.
        assert_approx_eq!(acc.table_total(TableName::Dst).unwrap(), 10.0);
        assert_approx_eq!(acc.table_total(TableName::Cas).unwrap(), 30.0);
        // lyr: PE01-001 (10.0) + PE01-002 (20.0), second layer row deduplicated.
        assert_approx_eq!(acc.table_total(TableName::Lyr).unwrap(), 30.0);
    }

    #[test]
    fn test_compile_rejects_malformed_dataset() {
        let mut dataset = sample_dataset();
        dataset.nfl.columns.retain(|c| c != "nat_non_veg");
        let err = SummaryAccumulator::compile(&dataset).unwrap_err();
        assert!(matches!(err, CasfriError::Configuration(_)));
    }

    #[test]
    fn test_records_in_order_matches_directory() {
        let dataset = sample_dataset();
        let acc = SummaryAccumulator::compile(&dataset).unwrap();
        let records = acc.records_in_order();
        assert_eq!(records.len(), 3 + 5 + 33 * 2 + 9 + 12);
        assert_eq!(records[0].0.to_string(), "cas.stand_structure");
    }

    proptest! {
        /// null_area + cleaned total == raw total for any grouped input.
        #[test]
        fn prop_area_conservation(
            bins in proptest::collection::vec(
                (-10000i64..10000, 0.0f64..1000.0),
                1..40,
            )
        ) {
            let mut g = GroupedResult::new("origin_upper");
            for (code, area) in bins {
                g.add(Category::Numeric(code as f64), area);
            }
            let raw_total = g.total_area();
            let (cleaned, null_area) = g.split_undefined();
            let cleaned_total = cleaned.map(|c| c.total_area()).unwrap_or(0.0);
            prop_assert!((cleaned_total + null_area - raw_total).abs() < 1e-6);
        }
    }
}
