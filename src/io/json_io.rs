use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::CasfriError;
use crate::schema::TableName;
use crate::summary::{GroupedResult, SummaryAccumulator};

/// Serializable snapshot of a compiled summary.
#[derive(Debug, Serialize)]
pub struct SummaryExport {
    pub tables: Vec<TableExport>,
}

#[derive(Debug, Serialize)]
pub struct TableExport {
    pub table: TableName,
    pub total_area: Option<f64>,
    pub layers: Vec<LayerExport>,
}

#[derive(Debug, Serialize)]
pub struct LayerExport {
    pub layer: Option<i64>,
    pub entries: Vec<EntryExport>,
}

#[derive(Debug, Serialize)]
pub struct EntryExport {
    pub key: String,
    pub column: String,
    pub null_value_area: f64,
    pub raw: GroupedResult,
    pub cleaned: Option<GroupedResult>,
}

/// Build the export structure in directory order.
pub fn build_summary_export(
    accumulator: &SummaryAccumulator,
) -> Result<SummaryExport, CasfriError> {
    let mut tables = Vec::new();
    for table in accumulator.tables() {
        let mut layers = Vec::new();
        for layer in accumulator.layers(table)? {
            let raw = accumulator.summary_data(table, layer, false)?;
            let cleaned = accumulator.summary_data(table, layer, true)?;
            let nulls = accumulator.null_summary(table, layer)?.unwrap_or_default();

            let entries = raw
                .into_iter()
                .map(|(key, raw_result)| EntryExport {
                    column: raw_result.column.clone(),
                    null_value_area: nulls
                        .iter()
                        .find(|n| n.key == key)
                        .map(|n| n.null_value_area)
                        .unwrap_or(0.0),
                    cleaned: cleaned
                        .iter()
                        .find(|(k, _)| *k == key)
                        .map(|(_, result)| (*result).clone()),
                    raw: raw_result.clone(),
                    key,
                })
                .collect();
            layers.push(LayerExport { layer, entries });
        }
        tables.push(TableExport {
            table,
            total_area: accumulator.table_total(table),
            layers,
        });
    }
    Ok(SummaryExport { tables })
}

/// Write the compiled summary to a pretty-printed JSON file.
pub fn write_summary_json(
    accumulator: &SummaryAccumulator,
    path: impl AsRef<Path>,
) -> Result<(), CasfriError> {
    let export = build_summary_export(accumulator)?;
    let json = serde_json::to_string_pretty(&export)?;
    fs::write(path.as_ref(), json)?;
    Ok(())
}
