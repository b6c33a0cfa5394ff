use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::CasfriError;
use crate::models::{CasfriDataset, Category, HeaderTable, InventoryTable, StandRecord};
use crate::schema::{self, TableName};
use crate::summary::SummaryAccumulator;

fn csv_reader(path: &Path) -> Result<csv::Reader<fs::File>, CasfriError> {
    Ok(csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?)
}

fn read_header_table(path: &Path) -> Result<HeaderTable, CasfriError> {
    let mut rdr = csv_reader(path)?;
    let columns: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(|c| c.to_string()).collect());
    }
    Ok(HeaderTable { columns, rows })
}

/// Read one attribute table from CSV.
///
/// For `cas`, `casfri_area` comes from the table's own column. For the
/// other tables it is joined in from `area_join` (cas_id → area); rows
/// with no match in `cas` are dropped, inner-join style.
fn read_attribute_table(
    path: &Path,
    name: TableName,
    area_join: Option<&HashMap<String, f64>>,
) -> Result<InventoryTable, CasfriError> {
    let mut rdr = csv_reader(path)?;
    let mut columns: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();

    let cas_id_idx = columns
        .iter()
        .position(|c| c == "cas_id")
        .ok_or_else(|| {
            CasfriError::Configuration(format!("table '{name}' is missing required column 'cas_id'"))
        })?;
    let area_idx = columns.iter().position(|c| c == "casfri_area");
    if name == TableName::Cas && area_idx.is_none() {
        return Err(CasfriError::Configuration(
            "table 'cas' is missing required column 'casfri_area'".to_string(),
        ));
    }
    let layer_idx = if schema::has_layer_dimension(name) {
        Some(columns.iter().position(|c| c == "layer").ok_or_else(|| {
            CasfriError::Configuration(format!(
                "table '{name}' is missing required column 'layer'"
            ))
        })?)
    } else {
        None
    };

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let cas_id = record.get(cas_id_idx).unwrap_or("").to_string();

        let casfri_area = match area_join {
            None => {
                let cell = area_idx.and_then(|idx| record.get(idx)).unwrap_or("");
                cell.parse::<f64>().map_err(|_| {
                    CasfriError::Parse(format!(
                        "table '{name}': bad casfri_area '{cell}' for cas_id '{cas_id}'"
                    ))
                })?
            }
            Some(join) => match join.get(&cas_id) {
                Some(area) => *area,
                // No matching cas row; drop like an inner merge would.
                None => continue,
            },
        };

        let layer = match layer_idx {
            Some(idx) => {
                let cell = record.get(idx).unwrap_or("");
                Some(cell.parse::<i64>().map_err(|_| {
                    CasfriError::Parse(format!(
                        "table '{name}': bad layer '{cell}' for cas_id '{cas_id}'"
                    ))
                })?)
            }
            None => None,
        };

        let mut attributes = HashMap::new();
        for (idx, cell) in record.iter().enumerate() {
            if idx == cas_id_idx || Some(idx) == area_idx || Some(idx) == layer_idx {
                continue;
            }
            if cell.is_empty() {
                continue;
            }
            if let Some(column) = columns.get(idx) {
                attributes.insert(column.clone(), Category::parse(cell));
            }
        }

        rows.push(StandRecord {
            cas_id,
            layer,
            casfri_area,
            attributes,
        });
    }

    if !columns.iter().any(|c| c == "casfri_area") {
        columns.push("casfri_area".to_string());
    }
    Ok(InventoryTable::new(name, columns, rows))
}

/// Load a CASFRI dataset from a directory of CSV tables (`hdr.csv`,
/// `cas.csv`, `eco.csv`, `lyr.csv`, `nfl.csv`, `dst.csv`), joining the
/// `cas` area onto the other attribute tables.
pub fn load_dataset(dir: impl AsRef<Path>) -> Result<CasfriDataset, CasfriError> {
    let dir = dir.as_ref();
    info!("loading dataset from {}", dir.display());

    let hdr = read_header_table(&dir.join("hdr.csv"))?;
    let cas = read_attribute_table(&dir.join("cas.csv"), TableName::Cas, None)?;

    let area_join: HashMap<String, f64> = cas
        .rows
        .iter()
        .map(|row| (row.cas_id.clone(), row.casfri_area))
        .collect();

    let eco = read_attribute_table(&dir.join("eco.csv"), TableName::Eco, Some(&area_join))?;
    let lyr = read_attribute_table(&dir.join("lyr.csv"), TableName::Lyr, Some(&area_join))?;
    let nfl = read_attribute_table(&dir.join("nfl.csv"), TableName::Nfl, Some(&area_join))?;
    let dst = read_attribute_table(&dir.join("dst.csv"), TableName::Dst, Some(&area_join))?;

    info!(
        "loaded {} cas, {} eco, {} lyr, {} nfl, {} dst rows",
        cas.num_rows(),
        eco.num_rows(),
        lyr.num_rows(),
        nfl.num_rows(),
        dst.num_rows()
    );

    Ok(CasfriDataset {
        hdr,
        cas,
        eco,
        lyr,
        nfl,
        dst,
    })
}

/// Write one CSV per cleaned summary key into `out_dir` (created if
/// absent), named after the key, e.g. `lyr.layer_1.site_class.csv`.
/// Returns the written paths in directory order.
pub fn export_summary(
    accumulator: &SummaryAccumulator,
    out_dir: impl AsRef<Path>,
) -> Result<Vec<PathBuf>, CasfriError> {
    let out_dir = out_dir.as_ref();
    fs::create_dir_all(out_dir)?;

    let mut written = Vec::new();
    for table in accumulator.tables() {
        for layer in accumulator.layers(table)? {
            for (key, grouped) in accumulator.summary_data(table, layer, true)? {
                let path = out_dir.join(format!("{key}.csv"));
                let mut wtr = csv::Writer::from_path(&path)?;
                wtr.write_record([grouped.column.as_str(), "casfri_area"])?;
                for (category, area) in &grouped.bins {
                    wtr.write_record([category.to_string(), area.to_string()])?;
                }
                wtr.flush()?;
                written.push(path);
            }
        }
    }
    info!("wrote {} summary files to {}", written.len(), out_dir.display());
    Ok(written)
}

/// Write the null-value accounting for every partition to one CSV.
pub fn write_null_summary_csv(
    accumulator: &SummaryAccumulator,
    path: impl AsRef<Path>,
) -> Result<(), CasfriError> {
    let mut wtr = csv::Writer::from_path(path.as_ref())?;
    for table in accumulator.tables() {
        for layer in accumulator.layers(table)? {
            if let Some(rows) = accumulator.null_summary(table, layer)? {
                for row in rows {
                    wtr.serialize(&row)?;
                }
            }
        }
    }
    wtr.flush()?;
    Ok(())
}
