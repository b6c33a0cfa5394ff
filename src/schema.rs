//! Static CASFRI schema: table names, per-table analysis columns, and
//! construction-time validation of a loaded dataset against that schema.
//!
//! The analysis-column lists are fixed by the CASFRI data dictionary and are
//! compile-time constants, not runtime configuration.

use serde::{Deserialize, Serialize};

use crate::error::CasfriError;
use crate::models::CasfriDataset;

/// The six CASFRI tables carried by a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableName {
    Hdr,
    Cas,
    Eco,
    Lyr,
    Nfl,
    Dst,
}

impl std::fmt::Display for TableName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableName::Hdr => write!(f, "hdr"),
            TableName::Cas => write!(f, "cas"),
            TableName::Eco => write!(f, "eco"),
            TableName::Lyr => write!(f, "lyr"),
            TableName::Nfl => write!(f, "nfl"),
            TableName::Dst => write!(f, "dst"),
        }
    }
}

impl std::str::FromStr for TableName {
    type Err = CasfriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hdr" => Ok(TableName::Hdr),
            "cas" => Ok(TableName::Cas),
            "eco" => Ok(TableName::Eco),
            "lyr" => Ok(TableName::Lyr),
            "nfl" => Ok(TableName::Nfl),
            "dst" => Ok(TableName::Dst),
            _ => Err(CasfriError::Parse(format!("Unknown CASFRI table: '{s}'"))),
        }
    }
}

/// Attribute tables that carry a `casfri_area` column and feed the summary.
pub const ATTRIBUTE_TABLES: [TableName; 5] = [
    TableName::Cas,
    TableName::Eco,
    TableName::Lyr,
    TableName::Nfl,
    TableName::Dst,
];

pub const CAS_ANALYSIS_COLS: &[&str] = &["stand_structure", "num_of_layers", "stand_photo_year"];

pub const ECO_ANALYSIS_COLS: &[&str] = &[
    "wetland_type",
    "wet_veg_cover",
    "wet_landform_mod",
    "wet_local_mod",
    "eco_site",
];

pub const LYR_ANALYSIS_COLS: &[&str] = &[
    "soil_moist_reg",
    "structure_per",
    "structure_range",
    "crown_closure_upper",
    "crown_closure_lower",
    "height_upper",
    "height_lower",
    "productivity",
    "productivity_type",
    "origin_upper",
    "origin_lower",
    "site_class",
    "site_index",
];

pub const LYR_SPECIES_COLS: &[&str] = &[
    "species_1",
    "species_per_1",
    "species_2",
    "species_per_2",
    "species_3",
    "species_per_3",
    "species_4",
    "species_per_4",
    "species_5",
    "species_per_5",
    "species_6",
    "species_per_6",
    "species_7",
    "species_per_7",
    "species_8",
    "species_per_8",
    "species_9",
    "species_per_9",
    "species_10",
    "species_per_10",
];

pub const NFL_ANALYSIS_COLS: &[&str] = &[
    "soil_moist_reg",
    "structure_per",
    "crown_closure_upper",
    "crown_closure_lower",
    "height_upper",
    "height_lower",
    "nat_non_veg",
    "non_for_anth",
    "non_for_veg",
];

pub const DST_ANALYSIS_COLS: &[&str] = &[
    "dist_type_1",
    "dist_year_1",
    "dist_ext_upper_1",
    "dist_ext_lower_1",
    "dist_type_2",
    "dist_year_2",
    "dist_ext_upper_2",
    "dist_ext_lower_2",
    "dist_type_3",
    "dist_year_3",
    "dist_ext_upper_3",
    "dist_ext_lower_3",
];

/// All analysis columns for a table, in summarization order.
///
/// For `lyr` this is the 13 structural columns followed by the 20
/// species-component columns. `hdr` has none.
pub fn analysis_columns(table: TableName) -> Vec<&'static str> {
    match table {
        TableName::Hdr => Vec::new(),
        TableName::Cas => CAS_ANALYSIS_COLS.to_vec(),
        TableName::Eco => ECO_ANALYSIS_COLS.to_vec(),
        TableName::Lyr => LYR_ANALYSIS_COLS
            .iter()
            .chain(LYR_SPECIES_COLS.iter())
            .copied()
            .collect(),
        TableName::Nfl => NFL_ANALYSIS_COLS.to_vec(),
        TableName::Dst => DST_ANALYSIS_COLS.to_vec(),
    }
}

/// Whether the table has a structural `layer` dimension.
pub fn has_layer_dimension(table: TableName) -> bool {
    matches!(table, TableName::Lyr | TableName::Nfl | TableName::Dst)
}

/// Check a loaded dataset against the static schema.
///
/// Every attribute table must carry `cas_id`, `casfri_area`, its full
/// analysis-column list, and (for layered tables) a `layer` column. Fails
/// with [`CasfriError::Configuration`] on the first missing piece so that
/// summary compilation never starts on a malformed dataset.
pub fn validate(dataset: &CasfriDataset) -> Result<(), CasfriError> {
    for table_name in ATTRIBUTE_TABLES {
        let Some(table) = dataset.table(table_name) else {
            continue;
        };
        for required in ["cas_id", "casfri_area"] {
            if !table.has_column(required) {
                return Err(CasfriError::Configuration(format!(
                    "table '{table_name}' is missing required column '{required}'"
                )));
            }
        }
        if has_layer_dimension(table_name) && !table.has_column("layer") {
            return Err(CasfriError::Configuration(format!(
                "table '{table_name}' is missing required column 'layer'"
            )));
        }
        for col in analysis_columns(table_name) {
            if !table.has_column(col) {
                return Err(CasfriError::Configuration(format!(
                    "table '{table_name}' is missing analysis column '{col}'"
                )));
            }
        }
    }
    Ok(())
}
