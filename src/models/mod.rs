mod category;
mod dataset;
mod record;
mod table;

pub use category::{Category, NULL_VALUE_LABELS, NUMERIC_NULL_THRESHOLD};
pub use dataset::CasfriDataset;
pub use record::StandRecord;
pub use table::{HeaderTable, InventoryTable};
