pub mod error;
pub mod io;
pub mod models;
pub mod schema;
pub mod summary;
pub mod visualization;

pub use error::CasfriError;
pub use models::{CasfriDataset, Category, HeaderTable, InventoryTable, StandRecord};
pub use schema::TableName;
pub use summary::{GroupedResult, NullSummaryRow, SummaryAccumulator, SummaryKey};
