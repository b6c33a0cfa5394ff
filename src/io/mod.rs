mod csv_io;
mod json_io;

pub use csv_io::{export_summary, load_dataset, write_null_summary_csv};
pub use json_io::{build_summary_export, write_summary_json, SummaryExport};
