mod charts;
mod tables;

pub use charts::{format_area_chart, print_area_chart};
pub use tables::{
    format_grouped_table, format_header_table, format_null_summary_table, print_grouped_table,
    print_header_table, print_null_summary_table,
};
