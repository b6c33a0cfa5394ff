mod accumulator;
mod grouping;

pub use accumulator::{NullSummaryRow, SummaryAccumulator, SummaryKey, SummaryRecord};
pub use grouping::{
    deduplicated_total_area, distinct_layers, group_area_by_column, GroupedResult,
};
