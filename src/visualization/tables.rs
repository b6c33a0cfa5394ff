use colored::Colorize;
use comfy_table::{
    modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, ContentArrangement, Table,
};

use crate::models::HeaderTable;
use crate::schema::TableName;
use crate::summary::{GroupedResult, NullSummaryRow};

/// Format the `hdr` metadata table, transposed (one row per field).
pub fn format_header_table(hdr: &HeaderTable) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Inventory Header".bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(50)));

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Field", "Value"]);

    for (idx, field) in hdr.columns.iter().enumerate() {
        let value = hdr
            .rows
            .first()
            .and_then(|row| row.get(idx))
            .map(String::as_str)
            .unwrap_or("");
        table.add_row(vec![Cell::new(field), Cell::new(value)]);
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print the `hdr` metadata table.
pub fn print_header_table(hdr: &HeaderTable) {
    print!("{}", format_header_table(hdr));
}

/// Format one grouped result as a category/area table.
pub fn format_grouped_table(key: &str, grouped: &GroupedResult) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", key.bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(50)));

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![grouped.column.as_str(), "casfri_area"]);

    for (category, area) in &grouped.bins {
        table.add_row(vec![
            Cell::new(category.to_string()),
            Cell::new(format!("{area:.2}")),
        ]);
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print one grouped result.
pub fn print_grouped_table(key: &str, grouped: &GroupedResult) {
    print!("{}", format_grouped_table(key, grouped));
}

/// Format the null accounting for one `(table, layer)` partition.
pub fn format_null_summary_table(
    table_name: TableName,
    layer: Option<i64>,
    rows: &[NullSummaryRow],
) -> String {
    let mut output = String::new();
    let heading = match layer {
        Some(layer) => format!("Null Value Summary: {table_name} (layer {layer})"),
        None => format!("Null Value Summary: {table_name}"),
    };
    output.push_str(&format!("\n{}\n", heading.bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(70)));

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Key", "Null Area", "Total Area", "% Null"]);

    for row in rows {
        table.add_row(vec![
            Cell::new(&row.key),
            Cell::new(format!("{:.2}", row.null_value_area)),
            Cell::new(format!("{:.2}", row.total_area)),
            Cell::new(format!("{:.1}%", row.percent_null)),
        ]);
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print the null accounting for one partition.
pub fn print_null_summary_table(
    table_name: TableName,
    layer: Option<i64>,
    rows: &[NullSummaryRow],
) {
    print!("{}", format_null_summary_table(table_name, layer, rows));
}
