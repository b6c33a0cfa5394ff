use colored::Colorize;

use crate::summary::GroupedResult;

/// Format a text bar chart of a grouped result, largest bin scaled to a
/// fixed width.
pub fn format_area_chart(key: &str, grouped: &GroupedResult) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", key.bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(60)));

    if grouped.is_empty() {
        output.push_str("  No data available.\n");
        return output;
    }

    let max_area = grouped.bins.values().copied().fold(0.0f64, f64::max);
    let bar_width = 40;

    output.push_str(&format!(
        "  {:>20}  {:>12}  Distribution\n",
        grouped.column, "casfri_area"
    ));
    output.push_str(&format!("  {}\n", "-".repeat(70)));

    for (category, &area) in &grouped.bins {
        let bar_len = if max_area > 0.0 {
            ((area / max_area) * bar_width as f64).round() as usize
        } else {
            0
        };
        let bar = "\u{2588}".repeat(bar_len);
        output.push_str(&format!(
            "  {:>20}  {:>12.2}  {}\n",
            category.to_string(),
            area,
            bar.green()
        ));
    }

    output.push('\n');
    output
}

/// Print a text bar chart of a grouped result.
pub fn print_area_chart(key: &str, grouped: &GroupedResult) {
    print!("{}", format_area_chart(key, grouped));
}
