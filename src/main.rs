use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use casfri_summary::{
    io,
    schema::TableName,
    summary::SummaryAccumulator,
    visualization::{print_area_chart, print_grouped_table, print_header_table,
        print_null_summary_table},
    CasfriDataset,
};

#[derive(Parser)]
#[command(
    name = "casfri-summary",
    about = "CASFRI inventory attribute summaries and null-value accounting",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile the summary and export it as CSV and JSON files
    Summarize {
        /// Directory containing the inventory CSV tables (hdr.csv, cas.csv, ...)
        #[arg(short, long)]
        data_dir: PathBuf,

        /// Output directory for summary files (created if absent)
        #[arg(short, long)]
        output_dir: PathBuf,
    },

    /// Display the full summary report in the terminal
    Report {
        /// Directory containing the inventory CSV tables
        #[arg(short, long)]
        data_dir: PathBuf,

        /// Restrict the report to one table (cas, eco, lyr, nfl, dst)
        #[arg(short, long)]
        table: Option<String>,

        /// Render bar charts instead of tables for grouped areas
        #[arg(long)]
        charts: bool,
    },

    /// Display only the null-value accounting
    Nulls {
        /// Directory containing the inventory CSV tables
        #[arg(short, long)]
        data_dir: PathBuf,
    },
}

fn load_and_compile(data_dir: &PathBuf) -> Result<(CasfriDataset, SummaryAccumulator)> {
    let dataset = io::load_dataset(data_dir)?;
    let accumulator = SummaryAccumulator::compile(&dataset)?;
    Ok((dataset, accumulator))
}

fn print_null_sections(accumulator: &SummaryAccumulator) -> Result<()> {
    for table in accumulator.tables() {
        for layer in accumulator.layers(table)? {
            if let Some(rows) = accumulator.null_summary(table, layer)? {
                print_null_summary_table(table, layer, &rows);
            }
        }
    }
    println!();
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Summarize {
            data_dir,
            output_dir,
        } => {
            let (_, accumulator) = load_and_compile(&data_dir)?;

            let written = io::export_summary(&accumulator, &output_dir)?;
            io::write_null_summary_csv(&accumulator, output_dir.join("null_summary.csv"))?;
            io::write_summary_json(&accumulator, output_dir.join("summary.json"))?;

            println!(
                "{} Wrote {} summary files to {}",
                "Success:".green().bold(),
                written.len() + 2,
                output_dir.display()
            );
        }

        Commands::Report {
            data_dir,
            table,
            charts,
        } => {
            let only: Option<TableName> = match table {
                Some(name) => Some(name.parse()?),
                None => None,
            };
            let (dataset, accumulator) = load_and_compile(&data_dir)?;

            println!(
                "\n{}",
                format!("CASFRI Inventory Summary: {}", data_dir.display())
                    .bold()
                    .cyan()
            );
            if only.is_none() {
                print_header_table(&dataset.hdr);
            }

            for table in accumulator.tables() {
                if only.is_some_and(|t| t != table) {
                    continue;
                }
                for layer in accumulator.layers(table)? {
                    if let Some(rows) = accumulator.null_summary(table, layer)? {
                        print_null_summary_table(table, layer, &rows);
                    }
                    for (key, grouped) in accumulator.summary_data(table, layer, true)? {
                        if charts {
                            print_area_chart(&key, grouped);
                        } else {
                            print_grouped_table(&key, grouped);
                        }
                    }
                }
            }
            println!();
        }

        Commands::Nulls { data_dir } => {
            let (_, accumulator) = load_and_compile(&data_dir)?;
            print_null_sections(&accumulator)?;
        }
    }

    Ok(())
}
