//! Report command implementation: row counts for loaded stores

use super::shared::{load_store_configuration, selected_sources, setup_logging};
use crate::Result;
use crate::app::models::SourceType;
use crate::app::services::source_registry::SourceRegistry;
use crate::app::services::store::TafStore;
use crate::cli::args::{OutputFormat, ReportArgs};
use crate::config::Config;
use colored::*;
use std::path::PathBuf;
use tracing::{debug, info};

/// Row counts for one source's store
#[derive(Debug, Clone, PartialEq, Eq)]
struct StoreReportRow {
    code: String,
    label: String,
    store_path: PathBuf,

    /// Whether the store file exists; counts are zero when it does not
    present: bool,

    headers: i64,
    elements: i64,
    stations: i64,
}

/// Report row counts for the selected sources' stores
pub fn run_report(args: ReportArgs) -> Result<()> {
    setup_logging(args.get_log_level(), false)?;

    info!("Starting TAF store report");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;

    let config = load_store_configuration(args.config_file.as_deref(), args.store_dir.as_deref())?;
    let registry = SourceRegistry::from_config(&config)?;
    let sources = selected_sources(&registry, args.sources.as_ref())?;

    let rows = collect_rows(&config, &sources)?;

    match args.output_format {
        OutputFormat::Human => print_human_report(&rows),
        OutputFormat::Json => print_json_report(&rows),
        OutputFormat::Csv => print_csv_report(&rows),
    }
}

/// Gather counts per source, tolerating stores the load phase has not
/// created yet
fn collect_rows(config: &Config, sources: &[&SourceType]) -> Result<Vec<StoreReportRow>> {
    let mut rows = Vec::with_capacity(sources.len());

    for source in sources {
        let store_path = config.store_path(&source.code);
        let mut row = StoreReportRow {
            code: source.code.to_string(),
            label: source.label.clone(),
            store_path: store_path.clone(),
            present: false,
            headers: 0,
            elements: 0,
            stations: 0,
        };

        if store_path.exists() {
            let counts = TafStore::open(&store_path)?.counts()?;
            row.present = true;
            row.headers = counts.headers;
            row.elements = counts.elements;
            row.stations = counts.stations;
        }

        rows.push(row);
    }

    Ok(rows)
}

/// Human-readable report
fn print_human_report(rows: &[StoreReportRow]) -> Result<()> {
    println!("\n{}", "Store Report".bright_green().bold());

    for row in rows {
        println!(
            "\n  {} {}",
            row.code.bright_cyan().bold(),
            row.label.bright_white()
        );
        println!(
            "    {} {}",
            "Store:".bright_cyan(),
            row.store_path.display()
        );
        if row.present {
            println!(
                "    {} {} headers, {} elements, {} stations",
                "Rows:".bright_cyan(),
                row.headers.to_string().bright_white(),
                row.elements.to_string().bright_white(),
                row.stations.to_string().bright_white()
            );
        } else {
            println!("    {}", "Not loaded yet".bright_yellow());
        }
    }

    println!();
    Ok(())
}

/// JSON report for machine consumption
fn print_json_report(rows: &[StoreReportRow]) -> Result<()> {
    let json_rows = rows
        .iter()
        .map(|row| {
            serde_json::json!({
                "source": row.code,
                "label": row.label,
                "store": row.store_path.display().to_string(),
                "present": row.present,
                "headers": row.headers,
                "elements": row.elements,
                "stations": row.stations,
            })
        })
        .collect::<Vec<_>>();

    println!("{}", serde_json::to_string_pretty(&json_rows).unwrap());
    Ok(())
}

/// CSV report for data analysis
fn print_csv_report(rows: &[StoreReportRow]) -> Result<()> {
    println!("source,present,headers,elements,stations,store");
    for row in rows {
        println!(
            "{},{},{},{},{},{}",
            row.code,
            row.present,
            row.headers,
            row.elements,
            row.stations,
            row.store_path.display()
        );
    }
    Ok(())
}
