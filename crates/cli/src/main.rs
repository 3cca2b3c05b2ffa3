//! `dupetrace` — duplicate-customer report over DB1/DB2 spreadsheet exports.
//!
//! Reads shipment workbooks (DB1) and delivery-event workbooks (DB2),
//! consolidates each family, finds customers whose mobile number recurs,
//! and writes the joined, ranked report as an xlsx workbook.

mod exit_codes;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use dupetrace_recon::model::Table;
use dupetrace_recon::{consolidate, run, ReconError, ReportConfig};
use exit_codes::{EXIT_CONFIG, EXIT_INPUT, EXIT_OUTPUT, EXIT_USAGE};

#[derive(Parser)]
#[command(
    name = "dupetrace",
    version,
    about = "Find duplicate customers across shipment exports and join their delivery events",
    after_help = "\
Examples:
  dupetrace --db1 jan.xlsx feb.xlsx --db2 events.xlsx
  dupetrace --db1 db1/*.xlsx --db2 db2/*.xlsx --out report.xlsx --json
  dupetrace --db1 db1.csv --db2 db2.csv --config columns.toml"
)]
struct Cli {
    /// DB1 shipment/customer workbook(s), sheet "Consolidated"
    #[arg(long = "db1", required = true, num_args = 1..)]
    db1: Vec<PathBuf>,

    /// DB2 delivery-event workbook(s), sheet "Data"
    #[arg(long = "db2", required = true, num_args = 1..)]
    db2: Vec<PathBuf>,

    /// Path of the output report workbook
    #[arg(long, default_value = "duplicated_customers.xlsx")]
    out: PathBuf,

    /// TOML config overriding sheet/column names
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the full result as JSON to stdout
    #[arg(long)]
    json: bool,
}

#[derive(Debug)]
struct CliError {
    code: u8,
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_CONFIG, message: msg.into(), hint: None }
    }

    fn output(msg: impl Into<String>) -> Self {
        Self { code: EXIT_OUTPUT, message: msg.into(), hint: None }
    }

    fn input(err: ReconError) -> Self {
        let hint = match &err {
            ReconError::SheetNotFound { .. } => {
                Some("override the sheet name with --config".to_string())
            }
            ReconError::MissingColumn { .. } => {
                Some("override the column names with --config".to_string())
            }
            _ => None,
        };
        Self { code: EXIT_INPUT, message: err.to_string(), hint }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run_report(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError { code, message, hint }) => {
            eprintln!("error: {message}");
            if let Some(hint) = hint {
                eprintln!("hint:  {hint}");
            }
            ExitCode::from(code)
        }
    }
}

fn run_report(cli: Cli) -> Result<(), CliError> {
    let config = match &cli.config {
        Some(path) => {
            let toml_str = std::fs::read_to_string(path)
                .map_err(|e| CliError::usage(format!("cannot read {}: {e}", path.display())))?;
            ReportConfig::from_toml(&toml_str).map_err(|e| CliError::config(e.to_string()))?
        }
        None => ReportConfig::default(),
    };

    let primary = load_family("DB1", &cli.db1, &config.primary_sheet)?;
    let secondary = load_family("DB2", &cli.db2, &config.secondary_sheet)?;

    let result = run(&primary, &secondary, &config).map_err(CliError::input)?;

    dupetrace_io::xlsx::export_report(&result.report, &cli.out)
        .map_err(|e| CliError::output(e.to_string()))?;

    if cli.json {
        let json_str = serde_json::to_string_pretty(&result)
            .map_err(|e| CliError::output(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    }

    // Human summary to stderr
    let s = &result.summary;
    eprintln!(
        "{} duplicated entries across {} customers; wrote {}",
        s.duplicate_rows,
        s.duplicate_customers,
        cli.out.display()
    );

    Ok(())
}

/// Read and consolidate one family's files. The reader is picked by
/// extension: .csv payloads skip the sheet lookup entirely.
fn load_family(family: &str, paths: &[PathBuf], sheet: &str) -> Result<Table, CliError> {
    let mut tables = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = std::fs::read(path)
            .map_err(|e| CliError::usage(format!("cannot read {}: {e}", path.display())))?;
        let name = file_name(path);
        let table = if is_csv(path) {
            dupetrace_io::csv::read_csv(&bytes, &name)
        } else {
            dupetrace_io::xlsx::read_sheet(&bytes, &name, sheet)
        }
        .map_err(CliError::input)?;
        tables.push(table);
    }
    consolidate(family, &tables).map_err(CliError::input)
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
