//! Slick CLI
//!
//! Resolve snap tables and replay headless bottom sheet scenarios.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use slick_cli::{run_loaded_scenario, RunConfig, Scenario, SheetFile, TableSummary};
use slick_sheet::SnapTable;

#[derive(Parser)]
#[command(name = "slick")]
#[command(author, version, about = "Headless diagnostics for slick bottom sheets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved snap table of a sheet file
    Snaps {
        /// Sheet file (TOML)
        sheet: PathBuf,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Replay a scenario against a sheet file
    Run {
        /// Sheet file (TOML)
        sheet: PathBuf,

        /// Scenario file (JSON)
        scenario: PathBuf,

        /// Write the JSON report to this (relative) path
        #[arg(long)]
        report: Option<PathBuf>,

        /// Logical milliseconds per frame
        #[arg(long, default_value_t = 16.0)]
        tick_ms: f32,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Snaps { sheet, json } => print_snaps(&sheet, json),
        Commands::Run {
            sheet,
            scenario,
            report,
            tick_ms,
        } => {
            let passed = run(&sheet, &scenario, report, tick_ms)?;
            if !passed {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

fn print_snaps(path: &Path, json: bool) -> Result<()> {
    let file = SheetFile::load(path)?;
    let Some(geometry) = file.geometry else {
        bail!("{} has no [geometry] section", path.display());
    };
    let Some(table) = SnapTable::resolve(&file.sheet.snap, &geometry) else {
        bail!("container_height and content_height are required to resolve snaps");
    };

    let summary = TableSummary::new(&table);
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", summary.render());
    }
    Ok(())
}

fn run(sheet: &Path, scenario: &Path, report_path: Option<PathBuf>, tick_ms: f32) -> Result<bool> {
    let file = SheetFile::load(sheet)?;
    let scenario = Scenario::from_path(scenario)?;

    tracing::info!(
        "Running {} steps against {}",
        scenario.steps.len(),
        sheet.display()
    );

    let outcome = run_loaded_scenario(&file, &scenario, RunConfig { tick_ms })?;
    let report = outcome.report();

    match &report_path {
        Some(path) => {
            report.save(path)?;
            tracing::info!("Report written to {}", path.display());
        }
        None => report.write(std::io::stdout().lock())?,
    }

    if let Some(failure) = &report.failure {
        tracing::error!(
            "Scenario failed at step {} ({}): {}",
            failure.step,
            failure.assertion,
            failure.message
        );
    } else {
        tracing::info!(
            "Scenario passed ({} frames, {} ms)",
            report.elapsed_frames,
            report.elapsed_ms
        );
    }

    Ok(!outcome.is_failed())
}
