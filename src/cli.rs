//! Command-line interface components.

use crate::catalog::FdsnClient;
use crate::config::InventoryConfig;
use crate::constants::WILDCARD;
use crate::importer::StationImporter;
use crate::inventory::{Inventory, is_station_xml};
use crate::models::{CorrectionReport, DetailLevel, ImportReport};
use crate::orientation::OrientationCorrector;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "obs-inventory")]
#[command(about = "Build FDSN station inventories and apply OBS orientation corrections")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// TOML configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch station metadata for every station in a station list
    Import {
        #[command(flatten)]
        import: ImportArgs,

        /// Where to write the inventory (JSON)
        #[arg(short, long, default_value = "inventory.json")]
        output: PathBuf,
    },

    /// Apply orientation corrections to a saved inventory
    Correct {
        /// Inventory to correct (JSON, or StationXML with a .xml extension)
        #[arg(short, long, value_name = "FILE")]
        inventory: PathBuf,

        #[command(flatten)]
        correct: CorrectArgs,

        /// Where to write the corrected inventory (JSON). Defaults to overwriting a JSON
        /// --inventory, or to the same name with a .json extension for StationXML input
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import a station list, then apply orientation corrections
    Build {
        #[command(flatten)]
        import: ImportArgs,

        #[command(flatten)]
        correct: CorrectArgs,

        /// Where to write the corrected inventory (JSON)
        #[arg(short, long, default_value = "inventory.json")]
        output: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// Pipe-delimited station list (network|station|...)
    #[arg(short, long, value_name = "FILE")]
    pub list: PathBuf,

    /// Location code to request; empty for the blank location
    #[arg(long, default_value = WILDCARD)]
    pub location: String,

    /// Channel code to request, wildcards allowed (e.g. "BH?,HH?")
    #[arg(long, default_value = WILDCARD)]
    pub channel: String,

    /// FDSN data centre URL (overrides the configuration file)
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Level of detail to request (overrides the configuration file)
    #[arg(long, value_enum)]
    pub level: Option<DetailLevel>,
}

#[derive(clap::Args, Debug)]
pub struct CorrectArgs {
    /// Corrections file (STATION AZIMUTH [ERROR] per line, one header line)
    #[arg(long, value_name = "FILE")]
    pub corrections: PathBuf,

    /// Discard corrections whose uncertainty exceeds this many degrees
    #[arg(long, value_name = "DEGREES")]
    pub accepted_error: Option<i32>,
}

impl Args {
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}

/// Set up structured logging on stderr; `RUST_LOG` takes precedence
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("obs_inventory={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    debug!("Logging initialized at level: {}", log_level);
}

/// Resolve configuration: file (if any), then command-line overrides
fn load_config(args: &Args) -> Result<InventoryConfig> {
    let config = match &args.config {
        Some(path) => InventoryConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => InventoryConfig::default(),
    };
    Ok(config)
}

fn apply_import_overrides(
    mut config: InventoryConfig,
    import: &ImportArgs,
) -> Result<InventoryConfig> {
    if let Some(base_url) = &import.base_url {
        config = config.with_base_url(base_url.clone());
    }
    if let Some(level) = import.level {
        config = config.with_level(level);
    }
    config.validate().context("Invalid catalog settings")?;
    Ok(config)
}

fn apply_correct_overrides(
    mut config: InventoryConfig,
    correct: &CorrectArgs,
) -> Result<InventoryConfig> {
    if let Some(accepted_error) = correct.accepted_error {
        config = config.with_accepted_error(accepted_error);
    }
    config.validate().context("Invalid correction settings")?;
    Ok(config)
}

fn network_spinner() -> ProgressBar {
    let spinner = ProgressBar::new(0);
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.green} [{pos}/{len}] querying {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

fn run_import(config: &InventoryConfig, import: &ImportArgs, quiet: bool) -> Result<Inventory> {
    let client = FdsnClient::new(&config.catalog).context("Failed to build HTTP client")?;

    let mut importer = StationImporter::new(client)
        .with_header_lines(config.station_list.header_lines)
        .with_level(config.catalog.level);
    if !quiet {
        importer = importer.with_progress(network_spinner());
    }

    let (inventory, report) = importer
        .import(&import.list, &import.location, &import.channel)
        .with_context(|| format!("Failed to import {}", import.list.display()))?;

    if !quiet {
        print_import_summary(&report, &inventory);
    }
    Ok(inventory)
}

fn run_correct(
    config: &InventoryConfig,
    inventory: &mut Inventory,
    correct: &CorrectArgs,
    quiet: bool,
) -> Result<()> {
    let report = OrientationCorrector::new()
        .with_accepted_error(config.corrections.accepted_error)
        .with_header_lines(config.corrections.header_lines)
        .apply(inventory, &correct.corrections)
        .with_context(|| format!("Failed to apply {}", correct.corrections.display()))?;

    if !quiet {
        print_correction_summary(&report, config.corrections.accepted_error);
    }
    Ok(())
}

/// Corrected inventories are always JSON, so StationXML input is never overwritten
fn default_correct_output(inventory_path: &Path) -> PathBuf {
    if is_station_xml(inventory_path) {
        inventory_path.with_extension("json")
    } else {
        inventory_path.to_path_buf()
    }
}

fn save(inventory: &Inventory, output: &Path, quiet: bool) -> Result<()> {
    inventory
        .save(output)
        .with_context(|| format!("Failed to write inventory to {}", output.display()))?;
    if !quiet {
        println!("{} {}", "Inventory written to".green(), output.display());
    }
    Ok(())
}

/// Execute the selected subcommand
pub fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;
    let quiet = args.quiet;

    match &args.command {
        Command::Import { import, output } => {
            let config = apply_import_overrides(config, import)?;
            let inventory = run_import(&config, import, quiet)?;
            save(&inventory, output, quiet)
        }
        Command::Correct {
            inventory: inventory_path,
            correct,
            output,
        } => {
            let config = apply_correct_overrides(config, correct)?;
            let mut inventory = Inventory::from_path(inventory_path)
                .with_context(|| format!("Failed to load {}", inventory_path.display()))?;
            run_correct(&config, &mut inventory, correct, quiet)?;
            let output = output
                .clone()
                .unwrap_or_else(|| default_correct_output(inventory_path));
            save(&inventory, &output, quiet)
        }
        Command::Build {
            import,
            correct,
            output,
        } => {
            let config = apply_import_overrides(config, import)?;
            let config = apply_correct_overrides(config, correct)?;
            let mut inventory = run_import(&config, import, quiet)?;
            run_correct(&config, &mut inventory, correct, quiet)?;
            save(&inventory, output, quiet)
        }
    }
}

fn print_import_summary(report: &ImportReport, inventory: &Inventory) {
    println!("{}", "Station import".bold());
    println!(
        "  rows: {} parsed, {} skipped",
        report.rows_parsed, report.rows_skipped
    );
    println!(
        "  networks: {} of {} imported ({} stations, {} channels)",
        report.imported.len().to_string().green(),
        report.networks_requested(),
        inventory.station_count(),
        inventory.channel_count()
    );
    for skipped in &report.skipped {
        println!(
            "  {} {} ({} stations): {}",
            "skipped".yellow(),
            skipped.network,
            skipped.station_count,
            skipped.reason
        );
    }
}

fn print_correction_summary(report: &CorrectionReport, accepted_error: i32) {
    println!("{}", "Orientation corrections".bold());
    println!(
        "  records: {} accepted, {} rejected (error > {}), {} malformed",
        report.records_accepted.to_string().green(),
        report.records_rejected,
        accepted_error,
        report.rows_malformed
    );
    println!(
        "  stations corrected: {} ({} channels)",
        report.stations_corrected, report.channels_updated
    );
    if !report.unmatched_stations.is_empty() {
        println!(
            "  {} {}",
            "not in inventory:".yellow(),
            report.unmatched_stations.join(", ")
        );
    }
}
