//! CLI Application logic
//!
//! Parses arguments, sets up logging and runs every configured source.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use sql2xlsx_core::{run_with_databases, Config, PartitionReport};
use sql2xlsx_data::XlsxTemplate;

#[derive(Parser)]
#[command(name = "sql2xlsx")]
#[command(author, version, about = "Partitioned SQL reports in spreadsheet templates", long_about = None)]
struct Cli {
    /// Report configuration (YAML, or TOML with a .toml extension)
    config: PathBuf,

    /// Directory receiving the generated workbooks
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Log debug details (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

/// Run the CLI application
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    println!("sql2xlsx v{}", sql2xlsx_core::VERSION);
    let reports = report_command(&cli.config, &cli.output_dir)?;

    for report in &reports {
        println!("  Created: {}", report.path.display());
    }
    println!();
    println!("{} report(s) written", reports.len());

    Ok(())
}

/// Install the stderr log subscriber
///
/// `RUST_LOG` wins when set; otherwise the level is `info`, or `debug` when
/// `verbose` is set. Safe to call more than once.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Load a configuration file and write all of its reports
///
/// Relative template paths are resolved against the current directory.
pub fn report_command(config_path: &Path, output_dir: &Path) -> Result<Vec<PartitionReport>> {
    if !config_path.exists() {
        anyhow::bail!("Configuration file not found: {}", config_path.display());
    }

    let config = Config::load(config_path)
        .with_context(|| format!("Failed to load configuration: {}", config_path.display()))?;
    debug!("Loaded {} source(s)", config.input.sources.len());

    fs::create_dir_all(output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            output_dir.display()
        )
    })?;

    let template = XlsxTemplate::new(&config.template.path, &config.template.sheet)
        .with_context(|| format!("Failed to open template: {}", config.template.path.display()))?;

    run_with_databases(&config, &template, output_dir).context("Report generation failed")
}
