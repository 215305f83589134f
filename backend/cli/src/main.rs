mod assembly;

use std::error::Error as StdError;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::Level;

use logship_config::{config_path, load_and_prepare, load_config, validate};
use logship_hooks::{CapturedError, Severity};

#[derive(Parser)]
#[command(name = "logship")]
#[command(about = "Ship structured log entries to a search index and to daily log files")]
#[command(version)]
struct Cli {
    /// Config file (defaults to $LOGSHIP_CONFIG or ./logship.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Emit one log entry through the file logger and the indexing hook
    Emit {
        /// Severity of the entry
        #[arg(short, long, default_value = "info")]
        level: Severity,
        /// Attach an error with this description under the `error` field
        #[arg(short, long)]
        error: Option<String>,
        message: String,
    },
    /// Query the search cluster's root endpoint
    Ping,
    /// Validate the config file and print every problem found
    CheckConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let path = cli.config.unwrap_or_else(config_path);

    match cli.command {
        Commands::Emit {
            level,
            error,
            message,
        } => emit(&path, level, error, &message),
        Commands::Ping => ping(&path),
        Commands::CheckConfig => check_config(&path),
    }
}

fn emit(path: &Path, level: Severity, error: Option<String>, message: &str) -> Result<()> {
    let config = load_and_prepare(path)?;
    let _app = assembly::assemble(&config)?;

    let error = error.map(|text| {
        CapturedError::capture(&std::io::Error::other(text))
    });
    let error = error.as_ref().map(|e| e as &(dyn StdError + 'static));

    // `tracing` levels must be known at compile time.
    match level.as_tracing_level() {
        Level::ERROR => tracing::error!(error, "{message}"),
        Level::WARN => tracing::warn!(error, "{message}"),
        Level::INFO => tracing::info!(error, "{message}"),
        Level::DEBUG => tracing::debug!(error, "{message}"),
        _ => tracing::trace!(error, "{message}"),
    }
    Ok(())
}

fn ping(path: &Path) -> Result<()> {
    let config = load_and_prepare(path)?;
    let client = assembly::build_client(&config)?;
    let info = client.ping()?;
    println!(
        "cluster '{}' (node '{}'), version {}",
        info.cluster_name, info.name, info.version.number
    );
    Ok(())
}

fn check_config(path: &Path) -> Result<()> {
    let config = load_config(path)?;
    let report = validate(&config);
    for warning in &report.warnings {
        println!("warning: {}: {}", warning.path, warning.message);
    }
    for error in &report.errors {
        println!("error: {}: {}", error.path, error.message);
    }
    if !report.is_valid() {
        bail!("{} error(s) in {}", report.errors.len(), path.display());
    }
    println!("{} is valid", path.display());
    Ok(())
}
