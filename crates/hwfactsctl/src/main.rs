//! hwfactsctl - run a hardware fact detection on this machine.
//!
//! Prints the ordered facts as a JSON array of
//! `[category, resource, attribute, value]` arrays on stdout. Logs go to
//! stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hwfacts::{Config, Detector, SystemProbe};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hwfactsctl")]
#[command(about = "Collect normalized hardware facts", long_about = None)]
#[command(version)]
struct Cli {
    /// Debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe the system and print the facts
    Detect {
        /// Config file (default: /etc/hwfacts/config.toml if present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Indent the JSON output
        #[arg(long)]
        pretty: bool,

        /// Fail when lshw, lscpu or dmesg is unavailable
        #[arg(long)]
        strict: bool,
    },

    /// Print the built-in configuration as TOML
    DefaultConfig,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn detect(config_path: Option<PathBuf>, pretty: bool, strict: bool) -> Result<()> {
    let mut config = match config_path {
        Some(path) => Config::load_from_path(&path)?,
        None => Config::load(),
    };
    config.strict |= strict;

    let probe = SystemProbe::new(&config);
    let facts = Detector::new(&probe, &config)
        .run()
        .context("Detection failed")?;
    info!("Collected {} facts", facts.len());

    let tuples: Vec<_> = facts.iter().map(|f| f.as_tuple()).collect();
    let json = if pretty {
        serde_json::to_string_pretty(&tuples)
    } else {
        serde_json::to_string(&tuples)
    }
    .context("Failed to serialize facts")?;
    println!("{}", json);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Detect {
            config,
            pretty,
            strict,
        } => detect(config, pretty, strict),
        Commands::DefaultConfig => {
            print!("{}", Config::default().to_toml()?);
            Ok(())
        }
    }
}
