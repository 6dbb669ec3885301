//! Blinc Spy CLI
//!
//! Replay scroll scripts against a page description and print which section
//! the scroll spy reports as active.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod replay;

use config::{Scenario, SCENARIO_TEMPLATE};

#[derive(Parser)]
#[command(name = "blinc-spy")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Blinc scroll-spy simulator", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scenario and print the active section after each step
    Run {
        /// Scenario file, or a directory containing spy.toml
        #[arg(default_value = ".")]
        scenario: PathBuf,
    },

    /// Validate a scenario without replaying it
    Check {
        /// Scenario file, or a directory containing spy.toml
        #[arg(default_value = ".")]
        scenario: PathBuf,
    },

    /// Write a starter scenario
    Init {
        /// Output file
        #[arg(default_value = config::SCENARIO_FILE)]
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Run { scenario } => cmd_run(&scenario),
        Commands::Check { scenario } => cmd_check(&scenario),
        Commands::Init { path } => cmd_init(&path),
    }
}

fn cmd_run(path: &Path) -> Result<()> {
    let scenario = Scenario::load(path)?;
    info!(
        "Replaying {} steps over {} targets",
        scenario.steps.len(),
        scenario.targets.len()
    );

    for line in replay::replay(&scenario)? {
        println!("{line}");
    }
    Ok(())
}

fn cmd_check(path: &Path) -> Result<()> {
    let scenario = Scenario::load(path)?;
    let report = replay::check(&scenario)?;

    info!(
        "{} elements, {} targets, {} steps",
        report.elements, report.targets, report.steps
    );
    if !report.missing.is_empty() {
        anyhow::bail!("Missing elements: {}", report.missing.join(", "));
    }
    info!("Scenario OK");
    Ok(())
}

fn cmd_init(path: &Path) -> Result<()> {
    if path.exists() {
        anyhow::bail!("'{}' already exists", path.display());
    }
    fs::write(path, SCENARIO_TEMPLATE)?;

    info!("Scenario written to {}", path.display());
    info!("Run `blinc-spy run {}` to replay it", path.display());
    Ok(())
}
