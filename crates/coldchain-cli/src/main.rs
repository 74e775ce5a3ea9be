//! # coldchain CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.
//! Logs go to stderr so that the JSON documents printed by `sign-claim`
//! and `simulate` can be piped.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use coldchain_cli::claim::{run_sign_claim, SignClaimArgs};
use coldchain_cli::keys::{run_keygen, KeygenArgs};
use coldchain_cli::simulate::{run_simulate, SimulateArgs};
use coldchain_ledger::CoordinatorConfig;

/// Cold-chain certification ledger CLI.
///
/// Generates participant keys, signs transition claims, and runs scenario
/// files against an in-memory ledger.
#[derive(Parser, Debug)]
#[command(name = "coldchain", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Coordinator policy file (YAML or JSON).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate an Ed25519 participant key.
    Keygen(KeygenArgs),

    /// Build and sign a transition claim.
    SignClaim(SignClaimArgs),

    /// Run a scenario file and print the resulting audit trails.
    Simulate(SimulateArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    if cli.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "coldchain CLI starting");

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<u8> {
    match cli.command {
        Commands::Keygen(args) => run_keygen(&args),
        Commands::SignClaim(args) => run_sign_claim(&args),
        Commands::Simulate(args) => {
            let config = load_config(cli.config.as_ref())?;
            run_simulate(&args, config)
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<CoordinatorConfig> {
    let Some(path) = path else {
        return Ok(CoordinatorConfig::default());
    };
    let config = CoordinatorConfig::load(path)
        .with_context(|| format!("failed to load policy {}", path.display()))?;
    tracing::info!(path = %path.display(), "loaded coordinator policy");
    Ok(config)
}
