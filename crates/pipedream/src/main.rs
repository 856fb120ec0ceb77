//! Pipedream step helpers for shell steps.
//!
//! Main entry point for the `pipedream` CLI.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{export, steps};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Pipedream step helpers - read upstream step outputs and export values
#[derive(Parser)]
#[command(name = "pipedream")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print upstream step outputs as JSON
    Steps(steps::StepsArgs),

    /// Export a named value to the host
    Export(export::ExportArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    let env = pipedream_config::ScriptEnv::from_env()?;

    // Logs go to stderr; stdout carries command output.
    let filter = if cli.verbose {
        "pipedream=debug,pipedream_sdk=debug,pipedream_config=debug,info"
    } else {
        env.log_filter()
    };
    pipedream_sdk::init_logging(filter);

    let ctx = commands::Context {
        runtime: pipedream_sdk::StepRuntime::new(env),
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Steps(args) => steps::run(args, &ctx),
        Commands::Export(args) => export::run(args, &ctx),
    }
}
