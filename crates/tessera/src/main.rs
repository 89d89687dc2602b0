//! # tessera
//!
//! Tessera - Diagnostic aggregation and publication toolkit.
//!
//! ## Name Origin
//!
//! A **tessera** is one small tile of a mosaic. Each diagnostic producer
//! hands over its own tile; the engine sets them into a single picture and
//! shows it once the pieces stop moving.

mod commands;
mod config;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tessera")]
#[command(about = "Diagnostic aggregation and publication toolkit", long_about = None)]
#[command(version, disable_version_flag = true)]
struct Cli {
    /// Print version
    #[arg(short = 'v', short_alias = 'V', long, action = clap::ArgAction::Version)]
    version: (),
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON-lines diagnostic event log through the engine
    #[command(visible_alias = "maestro")]
    Replay(commands::replay::ReplayArgs),

    /// Show the effective configuration or its JSON Schema
    Config(commands::config::ConfigArgs),
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Replay(args) => commands::replay::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
