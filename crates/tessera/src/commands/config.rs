//! Config command - Show the effective configuration or its JSON Schema

use clap::Args;
use std::path::PathBuf;

use crate::config::{load_config, TESSERA_CONFIG_SCHEMA};

#[derive(Args)]
pub struct ConfigArgs {
    /// Print the JSON Schema for tessera.config.json instead
    #[arg(long)]
    pub schema: bool,

    /// Config file path (defaults to ./tessera.config.json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: ConfigArgs) {
    if args.schema {
        println!("{}", TESSERA_CONFIG_SCHEMA);
        return;
    }

    let config = load_config(args.config.as_deref());
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize configuration: {}", e);
            std::process::exit(1);
        }
    }
}
