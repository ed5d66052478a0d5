mod commands;
mod config;
mod logging;
mod shell;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use config::Config;

#[derive(Parser)]
#[command(name = "rackd-router")]
#[command(version, about = "rackd dashboard router - dispatch and resolve paths without a browser", long_about = None)]
struct Cli {
    /// Route table configuration (defaults to ./rackd-router.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dispatch a path as the dashboard does at startup
    Dispatch {
        /// Path to dispatch
        path: String,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve a link target against the current path
    Resolve {
        /// Current path
        current: String,

        /// Link target, absolute or relative
        target: String,
    },

    /// Open a path, then follow a navigation request from it
    Goto {
        /// Path the dashboard is on
        current: String,

        /// Link target, absolute or relative
        target: String,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the route table in match order
    Routes,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) if !path.exists() => bail!("Config file not found: {:?}", path),
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };

    logging::init(&config.logging.filter)?;

    // Execute command
    match cli.command {
        Commands::Dispatch { path, json } => {
            commands::dispatch::execute(&config, &path, json)?;
        }
        Commands::Resolve { current, target } => {
            commands::resolve::execute(&current, &target)?;
        }
        Commands::Goto {
            current,
            target,
            json,
        } => {
            commands::dispatch::execute_goto(&config, &current, &target, json)?;
        }
        Commands::Routes => {
            commands::routes::execute(&config)?;
        }
    }

    Ok(())
}
