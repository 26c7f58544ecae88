//! Gantry CLI - release-style deployment over SSH
//!
//! Usage: gantry <COMMAND>
//!
//! Commands:
//!   deploy  Package or synchronize the local tree into a new remote release
//!   remove  Delete the entire deploy root from the remote host

use anyhow::Result;
use clap::Parser;

use gantry::cli::{Cli, Commands};
use gantry::commands;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Deploy { config } => commands::deploy::run(&config, cli.json, cli.verbose),
        Commands::Remove { config, yes } => {
            commands::remove::run(&config, cli.json, cli.verbose, yes)
        }
    }
}
