use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Gantry - release-style deployment over SSH
#[derive(Parser, Debug)]
#[command(name = "gantry")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output NDJSON events for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Deploy a new release to the configured host
    Deploy {
        /// Path to the configuration file
        #[arg(short, long, default_value = "gantry.toml")]
        config: PathBuf,
    },

    /// Delete the entire deploy root from the remote host
    Remove {
        /// Path to the configuration file
        #[arg(short, long, default_value = "gantry.toml")]
        config: PathBuf,

        /// Confirm the deletion (required)
        #[arg(short, long)]
        yes: bool,
    },
}
