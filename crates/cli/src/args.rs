//! Command-line surface for `tipcheck-cli`.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "tipcheck-cli", version, about = "Operator tools for the tipcheck service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate the tip on a cast against the configured upstreams
    Validate {
        /// Canonical cast URL
        cast_url: String,
        /// Skip the cache read and recompute
        #[arg(long)]
        force_refresh: bool,
    },
    /// Show today's tip allowance for a user
    Allowance {
        /// Farcaster user id
        fid: u64,
    },
    /// Delete expired rows from the local SQLite cache
    Purge,
}
