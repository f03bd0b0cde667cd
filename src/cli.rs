//! CLI definitions for cronhost.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// cronhost CLI.
#[derive(Parser)]
#[command(name = "cronhost")]
#[command(about = "Host for cron-scheduled and on-demand jobs")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(
        short,
        long,
        default_value = "config/default.toml",
        env = "CRONHOST_CONFIG",
        global = true
    )]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run the host in foreground until Ctrl+C or SIGTERM (default)
    Run {
        /// Also write daily rotated log files to this directory
        #[arg(long)]
        log_dir: Option<PathBuf>,
    },

    /// Validate the configuration and print upcoming fire times
    Check {
        /// Number of upcoming fire times to print per expression
        #[arg(long, default_value_t = 3)]
        upcoming: usize,
    },
}
