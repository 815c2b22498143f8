use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "golem")]
#[command(about = "Golem population model: API, dashboard and dev tooling")]
pub struct Cli {
    /// Path to TOML configuration file (optional, defaults apply when absent)
    #[arg(short, long, global = true, default_value = "golem.toml")]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Serve the population API (port 16050)
    Api,

    /// Serve the headless dashboard (port 8501)
    Dashboard,

    /// Serve a local stand-in for the rival vampire API (port 16040)
    Rival,

    /// Start the API, wait until it is healthy, then run the dashboard
    Dev,

    /// Probe a health endpoint once; exit 0 when healthy
    Healthcheck {
        /// Health URL (defaults to the local API health endpoint)
        #[arg(long)]
        url: Option<String>,

        /// Probe timeout in seconds (defaults to probe.timeout_secs)
        #[arg(long)]
        timeout_secs: Option<u64>,
    },

    /// Remove the history database and local caches
    Clean,
}
