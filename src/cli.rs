use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "hostpulse",
    author,
    version,
    about = "Container and GPU telemetry exporter for Prometheus",
    long_about = None
)]
pub struct Cli {
    /// Configuration file path
    #[arg(
        short,
        long,
        default_value = "/etc/hostpulse/config.yaml",
        env = "HOSTPULSE_CONFIG"
    )]
    pub config: PathBuf,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, env = "HOSTPULSE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Log format (json, pretty)
    #[arg(long, env = "HOSTPULSE_LOG_FORMAT")]
    pub log_format: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the exporter (default if no command specified)
    Run,

    /// Run one collection cycle and print the rendered metrics
    Scrape,

    /// Validate configuration file
    Validate {
        /// Configuration file to validate
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show current version
    Version,
}

pub fn parse() -> Cli {
    Cli::parse()
}

impl Cli {
    pub fn effective_log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }

    pub fn effective_log_format(&self) -> &str {
        self.log_format.as_deref().unwrap_or("pretty")
    }
}
