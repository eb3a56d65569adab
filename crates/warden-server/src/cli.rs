//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Warden: authentication, token lifecycle and tiered access control.
#[derive(Parser, Debug)]
#[command(name = "warden", version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(
        short,
        long,
        default_value = "conf.development.yaml",
        env = "WARDEN_CONFIG"
    )]
    pub config: PathBuf,

    /// Log format (text, json)
    #[arg(long, default_value = "text", env = "WARDEN_LOG_FORMAT")]
    pub log_format: LogFormat,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for structured logging
    Json,
}
