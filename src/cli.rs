//! Command-line interface definitions using clap
//!
//! Without a subcommand the binary starts the interactive session.

use clap::{Parser, Subcommand};

/// Snaplink - an in-memory URL shortener with click analytics
#[derive(Parser)]
#[command(name = "snaplink")]
#[command(version)]
#[command(about = "An in-memory URL shortener with click analytics", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file (default: snaplink.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the interactive session (default)
    Session,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: stdout)
        output_path: Option<String>,
    },
}
