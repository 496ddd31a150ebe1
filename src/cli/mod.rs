//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Curator using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Curator - staged article processing webhook
#[derive(Parser, Debug)]
#[command(name = "curator")]
#[command(version, about, long_about = None)]
#[command(author = "Curator Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "curator.toml", env = "CURATOR_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "CURATOR_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the push webhook
    Serve(commands::serve::ServeArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),

    /// Print a stored record
    Inspect(commands::inspect::InspectArgs),
}
