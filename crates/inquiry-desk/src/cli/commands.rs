//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Serve command arguments.
#[derive(Debug, Default, Args)]
pub struct ServeCommand {
    /// Port to listen on (overrides configuration)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Path to the inquiry store document (overrides configuration)
    #[arg(long, value_name = "FILE")]
    pub data_path: Option<PathBuf>,
}

/// Hash-password command arguments.
#[derive(Debug, Args)]
pub struct HashPasswordCommand {
    /// The plaintext password to hash
    pub password: String,

    /// Salt to append (defaults to the configured admin.password_salt)
    #[arg(short, long)]
    pub salt: Option<String>,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show configuration file path
    Path,

    /// Validate configuration file
    Validate {
        /// Path to config file to validate (defaults to standard location)
        file: Option<PathBuf>,
    },
}
