//! Command-line interface for inquiry-desk.
//!
//! This module provides the CLI structure for the `inquiry-desk` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{ConfigCommand, HashPasswordCommand, ServeCommand};

/// inquiry-desk - Contact-form intake and inquiry tracking
///
/// Serves a small JSON API for submitting contact inquiries, listing and
/// updating them, and checking the admin login.
#[derive(Debug, Parser)]
#[command(name = "inquiry-desk")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute (defaults to `serve`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve(ServeCommand),

    /// Print the salted digest of a password for `admin.password_digest`
    HashPassword(HashPasswordCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }

    /// The command to run, with `serve` as the default.
    #[must_use]
    pub fn command_or_default(self) -> Command {
        self.command
            .unwrap_or_else(|| Command::Serve(ServeCommand::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn cli(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: None,
        }
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "inquiry-desk");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity() {
        use crate::logging::Verbosity;

        assert_eq!(cli(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(cli(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(cli(2, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["inquiry-desk"]).unwrap();
        assert!(cli.command.is_none());
        match cli.command_or_default() {
            Command::Serve(serve) => {
                assert!(serve.port.is_none());
                assert!(serve.data_path.is_none());
            }
            other => panic!("expected serve, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_serve_with_port() {
        let cli = Cli::try_parse_from(["inquiry-desk", "serve", "--port", "8080"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Serve(ServeCommand {
                port: Some(8080),
                ..
            }))
        ));
    }

    #[test]
    fn test_parse_hash_password() {
        let cli =
            Cli::try_parse_from(["inquiry-desk", "hash-password", "hunter2", "--salt", "s"])
                .unwrap();
        match cli.command {
            Some(Command::HashPassword(cmd)) => {
                assert_eq!(cmd.password, "hunter2");
                assert_eq!(cmd.salt.as_deref(), Some("s"));
            }
            other => panic!("expected hash-password, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_config_show() {
        let cli = Cli::try_parse_from(["inquiry-desk", "config", "show", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Config(ConfigCommand::Show { json: true }))
        ));
    }

    #[test]
    fn test_parse_with_config_and_flags() {
        let cli =
            Cli::try_parse_from(["inquiry-desk", "-c", "/etc/desk.toml", "-vv", "serve"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/etc/desk.toml")));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_invalid_port_rejected() {
        assert!(Cli::try_parse_from(["inquiry-desk", "serve", "--port", "99999"]).is_err());
    }
}
