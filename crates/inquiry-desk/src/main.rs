//! `inquiry-desk` - CLI and server entry point
//!
//! Runs the HTTP API by default; also offers configuration inspection and a
//! helper for producing the admin password digest.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use inquiry_desk::auth::hash_password;
use inquiry_desk::cli::{Cli, Command, ConfigCommand, HashPasswordCommand, ServeCommand};
use inquiry_desk::{init_logging, server, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config_path = cli.config.clone();
    match cli.command_or_default() {
        Command::Serve(serve_cmd) => handle_serve(config_path, serve_cmd).await,
        Command::HashPassword(hash_cmd) => handle_hash_password(config_path, &hash_cmd),
        Command::Config(config_cmd) => handle_config(config_path, config_cmd),
    }
}

fn load_config(config_path: Option<PathBuf>) -> anyhow::Result<Config> {
    Config::load_from(config_path).context("loading configuration")
}

async fn handle_serve(config_path: Option<PathBuf>, cmd: ServeCommand) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(port) = cmd.port {
        config.server.port = port;
    }
    if let Some(data_path) = cmd.data_path {
        config.storage.data_path = data_path;
    }
    config.validate()?;

    server::run(&config).await.context("running server")?;
    Ok(())
}

/// Reads the salt from configuration only when `--salt` is absent, and does
/// not require the rest of the configuration to be valid.
fn handle_hash_password(
    config_path: Option<PathBuf>,
    cmd: &HashPasswordCommand,
) -> anyhow::Result<()> {
    let salt = match &cmd.salt {
        Some(salt) => salt.clone(),
        None => {
            Config::load_unchecked(config_path)
                .context("loading configuration")?
                .admin
                .password_salt
        }
    };
    println!("{}", hash_password(&cmd.password, &salt));
    Ok(())
}

fn handle_config(config_path: Option<PathBuf>, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = load_config(config_path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Server]");
                println!("  Bind address:       {}", config.bind_addr());
                println!();
                println!("[Storage]");
                println!("  Data path:          {}", config.data_path().display());
                println!();
                println!("[Admin]");
                println!("  Username:           {}", config.admin.username);
                println!(
                    "  Password digest:    {}",
                    if config.admin.password_digest.is_some() {
                        "set"
                    } else {
                        "not set (logins disabled)"
                    }
                );
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
