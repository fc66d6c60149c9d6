//! Configuration management for inquiry-desk.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::auth::AdminCredentials;
use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Directory name under the platform config dir.
const APP_DIR_NAME: &str = "inquiry-desk";

/// Prefix for nested environment overrides, e.g. `INQUIRY_DESK_ADMIN__USERNAME`.
const ENV_PREFIX: &str = "INQUIRY_DESK_";

/// Plain environment variable selecting the listening port.
const PORT_ENV: &str = "PORT";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. The `PORT` environment variable (for `server.port` only)
/// 2. Environment variables prefixed with `INQUIRY_DESK_`, nested with `__`
/// 3. TOML config file at `~/.config/inquiry-desk/config.toml`
/// 4. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration.
    pub server: ServerConfig,
    /// Record store configuration.
    pub storage: StorageConfig,
    /// Admin identity configuration.
    pub admin: AdminConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

/// Record store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the JSON document holding all inquiries.
    pub data_path: PathBuf,
}

/// Admin identity configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Admin username, matched case-sensitively.
    pub username: String,
    /// Salt appended to the password before hashing.
    pub password_salt: String,
    /// Lowercase hex `SHA256(password + salt)`.
    /// When unset, every login attempt is rejected.
    #[serde(skip_serializing)]
    pub password_digest: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data").join("inquiries.json"),
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password_salt: "inquiry-desk".to_string(),
            password_digest: None,
        }
    }
}

impl Config {
    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        Self::from_figment(&Self::layered_figment(config_path))
    }

    /// Load configuration from all sources without validating it.
    ///
    /// Used by `hash-password`, which must keep working while the configured
    /// digest is missing or malformed.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed into the config shape.
    pub fn load_unchecked(config_path: Option<PathBuf>) -> Result<Self> {
        let mut config: Config = Self::layered_figment(config_path).extract()?;
        config.normalize();
        Ok(config)
    }

    fn layered_figment(config_path: Option<PathBuf>) -> Figment {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        Self::file_figment(&config_file)
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(
                Env::raw()
                    .only(&[PORT_ENV])
                    .map(|_| "server.port".into()),
            )
    }

    /// Defaults merged with the given TOML file, without environment overrides.
    #[must_use]
    pub fn file_figment(config_file: &std::path::Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
    }

    /// Extract and validate a configuration from a prepared figment.
    ///
    /// # Errors
    ///
    /// Returns an error if extraction or validation fails.
    pub fn from_figment(figment: &Figment) -> Result<Self> {
        let mut config: Config = figment.extract()?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    fn normalize(&mut self) {
        if let Some(digest) = self.admin.password_digest.as_mut() {
            *digest = digest.trim().to_ascii_lowercase();
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::ConfigValidation {
                message: "server.port must be greater than 0".to_string(),
            });
        }

        if self.storage.data_path.as_os_str().is_empty() {
            return Err(Error::ConfigValidation {
                message: "storage.data_path must not be empty".to_string(),
            });
        }

        if self.admin.username.is_empty() {
            return Err(Error::ConfigValidation {
                message: "admin.username must not be empty".to_string(),
            });
        }

        if self.admin.password_salt.is_empty() {
            return Err(Error::ConfigValidation {
                message: "admin.password_salt must not be empty".to_string(),
            });
        }

        if let Some(digest) = &self.admin.password_digest {
            let is_sha256_hex = digest.len() == 64 && digest.chars().all(|c| c.is_ascii_hexdigit());
            if !is_sha256_hex {
                return Err(Error::ConfigValidation {
                    message: "admin.password_digest must be 64 hex characters".to_string(),
                });
            }
        }

        Ok(())
    }

    /// The `host:port` address the server binds.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Path to the record store document.
    #[must_use]
    pub fn data_path(&self) -> PathBuf {
        self.storage.data_path.clone()
    }

    /// Build the admin credentials used by the login endpoint.
    #[must_use]
    pub fn admin_credentials(&self) -> AdminCredentials {
        AdminCredentials::new(
            self.admin.username.clone(),
            self.admin.password_salt.clone(),
            self.admin.password_digest.clone(),
        )
    }
}
