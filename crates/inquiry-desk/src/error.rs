//! Error types for inquiry-desk.
//!
//! This module defines the crate-level error type used by configuration,
//! storage, and server startup. HTTP-facing failures are mapped separately in
//! [`crate::api::ApiError`].

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for inquiry-desk operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// The record store document could not be read.
    #[error("failed to read record store at {path}: {source}")]
    StoreRead {
        /// Path to the store file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The record store document could not be parsed.
    #[error("record store at {path} is not a valid inquiry document: {source}")]
    StoreParse {
        /// Path to the store file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// The record store document could not be written.
    #[error("failed to write record store at {path}: {source}")]
    StoreWrite {
        /// Path to the store file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// No inquiry exists with the given id.
    #[error("inquiry not found: {id}")]
    InquiryNotFound {
        /// The id that was looked up.
        id: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Server Errors ===
    /// The HTTP listener could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// The address that was requested.
        addr: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for inquiry-desk operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create an inquiry-not-found error.
    #[must_use]
    pub fn inquiry_not_found(id: impl Into<String>) -> Self {
        Self::InquiryNotFound { id: id.into() }
    }

    /// Check if this error means the requested inquiry does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::InquiryNotFound { .. })
    }
}
