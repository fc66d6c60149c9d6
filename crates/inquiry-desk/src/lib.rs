//! `inquiry-desk` - Contact-form intake and inquiry tracking
//!
//! This library provides the record store, admin password check, and HTTP
//! handlers behind the `inquiry-desk` server.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod inquiry;
pub mod logging;
pub mod server;
pub mod storage;

pub use api::{build_router, AppState};
pub use auth::AdminCredentials;
pub use config::Config;
pub use error::{Error, Result};
pub use inquiry::{Inquiry, InquiryStatus};
pub use logging::init_logging;
pub use storage::{InquiryRepository, InquiryStats, JsonFileStore};
