//! Server startup.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::api::{build_router, AppState};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::storage::JsonFileStore;

/// Open the record store and build the handler state for `config`.
///
/// # Errors
///
/// Returns an error if the record store cannot be opened.
pub async fn build_state(config: &Config) -> Result<AppState> {
    let store = JsonFileStore::open(config.data_path()).await?;
    let admin = config.admin_credentials();
    if !admin.has_digest() {
        warn!("No admin.password_digest configured; every login will be rejected");
    }
    Ok(AppState::new(Arc::new(store), admin))
}

/// Bind the configured address and serve until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the store cannot be opened, the address cannot be
/// bound, or the server fails.
pub async fn run(config: &Config) -> Result<()> {
    let state = build_state(config).await?;

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| Error::Bind {
            addr: addr.clone(),
            source,
        })?;

    serve(listener, state, shutdown_signal()).await
}

/// Serve the API on an already-bound listener until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the underlying server fails.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let local_addr = listener.local_addr()?;
    info!("Listening on http://{local_addr}");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {err}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
