//! HTTP API for inquiry-desk.
//!
//! This module wires the endpoint handlers into an axum router, together with
//! a permissive CORS layer, per-request tracing, and a panic guard that turns
//! a crashed handler into a generic 500.

pub mod error;
pub mod handlers;
pub mod responses;

use std::any::Any;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::middleware::{from_fn, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::info;

use crate::auth::AdminCredentials;
use crate::error::Error;
use crate::storage::InquiryRepository;

pub use error::ApiError;

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The record store.
    pub store: Arc<dyn InquiryRepository>,
    /// The admin identity checked by `/api/login`.
    pub admin: Arc<AdminCredentials>,
}

impl AppState {
    /// Bundle a store and admin credentials.
    #[must_use]
    pub fn new(store: Arc<dyn InquiryRepository>, admin: AdminCredentials) -> Self {
        Self {
            store,
            admin: Arc::new(admin),
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/login", post(handlers::login))
        .route("/api/contact", post(handlers::submit_contact))
        .route("/api/inquiries", get(handlers::list_inquiries))
        .route(
            "/api/inquiries/:id",
            patch(handlers::update_inquiry_status).delete(handlers::delete_inquiry),
        )
        .route("/api/stats", get(handlers::stats))
        .fallback(handlers::not_found)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(from_fn(cors_middleware))
        .layer(from_fn(trace_middleware))
        .with_state(state)
}

/// Answer a panicked handler with the same 500 body as any other internal error.
fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    };

    ApiError::Internal {
        message: "Internal server error",
        source: Error::internal(format!("handler panicked: {detail}")),
    }
    .into_response()
}

/// Allow every origin; answer preflight requests directly.
async fn cors_middleware(req: Request, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        let mut resp = StatusCode::NO_CONTENT.into_response();
        let headers = resp.headers_mut();
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET,POST,PATCH,DELETE,OPTIONS"),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("content-type,authorization"),
        );
        return resp;
    }

    let mut resp = next.run(req).await;
    resp.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    resp
}

async fn trace_middleware(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let resp = next.run(req).await;

    info!(
        %method,
        path = %path,
        status = resp.status().as_u16(),
        latency = ?started.elapsed(),
        "request"
    );
    resp
}
