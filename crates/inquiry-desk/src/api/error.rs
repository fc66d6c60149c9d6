//! HTTP-facing errors.
//!
//! Every failure leaves the API as `{ "success": false, "message": ... }` with
//! a status code chosen by the variant. Internal failures log the underlying
//! error and send only a generic message to the client.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use super::responses::MessageResponse;
use crate::error::Error;

/// Errors returned by request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed input.
    #[error("{0}")]
    BadRequest(String),

    /// Login rejected.
    #[error("{0}")]
    Unauthorized(String),

    /// The addressed resource does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Storage or other server-side failure.
    #[error("{message}")]
    Internal {
        /// Generic message sent to the client.
        message: &'static str,
        /// The underlying cause, logged server-side only.
        #[source]
        source: Error,
    },
}

impl ApiError {
    /// Create a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Map a store failure, turning unknown ids into 404 and anything else
    /// into a 500 carrying `message`.
    #[must_use]
    pub fn from_store(err: Error, message: &'static str) -> Self {
        if err.is_not_found() {
            Self::NotFound("Inquiry not found".to_string())
        } else {
            Self::Internal {
                message,
                source: err,
            }
        }
    }

    /// The HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(format!("Invalid JSON body: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal { message, source } = &self {
            error!(error = %source, "{message}");
        }
        let status = self.status();
        (status, Json(MessageResponse::failure(self.to_string()))).into_response()
    }
}
