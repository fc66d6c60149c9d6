//! One handler per endpoint.
//!
//! Handlers validate input, call the record store through [`AppState`], and
//! shape the JSON response. None of them check for an admin session; login is
//! advisory only.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use tracing::{info, warn};

use super::error::ApiError;
use super::responses::{
    ContactResponse, HealthResponse, InquiriesResponse, InquiryResponse, LoginRequest,
    LoginResponse, MessageResponse, StatsResponse, StatusUpdateRequest, UserInfo,
};
use super::AppState;
use crate::inquiry::{ContactSubmission, InquiryStatus};

/// Result type for handlers.
pub type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

/// `GET /api/health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Server is running".to_string(),
    })
}

/// `POST /api/login`
///
/// # Errors
///
/// 400 if either field is missing, 401 if the credentials do not match.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<LoginResponse> {
    let Json(request) = payload?;

    let (Some(username), Some(password)) = (
        request.username.filter(|u| !u.is_empty()),
        request.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::bad_request("Username and password are required"));
    };

    if !state.admin.verify(&username, &password) {
        warn!(username = %username, "Rejected login attempt");
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    info!(username = %username, "Admin logged in");
    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        user: UserInfo { username },
    }))
}

/// `POST /api/contact`
///
/// # Errors
///
/// 400 on missing fields or a malformed email, 500 if the store write fails.
pub async fn submit_contact(
    State(state): State<AppState>,
    payload: Result<Json<ContactSubmission>, JsonRejection>,
) -> ApiResult<ContactResponse> {
    let Json(submission) = payload?;
    let submission = submission
        .validate()
        .map_err(|err| ApiError::bad_request(err.to_string()))?;

    let inquiry = state
        .store
        .create(submission)
        .await
        .map_err(|err| ApiError::from_store(err, "Failed to submit inquiry"))?;

    Ok(Json(ContactResponse {
        success: true,
        message: "Inquiry submitted successfully".to_string(),
        inquiry_id: inquiry.id,
    }))
}

/// `GET /api/inquiries`
///
/// # Errors
///
/// 500 if the store fails.
pub async fn list_inquiries(State(state): State<AppState>) -> ApiResult<InquiriesResponse> {
    let inquiries = state
        .store
        .list()
        .await
        .map_err(|err| ApiError::from_store(err, "Failed to fetch inquiries"))?;

    Ok(Json(InquiriesResponse {
        success: true,
        inquiries,
    }))
}

/// `PATCH /api/inquiries/:id`
///
/// # Errors
///
/// 400 if the status is missing or not one of `new`, `active`, `completed`;
/// 404 if the id is unknown; 500 if the store fails.
pub async fn update_inquiry_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> ApiResult<InquiryResponse> {
    let Json(request) = payload?;

    let status = request
        .status
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request("Status is required"))?
        .parse::<InquiryStatus>()
        .map_err(|err| ApiError::bad_request(err.to_string()))?;

    let inquiry = state
        .store
        .update_status(&id, status)
        .await
        .map_err(|err| ApiError::from_store(err, "Failed to update inquiry"))?;

    Ok(Json(InquiryResponse {
        success: true,
        message: "Inquiry updated successfully".to_string(),
        inquiry,
    }))
}

/// `DELETE /api/inquiries/:id`
///
/// # Errors
///
/// 404 if the id is unknown, 500 if the store fails.
pub async fn delete_inquiry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<MessageResponse> {
    state
        .store
        .delete(&id)
        .await
        .map_err(|err| ApiError::from_store(err, "Failed to delete inquiry"))?;

    Ok(Json(MessageResponse::ok("Inquiry deleted successfully")))
}

/// `GET /api/stats`
///
/// # Errors
///
/// 500 if the store fails.
pub async fn stats(State(state): State<AppState>) -> ApiResult<StatsResponse> {
    let stats = state
        .store
        .stats()
        .await
        .map_err(|err| ApiError::from_store(err, "Failed to fetch stats"))?;

    Ok(Json(StatsResponse {
        success: true,
        stats,
    }))
}

/// Fallback for unknown routes.
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}
