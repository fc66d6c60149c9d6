//! Request and response bodies.

use serde::{Deserialize, Serialize};

use crate::inquiry::Inquiry;
use crate::storage::InquiryStats;

/// `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"`.
    pub status: String,
    /// Human-readable status line.
    pub message: String,
}

/// `POST /api/login` body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    /// Attempted username.
    pub username: Option<String>,
    /// Attempted password.
    pub password: Option<String>,
}

/// The user echoed back on a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    /// Admin username.
    pub username: String,
}

/// `POST /api/login` success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Always `true`.
    pub success: bool,
    /// Human-readable outcome.
    pub message: String,
    /// The authenticated user.
    pub user: UserInfo,
}

/// `POST /api/contact` success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    /// Always `true`.
    pub success: bool,
    /// Human-readable outcome.
    pub message: String,
    /// Id of the stored inquiry.
    pub inquiry_id: String,
}

/// `GET /api/inquiries`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InquiriesResponse {
    /// Always `true`.
    pub success: bool,
    /// Newest first.
    pub inquiries: Vec<Inquiry>,
}

/// `PATCH /api/inquiries/:id` body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusUpdateRequest {
    /// New status name.
    pub status: Option<String>,
}

/// `PATCH /api/inquiries/:id` success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InquiryResponse {
    /// Always `true`.
    pub success: bool,
    /// Human-readable outcome.
    pub message: String,
    /// The updated record.
    pub inquiry: Inquiry,
}

/// `GET /api/stats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsResponse {
    /// Always `true`.
    pub success: bool,
    /// The computed counts.
    pub stats: InquiryStats,
}

/// Bare outcome, used for deletes and every error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Whether the request succeeded.
    pub success: bool,
    /// Human-readable outcome.
    pub message: String,
}

impl MessageResponse {
    /// A successful outcome.
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// A failed outcome.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
