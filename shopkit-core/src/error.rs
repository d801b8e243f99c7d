use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::store::StoreError;
use crate::validation::FieldViolation;

/// Stable classification code for payload validation failures.
pub const CODE_VALIDATION: &str = "01";
/// Stable classification code for stock conflicts (adjustment would drive stock negative).
pub const CODE_STOCK_CONFLICT: &str = "02";

/// Structured failure payload shared by every service boundary.
///
/// Wire shape: `{ "code": "01", "messages": [ { "<field>": "<message>" }, ... ] }`,
/// one entry per offending field, in the order the fields were checked.
/// Every service emits this same shape so callers parse one structure
/// regardless of which service answered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub code: String,
    pub messages: Vec<FieldViolation>,
}

impl ErrorMessage {
    /// Payload for a failed input validation (`code` `"01"`).
    pub fn validation(violations: Vec<FieldViolation>) -> Self {
        Self {
            code: CODE_VALIDATION.to_string(),
            messages: violations,
        }
    }

    /// Payload for a rejected stock adjustment (`code` `"02"`).
    pub fn stock_conflict(message: impl Into<String>) -> Self {
        Self {
            code: CODE_STOCK_CONFLICT.to_string(),
            messages: vec![FieldViolation::new("stock", message)],
        }
    }
}

/// Helper to create a JSON error response with a standard `{ "error": message }` body.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body = serde_json::json!({ "error": message.into() });
    (status, Json(body)).into_response()
}

/// Error type flowing from the entity services to the HTTP boundary.
///
/// Not-found responses carry an empty body; validation and conflict
/// responses carry an [`ErrorMessage`].
pub enum ServiceError {
    /// The referenced record or partition does not exist.
    NotFound(String),
    /// The inbound payload failed field-level validation.
    Validation(ErrorMessage),
    /// The operation conflicts with a record invariant (e.g. insufficient stock).
    Conflict(ErrorMessage),
    /// A required peer could not be resolved or reached; the operation did not
    /// complete (or its outcome is unknown).
    Unavailable(String),
    /// The record store or another internal collaborator failed.
    Internal(String),
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND.into_response(),
            ServiceError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, Json(msg)).into_response()
            }
            ServiceError::Conflict(msg) => (StatusCode::CONFLICT, Json(msg)).into_response(),
            ServiceError::Unavailable(msg) => {
                error_response(StatusCode::SERVICE_UNAVAILABLE, msg)
            }
            ServiceError::Internal(msg) => {
                error_response(StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        }
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::NotFound(msg) => write!(f, "Not Found: {msg}"),
            ServiceError::Validation(msg) => {
                write!(f, "Validation Error: {} field(s)", msg.messages.len())
            }
            ServiceError::Conflict(msg) => write!(f, "Conflict ({})", msg.code),
            ServiceError::Unavailable(msg) => write!(f, "Unavailable: {msg}"),
            ServiceError::Internal(msg) => write!(f, "Internal Error: {msg}"),
        }
    }
}

impl std::fmt::Debug for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as std::fmt::Display>::fmt(self, f)
    }
}

impl std::error::Error for ServiceError {}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}
