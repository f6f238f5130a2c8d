use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use idorlab_store::StoreError;

/// One request field that failed validation.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// An error surfaced by an API handler.
///
/// Every variant maps to a stable `{"error": ...}` JSON body; validation
/// failures additionally itemize the offending fields. Internal faults are
/// logged server-side and reach the client as a generic message only.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not authenticated")]
    AuthRequired,

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("invalid request data")]
    Validation(Vec<FieldError>),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("username already exists")]
    UsernameTaken,

    #[error("internal server error")]
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::AuthRequired => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Not authenticated" })))
                    .into_response()
            }
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Invalid username or password" })),
            )
                .into_response(),
            ApiError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid request data", "fields": fields })),
            )
                .into_response(),
            ApiError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": format!("{} not found", what) })),
            )
                .into_response(),
            ApiError::UsernameTaken => (
                StatusCode::CONFLICT,
                Json(json!({ "error": "Username already exists" })),
            )
                .into_response(),
            ApiError::Internal(e) => {
                error!("internal error: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::UsernameTaken => ApiError::UsernameTaken,
            StoreError::Poisoned => ApiError::Internal(anyhow::Error::new(e)),
        }
    }
}
