//! Unified error handling
//!
//! [`AppError`] covers the whole taxonomy the HTTP surface can produce:
//!
//! | Variant | Status | Body |
//! |---------|--------|------|
//! | Validation | 400 | `{"msg": ...}` |
//! | Unauthorized | 401 | `{"msg": ...}` |
//! | NotFound | 404 | `{"msg": ...}` |
//! | Transaction | 500 | `{"error": ..., "details": ...}` |
//! | Render | 500 | `{"msg": ...}` (localized generic message) |
//! | Database / Internal | 500 | `{"msg": ...}` (generic) |
//!
//! Validation errors are raised before any write and never leave partial
//! state behind. Transaction errors are only produced after a full rollback.

use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

/// Application error enum
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing required field, bad enum value, bad format value (400)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Missing/invalid/expired credential or download token (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Unknown order/product/banner/token (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Datastore failure inside a transactional operation, after rollback (500)
    #[error("Transaction failed: {details}")]
    Transaction {
        /// Generic message shown as the `error` field
        msg: String,
        /// Underlying error detail echoed back to the admin caller
        details: String,
    },

    /// Document generation failure (500)
    #[error("Render failed: {0}")]
    Render(String),

    /// Non-transactional datastore failure (500)
    #[error("Database error: {0}")]
    Database(String),

    /// Anything else (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Transaction failure with a generic message and echoed detail
    pub fn transaction(msg: impl Into<String>, details: impl Into<String>) -> Self {
        Self::Transaction {
            msg: msg.into(),
            details: details.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "msg": msg }))).into_response()
            }
            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "msg": msg }))).into_response()
            }
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(json!({ "msg": msg }))).into_response()
            }
            AppError::Transaction { msg, details } => {
                error!(target: "database", error = %details, "Transaction failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": msg, "details": details })),
                )
                    .into_response()
            }
            AppError::Render(msg) => {
                error!(target: "export", error = %msg, "Document generation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "msg": "Erreur lors de la génération du document" })),
                )
                    .into_response()
            }
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "msg": "Database error" })),
                )
                    .into_response()
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "msg": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        AppError::Validation(format!("Multipart error: {e}"))
    }
}

/// Result alias used by handlers
pub type AppResult<T> = Result<T, AppError>;
