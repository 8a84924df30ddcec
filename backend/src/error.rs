//! Error handling for the Restaurant Inventory Management Platform
//!
//! Provides consistent error responses in English and Indonesian. Every
//! handler returns `AppResult`; business failures are typed and mapped to
//! status codes here, and only truly unexpected errors surface as the
//! opaque internal-error message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::validation::Violation;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String, message_id: String },

    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_id: String,
    },

    /// Per-line business-rule violations from the transaction validator
    #[error("Detail validation failed with {} violation(s)", .0.len())]
    DetailValidation(Vec<Violation>),

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Conflict: {message}")]
    Conflict {
        resource: String,
        message: String,
        message_id: String,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Business logic errors
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    /// Ledger-level non-negativity recheck failure. Distinct from
    /// validation: it reflects a race against concurrent stock movements,
    /// not a bad request.
    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

/// Error response envelope: `{ ok: false, message, error }`
#[derive(Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub message: String,
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violations: Option<Vec<Violation>>,
}

impl ErrorDetail {
    fn new(code: &str, message_en: impl Into<String>, message_id: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message_en: message_en.into(),
            message_id: message_id.into(),
            field: None,
            violations: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail::new(
                    "INVALID_CREDENTIALS",
                    "Invalid username or password",
                    "Nama pengguna atau kata sandi salah",
                ),
            ),
            AppError::InsufficientPermissions => (
                StatusCode::FORBIDDEN,
                ErrorDetail::new(
                    "INSUFFICIENT_PERMISSIONS",
                    "You do not have permission to perform this action",
                    "Anda tidak memiliki izin untuk melakukan tindakan ini",
                ),
            ),
            AppError::Unauthorized {
                message,
                message_id,
            } => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail::new("UNAUTHORIZED", message.clone(), message_id.clone()),
            ),
            AppError::Validation {
                field,
                message,
                message_id,
            } => {
                let mut detail =
                    ErrorDetail::new("VALIDATION_ERROR", message.clone(), message_id.clone());
                detail.field = Some(field.clone());
                (StatusCode::BAD_REQUEST, detail)
            }
            AppError::DetailValidation(violations) => {
                let mut detail = ErrorDetail::new(
                    "VALIDATION_ERROR",
                    "One or more detail lines are invalid",
                    "Satu atau lebih baris detail tidak valid",
                );
                detail.violations = Some(violations.clone());
                (StatusCode::BAD_REQUEST, detail)
            }
            AppError::DuplicateEntry(field) => {
                let mut detail = ErrorDetail::new(
                    "DUPLICATE_ENTRY",
                    format!("A record with this {} already exists", field),
                    format!("Data dengan {} ini sudah ada", field),
                );
                detail.field = Some(field.clone());
                (StatusCode::CONFLICT, detail)
            }
            AppError::Conflict {
                resource,
                message,
                message_id,
            } => {
                let mut detail =
                    ErrorDetail::new("CONFLICT", message.clone(), message_id.clone());
                detail.field = Some(resource.clone());
                (StatusCode::CONFLICT, detail)
            }
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail::new(
                    "NOT_FOUND",
                    format!("{} not found", resource),
                    format!("{} tidak ditemukan", resource),
                ),
            ),
            AppError::InvalidStateTransition(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail::new(
                    "INVALID_STATE_TRANSITION",
                    msg.clone(),
                    format!("Perubahan status tidak diizinkan: {}", msg),
                ),
            ),
            AppError::InsufficientStock(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail::new(
                    "INSUFFICIENT_STOCK",
                    msg.clone(),
                    format!("Stok tidak mencukupi: {}", msg),
                ),
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new(
                    "DATABASE_ERROR",
                    "A database error occurred",
                    "Terjadi kesalahan basis data",
                ),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new(
                    "INTERNAL_ERROR",
                    msg.clone(),
                    "Terjadi kesalahan internal server",
                ),
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new(
                    "INTERNAL_ERROR",
                    "An internal server error occurred",
                    "Terjadi kesalahan internal server",
                ),
            ),
        };

        // Server faults get full context in the logs; validation noise does not
        match &self {
            AppError::DatabaseError(_) | AppError::Internal(_) | AppError::InternalError(_) => {
                tracing::error!("Error: {:?}", self);
            }
            _ => tracing::debug!("Request failed: {:?}", self),
        }

        let body = ErrorResponse {
            ok: false,
            message: error_detail.message_en.clone(),
            error: error_detail,
        };

        (status, Json(body)).into_response()
    }
}

/// Map a sqlx unique-constraint violation to a Conflict error; everything
/// else stays a database error.
pub fn map_unique_violation(err: sqlx::Error, field: &str) -> AppError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.code().as_deref() == Some("23505") {
            return AppError::DuplicateEntry(field.to_string());
        }
    }
    AppError::DatabaseError(err)
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
