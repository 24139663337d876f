use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use meterflow_core::error::CoreError;
use meterflow_vision::ExtractionError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce the service's
/// `{error_code, error_description}` JSON error contract.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `meterflow_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A recognition/extraction failure, surfaced as invalid data with the
    /// underlying message preserved.
    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "INVALID_DATA", msg.clone())
                }
                CoreError::InvalidType(msg) => {
                    (StatusCode::BAD_REQUEST, "INVALID_TYPE", msg.clone())
                }
                CoreError::DoubleReport => (
                    StatusCode::CONFLICT,
                    "DOUBLE_REPORT",
                    "A reading for this meter type already exists for this month".to_string(),
                ),
                CoreError::MeasureNotFound => (
                    StatusCode::NOT_FOUND,
                    "MEASURE_NOT_FOUND",
                    "No measure found for the given id and value".to_string(),
                ),
                CoreError::MeasuresNotFound => (
                    StatusCode::NOT_FOUND,
                    "MEASURES_NOT_FOUND",
                    "No readings found".to_string(),
                ),
                CoreError::ConfirmationDuplicate => (
                    StatusCode::CONFLICT,
                    "CONFIRMATION_DUPLICATE",
                    "Reading has already been confirmed".to_string(),
                ),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- Extraction errors: invalid data, message preserved ---
            AppError::Extraction(err) => {
                tracing::warn!(error = %err, "Value extraction failed");
                (StatusCode::BAD_REQUEST, "INVALID_DATA", err.to_string())
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "INVALID_DATA", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        // Internal faults get the bare `{error}` shape; everything else
        // carries the code/description pair.
        let body = if status == StatusCode::INTERNAL_SERVER_ERROR {
            json!({ "error": message })
        } else {
            json!({
                "error_code": code,
                "error_description": message,
            })
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique violations on `uq_`-prefixed constraints map to the
///   duplicate-report conflict (the month index fired under a race).
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "MEASURE_NOT_FOUND",
            "Measure not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "DOUBLE_REPORT",
                        "A reading for this meter type already exists for this month"
                            .to_string(),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
