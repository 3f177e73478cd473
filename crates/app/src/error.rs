//! Application-level error type for the operation layer.
//!
//! Wraps [`CoreError`] for domain errors and classifies database failures:
//! uniqueness violations detected at commit time surface as conflicts,
//! everything else as internal errors with the cause preserved.

use clientele_core::error::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `clientele_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for operation return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Stable machine-checkable code, aligned with [`CoreError::kind`].
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Core(core) => core.kind(),
            AppError::Database(err) => classify_sqlx_error(err).0,
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// One-line message suitable for direct display.
    pub fn message(&self) -> String {
        match self {
            AppError::Core(core) => core.to_string(),
            AppError::Database(err) => classify_sqlx_error(err).1,
            AppError::Internal(msg) => msg.clone(),
        }
    }
}

/// Classify a sqlx error into a stable kind code and a sanitized message.
///
/// - `RowNotFound` maps to NOT_FOUND.
/// - Unique constraint violations map to CONFLICT (race on uniqueness that
///   slipped past the prechecks; the transaction has already rolled back).
/// - Everything else maps to INTERNAL_ERROR with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (&'static str, String) {
    match err {
        sqlx::Error::RowNotFound => ("NOT_FOUND", "Resource not found".to_string()),
        sqlx::Error::Database(db_err) => {
            if db_err.is_unique_violation() {
                return (
                    "CONFLICT",
                    format!("Duplicate value violates a unique constraint: {}", db_err.message()),
                );
            }
            tracing::error!(error = %db_err, "Database error");
            ("INTERNAL_ERROR", "An internal error occurred".to_string())
        }
        other => {
            tracing::error!(error = %other, "Database error");
            ("INTERNAL_ERROR", "An internal error occurred".to_string())
        }
    }
}

/// Map `validator` derive failures onto the domain validation kind.
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Core(CoreError::Validation(errors.to_string()))
    }
}
