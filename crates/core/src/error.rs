//! Shared domain error type.
//!
//! Every failure an operation can surface maps to one of these kinds. Each
//! kind carries a stable machine-checkable code (see [`CoreError::kind`])
//! plus a human-readable one-line message via `Display`.

use crate::types::DbId;

/// Domain-level error kinds.
///
/// Session expiry and session-file corruption are intentionally NOT kinds
/// here: both normalize to "not authenticated" before any operation runs,
/// so callers only ever see `AuthenticationFailed` or `PermissionDenied`.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Credentials did not verify, or no authenticated actor is present.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The actor is authenticated but not authorized for this target.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Malformed or business-rule-violating input.
    #[error("validation error: {0}")]
    Validation(String),

    /// A referenced id does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// A uniqueness constraint was violated (duplicate email/username).
    #[error("conflict: {0}")]
    Conflict(String),

    /// An unexpected failure; the original cause is kept for diagnostics.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Stable machine-checkable code for this error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::AuthenticationFailed(_) => "AUTHENTICATION_FAILED",
            CoreError::PermissionDenied(_) => "PERMISSION_DENIED",
            CoreError::Validation(_) => "VALIDATION_ERROR",
            CoreError::NotFound { .. } => "NOT_FOUND",
            CoreError::Conflict(_) => "CONFLICT",
            CoreError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
