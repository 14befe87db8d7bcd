//! Public error types for the estate module.
//!
//! These errors are safe to expose to other modules and consumers: each one
//! carries a machine-readable [`ErrorKind`] next to a human-readable message.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Machine-readable error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Forbidden,
    AuthBackendUnavailable,
    Validation,
    Internal,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Forbidden => "forbidden",
            Self::AuthBackendUnavailable => "auth_backend_unavailable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }
}

/// Errors returned across the estate module boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct EstateError {
    kind: ErrorKind,
    message: String,
}

impl EstateError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    #[must_use]
    pub fn forbidden() -> Self {
        Self::new(ErrorKind::Forbidden, "Access denied")
    }

    #[must_use]
    pub fn auth_backend_unavailable() -> Self {
        Self::new(
            ErrorKind::AuthBackendUnavailable,
            "Authentication service unavailable",
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    #[must_use]
    pub fn internal() -> Self {
        Self::new(ErrorKind::Internal, "Internal error")
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}
