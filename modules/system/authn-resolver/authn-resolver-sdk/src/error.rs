//! Error types for the `AuthN` resolver.

use thiserror::Error;

/// Errors that can occur when using the `AuthN` resolver API.
#[derive(Debug, Error)]
pub enum AuthNResolverError {
    /// The token is invalid, expired, or malformed.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// No `AuthN` backend is available to handle the request.
    #[error("no plugin available")]
    NoPluginAvailable,

    /// The backend is not reachable right now.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthNResolverError {
    /// Whether the error means "not logged in" rather than "cannot tell".
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}
