use estate_sdk::EstateError;
use thiserror::Error;
use uuid::Uuid;

/// Domain-specific errors using thiserror.
///
/// `entity` names the table-level entity involved (`colony`, `floor`, ...), so
/// a failing store call can always be traced to its entity type.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("{entity} conflict: {message}")]
    Conflict {
        entity: &'static str,
        message: String,
    },

    /// A foreign key rejected the write: a referenced row is missing or a
    /// referencing row still exists.
    #[error("{entity} reference violation: {message}")]
    ReferenceViolation {
        entity: &'static str,
        message: String,
    },

    #[error("Access forbidden: {0}")]
    Forbidden(String),

    #[error("Authentication backend unavailable: {0}")]
    AuthBackendUnavailable(String),

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Database error on {entity}: {message}")]
    Database {
        entity: &'static str,
        message: String,
    },
}

impl DomainError {
    #[must_use]
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn conflict(entity: &'static str, message: impl Into<String>) -> Self {
        Self::Conflict {
            entity,
            message: message.into(),
        }
    }

    pub fn reference_violation(entity: &'static str, message: impl Into<String>) -> Self {
        Self::ReferenceViolation {
            entity,
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn auth_backend_unavailable(message: impl Into<String>) -> Self {
        Self::AuthBackendUnavailable(message.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn database(entity: &'static str, message: impl Into<String>) -> Self {
        Self::Database {
            entity,
            message: message.into(),
        }
    }

    /// Unique-constraint conflicts only; reference violations are not races.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// Convert domain errors to SDK errors for public API consumption.
impl From<DomainError> for EstateError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound { entity, id } => {
                Self::not_found(format!("{entity} with id {id} was not found"))
            }
            DomainError::Conflict { entity, message } => {
                Self::conflict(format!("{entity}: {message}"))
            }
            DomainError::ReferenceViolation { entity, message } => {
                Self::conflict(format!("{entity}: {message}"))
            }
            DomainError::Forbidden(_) => Self::forbidden(),
            DomainError::AuthBackendUnavailable(_) => Self::auth_backend_unavailable(),
            DomainError::Validation { field, message } => {
                Self::validation(format!("{field}: {message}"))
            }
            DomainError::Database { .. } => Self::internal(),
        }
    }
}
