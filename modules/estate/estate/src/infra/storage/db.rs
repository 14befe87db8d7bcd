use sea_orm::{DbErr, SqlErr};
use time::{OffsetDateTime, UtcOffset};

use crate::domain::error::DomainError;

/// Map a store error on `entity` to a domain error.
///
/// Unique violations become `Conflict` (a duplicate or a lost race) and
/// foreign-key violations become `ReferenceViolation`; anything else is a
/// failing backend.
pub fn db_err(entity: &'static str) -> impl Fn(DbErr) -> DomainError {
    move |e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => {
            tracing::debug!(entity, "Unique constraint violation: {msg}");
            DomainError::conflict(entity, "already exists")
        }
        Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
            tracing::debug!(entity, "Foreign key violation: {msg}");
            DomainError::reference_violation(
                entity,
                "referenced by or referring to another record",
            )
        }
        _ => {
            tracing::error!(entity, error = %e, "Database operation failed");
            DomainError::database(entity, e.to_string())
        }
    }
}

/// Timestamps are stored in UTC so range filters compare consistently.
pub fn utc(at: OffsetDateTime) -> OffsetDateTime {
    at.to_offset(UtcOffset::UTC)
}
