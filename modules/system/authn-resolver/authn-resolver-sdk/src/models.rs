//! Domain models for the `AuthN` resolver.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authenticated identity as asserted by the authentication backend.
///
/// Carries no role or jurisdiction: those live in the `UserProfile` row keyed
/// by `subject_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Authentication identity id.
    pub subject_id: Uuid,
    /// Email registered with the identity.
    pub email: String,
}

/// Result of a successful authentication.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    /// The validated identity behind the token.
    pub identity: Identity,
}
