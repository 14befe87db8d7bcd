//! Session resolution: bearer token → principal.

use std::sync::Arc;

use authn_resolver_sdk::{AuthNResolverClient, AuthNResolverError, Identity};
use estate_sdk::UserProfile;
use estate_security::{Principal, Role};
use tracing::instrument;

use super::error::DomainError;
use super::repos::EntityStore;
use super::service::DbProvider;

/// What a token resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// No token, or a token the backend rejected.
    Anonymous,
    Authenticated(Principal),
    /// The identity is valid but has no profile row yet. The caller decides
    /// whether to materialize one; the resolver never writes.
    ProfileMissing(Identity),
}

/// Session state machine.
///
/// `Anonymous --begin--> Authenticating --complete--> Anonymous | Authenticated`.
/// `Authenticating` is the only latency state; protected pages render a
/// neutral loading state while in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticating,
    Authenticated(Principal),
}

impl SessionState {
    #[must_use]
    pub fn begin() -> Self {
        Self::Authenticating
    }

    /// Transition driven by a resolver outcome. A missing profile keeps the
    /// session in `Authenticating` until the profile has been materialized
    /// and the token resolved again.
    #[must_use]
    pub fn complete(outcome: SessionOutcome) -> Self {
        match outcome {
            SessionOutcome::Anonymous => Self::Anonymous,
            SessionOutcome::Authenticated(principal) => Self::Authenticated(principal),
            SessionOutcome::ProfileMissing(_) => Self::Authenticating,
        }
    }

    #[must_use]
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Self::Authenticated(principal) => Some(principal),
            Self::Anonymous | Self::Authenticating => None,
        }
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.principal().map(Principal::role)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

/// Build the request principal from a profile row.
#[must_use]
pub fn principal_for(profile: &UserProfile, email: &str) -> Principal {
    Principal::builder()
        .id(profile.id)
        .email(email)
        .role(profile.role)
        .names(profile.first_name.clone(), profile.last_name.clone())
        .colony_id(profile.colony_id)
        .building_id(profile.building_id)
        .flat_id(profile.flat_id)
        .build()
}

/// Resolves bearer tokens through the authentication boundary and the
/// profile table.
pub struct SessionResolver<S: EntityStore> {
    db: Arc<DbProvider>,
    store: Arc<S>,
    authn: Arc<dyn AuthNResolverClient>,
}

impl<S: EntityStore> SessionResolver<S> {
    pub fn new(db: Arc<DbProvider>, store: Arc<S>, authn: Arc<dyn AuthNResolverClient>) -> Self {
        Self { db, store, authn }
    }

    /// Resolve an optional bearer token.
    ///
    /// Invalid or expired tokens are `Anonymous`, not errors. Only an
    /// unreachable backend (authentication or profile lookup) fails, with
    /// `AuthBackendUnavailable`.
    #[instrument(skip_all, fields(has_token = token.is_some()))]
    pub async fn resolve_session(
        &self,
        token: Option<&str>,
    ) -> Result<SessionOutcome, DomainError> {
        let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) else {
            return Ok(SessionOutcome::Anonymous);
        };

        let identity = match self.authn.authenticate(token).await {
            Ok(result) => result.identity,
            Err(AuthNResolverError::Unauthorized(msg)) => {
                tracing::debug!("AuthN rejected token: {msg}");
                return Ok(SessionOutcome::Anonymous);
            }
            Err(e) => {
                tracing::error!(error = %e, "AuthN backend failed");
                return Err(DomainError::auth_backend_unavailable(e.to_string()));
            }
        };

        let profile = self
            .store
            .get_profile(self.db.as_ref(), identity.subject_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Profile lookup failed during session resolution");
                DomainError::auth_backend_unavailable(e.to_string())
            })?;

        match profile {
            None => {
                tracing::info!(subject_id = %identity.subject_id, "Authenticated identity has no profile");
                Ok(SessionOutcome::ProfileMissing(identity))
            }
            Some(profile) if !profile.is_active => {
                tracing::info!(subject_id = %profile.id, "Profile is inactive; treating as anonymous");
                Ok(SessionOutcome::Anonymous)
            }
            Some(profile) => Ok(SessionOutcome::Authenticated(principal_for(
                &profile,
                &identity.email,
            ))),
        }
    }
}
