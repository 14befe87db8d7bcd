//! Token table behind the static backend.

use std::collections::HashMap;

use crate::config::{AuthNMode, IdentityConfig, StaticAuthNPluginConfig};
use authn_resolver_sdk::{AuthNResolverError, AuthenticationResult, Identity};
use uuid::Uuid;

/// How a bearer token is turned into an identity.
enum TokenTable {
    /// Every non-empty token is the same identity.
    AcceptAll(Identity),
    /// Only listed tokens are known.
    Mapped(HashMap<String, Identity>),
}

/// Static authentication backend.
pub struct Service {
    table: TokenTable,
    unavailable: bool,
}

impl From<&IdentityConfig> for Identity {
    fn from(cfg: &IdentityConfig) -> Self {
        Self {
            subject_id: cfg.subject_id,
            email: cfg.email.clone(),
        }
    }
}

impl Service {
    #[must_use]
    pub fn from_config(cfg: &StaticAuthNPluginConfig) -> Self {
        let table = match cfg.mode {
            AuthNMode::AcceptAll => TokenTable::AcceptAll(Identity::from(&cfg.default_identity)),
            AuthNMode::StaticTokens => TokenTable::Mapped(
                cfg.tokens
                    .iter()
                    .map(|m| (m.token.clone(), Identity::from(&m.identity)))
                    .collect(),
            ),
        };
        tracing::debug!(
            mode = ?cfg.mode,
            tokens = cfg.tokens.len(),
            unavailable = cfg.unavailable,
            "Static authn backend configured"
        );
        Self {
            table,
            unavailable: cfg.unavailable,
        }
    }

    /// Look the token up.
    ///
    /// # Errors
    ///
    /// - `ServiceUnavailable` when configured as unavailable
    /// - `NoPluginAvailable` in `static_tokens` mode with no tokens configured
    /// - `Internal` when the resolved identity has a nil subject id
    /// - `Unauthorized` for an empty or unknown token
    pub fn authenticate(
        &self,
        bearer_token: &str,
    ) -> Result<AuthenticationResult, AuthNResolverError> {
        if self.unavailable {
            tracing::warn!("static authn backend configured as unavailable");
            return Err(AuthNResolverError::ServiceUnavailable(
                "static backend disabled".to_owned(),
            ));
        }
        if let TokenTable::Mapped(map) = &self.table
            && map.is_empty()
        {
            return Err(AuthNResolverError::NoPluginAvailable);
        }
        if bearer_token.is_empty() {
            return Err(AuthNResolverError::Unauthorized("empty token".to_owned()));
        }
        let identity = match &self.table {
            TokenTable::AcceptAll(identity) => Some(identity),
            TokenTable::Mapped(map) => map.get(bearer_token),
        }
        .ok_or_else(|| AuthNResolverError::Unauthorized("invalid token".to_owned()))?;

        if identity.subject_id == Uuid::nil() {
            tracing::error!("static authn identity has a nil subject id");
            return Err(AuthNResolverError::Internal(
                "identity has no subject id".to_owned(),
            ));
        }
        Ok(AuthenticationResult {
            identity: identity.clone(),
        })
    }
}
