//! The authentication boundary as seen by the estate module.

use async_trait::async_trait;

use crate::error::AuthNResolverError;
use crate::models::AuthenticationResult;

/// Turns a bearer token into an [`Identity`](crate::Identity).
///
/// Implementations are handed to the session resolver as
/// `Arc<dyn AuthNResolverClient>`.
#[async_trait]
pub trait AuthNResolverClient: Send + Sync {
    /// `bearer_token` is the raw value, without the `Bearer ` scheme.
    ///
    /// # Errors
    ///
    /// `Unauthorized` for an unknown, expired or malformed token;
    /// `ServiceUnavailable` when the backend cannot be reached;
    /// `NoPluginAvailable` when no backend is configured to answer;
    /// `Internal` when the backend resolved an unusable identity.
    async fn authenticate(
        &self,
        bearer_token: &str,
    ) -> Result<AuthenticationResult, AuthNResolverError>;
}
