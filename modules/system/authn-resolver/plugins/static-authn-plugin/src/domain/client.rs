//! Client implementation for the static `AuthN` resolver plugin.
//!
//! Implements `AuthNResolverClient` using the domain service.

use async_trait::async_trait;
use authn_resolver_sdk::{AuthNResolverClient, AuthNResolverError, AuthenticationResult};

use super::service::Service;

#[async_trait]
impl AuthNResolverClient for Service {
    async fn authenticate(
        &self,
        bearer_token: &str,
    ) -> Result<AuthenticationResult, AuthNResolverError> {
        Service::authenticate(self, bearer_token)
    }
}
