use std::sync::Arc;

use authn_resolver_sdk::Identity;
use estate_sdk::UserProfile;
use estate_security::{Principal, Role};
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

use super::{DbProvider, require_role};
use crate::domain::error::DomainError;
use crate::domain::repos::EntityStore;
use crate::domain::repos::entities::USER_PROFILE;

/// User profiles: role and jurisdiction of an authentication identity.
pub struct ProfilesService<S: EntityStore> {
    db: Arc<DbProvider>,
    store: Arc<S>,
}

impl<S: EntityStore> ProfilesService<S> {
    pub fn new(db: Arc<DbProvider>, store: Arc<S>) -> Self {
        Self { db, store }
    }

    pub async fn get_profile(&self, id: Uuid) -> Result<UserProfile, DomainError> {
        self.store
            .get_profile(self.db.as_ref(), id)
            .await?
            .ok_or_else(|| DomainError::not_found(USER_PROFILE, id))
    }

    /// Create the minimal profile of a freshly authenticated identity: a
    /// resident with no jurisdiction. Idempotent; an existing profile is
    /// returned unchanged.
    #[instrument(skip(self, identity), fields(subject_id = %identity.subject_id))]
    pub async fn materialize_minimal_profile(
        &self,
        identity: &Identity,
    ) -> Result<UserProfile, DomainError> {
        let conn = self.db.as_ref();
        if let Some(existing) = self.store.get_profile(conn, identity.subject_id).await? {
            return Ok(existing);
        }

        let now = OffsetDateTime::now_utc();
        let profile = UserProfile {
            id: identity.subject_id,
            email: identity.email.clone(),
            role: Role::Resident,
            first_name: String::new(),
            last_name: String::new(),
            colony_id: None,
            building_id: None,
            flat_id: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        match self.store.insert_profile(conn, profile).await {
            Ok(profile) => {
                tracing::info!("Materialized minimal profile");
                Ok(profile)
            }
            Err(e) if e.is_conflict() => {
                tracing::debug!("Profile materialized concurrently");
                self.get_profile(identity.subject_id).await
            }
            Err(e) => Err(e),
        }
    }

    /// Change a profile's role. Super admins only, and never on their own
    /// profile.
    #[instrument(skip(self, principal), fields(principal = %principal.id()))]
    pub async fn update_profile_role(
        &self,
        principal: &Principal,
        id: Uuid,
        role: Role,
    ) -> Result<UserProfile, DomainError> {
        require_role(principal, Role::SuperAdmin, "change role")?;
        if principal.id() == id && role != principal.role() {
            return Err(DomainError::validation("role", "cannot change your own role"));
        }

        let mut profile = self.get_profile(id).await?;
        profile.role = role;
        profile.updated_at = OffsetDateTime::now_utc();
        let profile = self.store.update_profile(self.db.as_ref(), profile).await?;
        tracing::info!(profile_id = %id, %role, "Updated profile role");
        Ok(profile)
    }
}
