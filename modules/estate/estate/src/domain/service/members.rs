use std::sync::Arc;

use estate_sdk::{Member, MemberPatch, NewMember};
use estate_security::{Principal, Role};
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

use super::hierarchy::{
    building_of_floor, check_building_jurisdiction, check_unplaced_member_scope,
};
use super::{DbProvider, ServiceConfig, require_role};
use crate::domain::error::DomainError;
use crate::domain::repos::EntityStore;
use crate::domain::repos::entities::{FLAT, MEMBER, USER_PROFILE};

/// Members of flats, optionally linked to a login identity.
pub struct MembersService<S: EntityStore> {
    db: Arc<DbProvider>,
    store: Arc<S>,
    config: ServiceConfig,
}

impl<S: EntityStore> MembersService<S> {
    pub fn new(db: Arc<DbProvider>, store: Arc<S>, config: ServiceConfig) -> Self {
        Self { db, store, config }
    }

    #[instrument(skip(self, principal, new_member), fields(principal = %principal.id()))]
    pub async fn create_member(
        &self,
        principal: &Principal,
        new_member: NewMember,
    ) -> Result<Member, DomainError> {
        require_role(principal, Role::BlockManager, "create member")?;
        let name = self.config.validate_name("name", &new_member.name)?;
        self.check_placement(principal, new_member.flat_id).await?;
        if let Some(user_id) = new_member.user_id {
            self.check_linked_profile(user_id).await?;
        }

        let member = Member {
            id: Uuid::now_v7(),
            name,
            phone: non_blank(new_member.phone),
            email: non_blank(new_member.email),
            flat_id: new_member.flat_id,
            user_id: new_member.user_id,
            created_at: OffsetDateTime::now_utc(),
        };
        let member = self
            .store
            .insert_member(self.db.as_ref(), member)
            .await
            .map_err(linked_user_conflict)?;
        tracing::info!(member_id = %member.id, "Created member");
        Ok(member)
    }

    /// Fetch a member. Residents may only see the member linked to
    /// themselves.
    #[instrument(skip(self, principal), fields(principal = %principal.id()))]
    pub async fn get_member(&self, principal: &Principal, id: Uuid) -> Result<Member, DomainError> {
        let member = self.load(id).await?;
        check_member_visibility(principal, &member)?;
        Ok(member)
    }

    #[instrument(skip(self, principal, patch), fields(principal = %principal.id()))]
    pub async fn update_member(
        &self,
        principal: &Principal,
        id: Uuid,
        patch: MemberPatch,
    ) -> Result<Member, DomainError> {
        require_role(principal, Role::BlockManager, "update member")?;
        let mut member = self.load(id).await?;
        self.check_placement(principal, member.flat_id).await?;

        if let Some(name) = patch.name {
            member.name = self.config.validate_name("name", &name)?;
        }
        if patch.phone.is_some() {
            member.phone = non_blank(patch.phone);
        }
        if patch.email.is_some() {
            member.email = non_blank(patch.email);
        }
        if let Some(flat_id) = patch.flat_id {
            self.check_flat(principal, flat_id).await?;
            member.flat_id = Some(flat_id);
        }

        let member = self
            .store
            .update_member(self.db.as_ref(), member)
            .await?;
        tracing::info!(member_id = %member.id, "Updated member");
        Ok(member)
    }

    /// Delete a member without fee entries. Fee history is never dropped
    /// implicitly.
    #[instrument(skip(self, principal), fields(principal = %principal.id()))]
    pub async fn delete_member(&self, principal: &Principal, id: Uuid) -> Result<(), DomainError> {
        require_role(principal, Role::BlockManager, "delete member")?;
        let conn = self.db.as_ref();
        let member = self.load(id).await?;
        self.check_placement(principal, member.flat_id).await?;

        let entries = self.store.count_fee_entries_for_member(conn, id).await?;
        if entries > 0 {
            tracing::warn!(member_id = %id, entries, "Refusing to delete member with fee entries");
            return Err(DomainError::conflict(
                MEMBER,
                format!("member has {entries} fee entr(ies)"),
            ));
        }
        if !self.store.delete_member(conn, id).await? {
            return Err(DomainError::not_found(MEMBER, id));
        }
        tracing::info!(member_id = %id, "Deleted member");
        Ok(())
    }

    async fn load(&self, id: Uuid) -> Result<Member, DomainError> {
        self.store
            .get_member(self.db.as_ref(), id)
            .await?
            .ok_or_else(|| DomainError::not_found(MEMBER, id))
    }

    /// Jurisdiction over a member placed in `flat_id`, or over an unplaced one.
    async fn check_placement(
        &self,
        principal: &Principal,
        flat_id: Option<Uuid>,
    ) -> Result<(), DomainError> {
        match flat_id {
            Some(flat_id) => self.check_flat(principal, flat_id).await,
            None => check_unplaced_member_scope(principal),
        }
    }

    async fn check_linked_profile(&self, user_id: Uuid) -> Result<(), DomainError> {
        self.store
            .get_profile(self.db.as_ref(), user_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found(USER_PROFILE, user_id))
    }

    async fn check_flat(&self, principal: &Principal, flat_id: Uuid) -> Result<(), DomainError> {
        let conn = self.db.as_ref();
        let flat = self
            .store
            .get_flat(conn, flat_id)
            .await?
            .ok_or_else(|| DomainError::not_found(FLAT, flat_id))?;
        let building = building_of_floor(self.store.as_ref(), conn, flat.floor_id).await?;
        check_building_jurisdiction(principal, &building)
    }
}

/// Residents only see the member whose `user_id` is their own identity.
pub(crate) fn check_member_visibility(
    principal: &Principal,
    member: &Member,
) -> Result<(), DomainError> {
    if principal.has_role_at_least(Role::BlockManager) || member.user_id == Some(principal.id()) {
        return Ok(());
    }
    tracing::warn!(principal = %principal.id(), member_id = %member.id, "Resident requested another member");
    Err(DomainError::forbidden("member belongs to another resident"))
}

fn linked_user_conflict(e: DomainError) -> DomainError {
    if e.is_conflict() {
        DomainError::conflict(MEMBER, "user is already linked to another member")
    } else {
        e
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
