use std::sync::Arc;

use estate_sdk::{FeeEntry, FeePeriod, FeeType, FeeTypePatch, Member, NewFeeEntry, NewFeeType};
use estate_security::{Principal, Role};
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

use super::hierarchy::{
    building_of_floor, check_building_jurisdiction, check_unplaced_member_scope,
};
use super::members::check_member_visibility;
use super::{DbProvider, ServiceConfig, require_role, validate_amount};
use crate::domain::error::DomainError;
use crate::domain::repos::EntityStore;
use crate::domain::repos::entities::{FEE_TYPE, FLAT, MEMBER};

/// Fee types, fee entries and per-member totals.
///
/// A fee entry's `total_fee` is computed once when it is recorded. Totals are
/// sums of those stored values; current fee type amounts never feed back into
/// history.
pub struct FeesService<S: EntityStore> {
    db: Arc<DbProvider>,
    store: Arc<S>,
    config: ServiceConfig,
}

impl<S: EntityStore> FeesService<S> {
    pub fn new(db: Arc<DbProvider>, store: Arc<S>, config: ServiceConfig) -> Self {
        Self { db, store, config }
    }

    // ==================== Fee types ====================

    #[instrument(skip(self, principal, new_fee_type), fields(principal = %principal.id(), name = %new_fee_type.name))]
    pub async fn create_fee_type(
        &self,
        principal: &Principal,
        new_fee_type: NewFeeType,
    ) -> Result<FeeType, DomainError> {
        require_role(principal, Role::ColonyAdmin, "create fee type")?;
        let name = self.config.validate_name("name", &new_fee_type.name)?;
        let amount = validate_amount("amount", new_fee_type.amount)?;

        let fee_type = FeeType {
            id: Uuid::now_v7(),
            name,
            description: new_fee_type.description,
            amount,
            is_active: new_fee_type.is_active.unwrap_or(true),
            created_at: OffsetDateTime::now_utc(),
        };
        let name = fee_type.name.clone();
        let fee_type = self
            .store
            .insert_fee_type(self.db.as_ref(), fee_type)
            .await
            .map_err(|e| {
                if e.is_conflict() {
                    DomainError::conflict(FEE_TYPE, format!("fee type '{name}' already exists"))
                } else {
                    e
                }
            })?;
        tracing::info!(fee_type_id = %fee_type.id, "Created fee type");
        Ok(fee_type)
    }

    /// Change a fee type. Existing fee entries keep their stored totals.
    #[instrument(skip(self, principal, patch), fields(principal = %principal.id()))]
    pub async fn update_fee_type(
        &self,
        principal: &Principal,
        id: Uuid,
        patch: FeeTypePatch,
    ) -> Result<FeeType, DomainError> {
        require_role(principal, Role::ColonyAdmin, "update fee type")?;
        let mut fee_type = self.load_fee_type(id).await?;

        if let Some(amount) = patch.amount {
            fee_type.amount = validate_amount("amount", amount)?;
        }
        if patch.description.is_some() {
            fee_type.description = patch.description;
        }
        if let Some(is_active) = patch.is_active {
            fee_type.is_active = is_active;
        }

        let fee_type = self
            .store
            .update_fee_type(self.db.as_ref(), fee_type)
            .await?;
        tracing::info!(fee_type_id = %id, amount = fee_type.amount, "Updated fee type");
        Ok(fee_type)
    }

    pub async fn list_fee_types(&self, active_only: bool) -> Result<Vec<FeeType>, DomainError> {
        self.store.list_fee_types(self.db.as_ref(), active_only).await
    }

    // ==================== Fee entries ====================

    /// Record a fee for a member over the given months.
    ///
    /// Block and flat are copied from the member's flat. When `fee` is
    /// omitted the fee type's current amount is used.
    #[instrument(skip(self, principal, new_entry), fields(principal = %principal.id(), member_id = %new_entry.member_id))]
    pub async fn record_fee_entry(
        &self,
        principal: &Principal,
        new_entry: NewFeeEntry,
    ) -> Result<FeeEntry, DomainError> {
        require_role(principal, Role::BlockManager, "record fee entry")?;
        let months = validate_months(new_entry.months)?;
        let payment_type = self
            .config
            .validate_name("payment_type", &new_entry.payment_type)?;

        let conn = self.db.as_ref();
        let member = self.load_member(new_entry.member_id).await?;

        let fee_type = match new_entry.fee_type_id {
            Some(id) => Some(self.load_fee_type(id).await?),
            None => None,
        };
        let fee = match (new_entry.fee, &fee_type) {
            (Some(fee), _) => validate_amount("fee", fee)?,
            (None, Some(fee_type)) => fee_type.amount,
            (None, None) => {
                return Err(DomainError::validation(
                    "fee",
                    "required when no fee type is given",
                ));
            }
        };
        let month_count = i64::try_from(months.len())
            .map_err(|_| DomainError::validation("months", "too many months"))?;
        let total_fee = fee
            .checked_mul(month_count)
            .ok_or_else(|| DomainError::validation("fee", "total fee overflows"))?;

        let (building_id, flat_id, flat_number) = match member.flat_id {
            Some(flat_id) => {
                let flat = self
                    .store
                    .get_flat(conn, flat_id)
                    .await?
                    .ok_or_else(|| DomainError::not_found(FLAT, flat_id))?;
                let building = building_of_floor(self.store.as_ref(), conn, flat.floor_id).await?;
                check_building_jurisdiction(principal, &building)?;
                (Some(building.id), Some(flat.id), Some(flat.flat_number))
            }
            None => {
                check_unplaced_member_scope(principal)?;
                (None, None, None)
            }
        };

        let entry = FeeEntry {
            id: Uuid::now_v7(),
            member_id: member.id,
            fee_type_id: fee_type.map(|t| t.id),
            building_id,
            flat_id,
            flat_number,
            months,
            fee,
            total_fee,
            payment_type,
            remarks: new_entry.remarks,
            created_at: OffsetDateTime::now_utc(),
        };
        let entry = self.store.insert_fee_entry(conn, entry).await?;
        tracing::info!(fee_entry_id = %entry.id, total_fee, "Recorded fee entry");
        Ok(entry)
    }

    #[instrument(skip(self, principal), fields(principal = %principal.id()))]
    pub async fn list_member_entries(
        &self,
        principal: &Principal,
        member_id: Uuid,
    ) -> Result<Vec<FeeEntry>, DomainError> {
        let member = self.load_member(member_id).await?;
        check_member_visibility(principal, &member)?;
        self.store
            .list_member_fee_entries(self.db.as_ref(), member.id, FeePeriod::all())
            .await
    }

    /// Sum of the stored `total_fee` of a member's entries created within
    /// `period`.
    #[instrument(skip(self, principal), fields(principal = %principal.id()))]
    pub async fn compute_member_total(
        &self,
        principal: &Principal,
        member_id: Uuid,
        period: FeePeriod,
    ) -> Result<i64, DomainError> {
        let member = self.load_member(member_id).await?;
        check_member_visibility(principal, &member)?;

        let entries = self
            .store
            .list_member_fee_entries(self.db.as_ref(), member.id, period)
            .await?;
        let total = entries
            .iter()
            .try_fold(0_i64, |acc, entry| acc.checked_add(entry.total_fee))
            .ok_or_else(|| DomainError::validation("total_fee", "member total overflows"))?;
        tracing::debug!(entries = entries.len(), total, "Computed member total");
        Ok(total)
    }

    async fn load_member(&self, id: Uuid) -> Result<Member, DomainError> {
        self.store
            .get_member(self.db.as_ref(), id)
            .await?
            .ok_or_else(|| DomainError::not_found(MEMBER, id))
    }

    async fn load_fee_type(&self, id: Uuid) -> Result<FeeType, DomainError> {
        self.store
            .get_fee_type(self.db.as_ref(), id)
            .await?
            .ok_or_else(|| DomainError::not_found(FEE_TYPE, id))
    }
}

fn validate_months(months: Vec<String>) -> Result<Vec<String>, DomainError> {
    if months.is_empty() {
        return Err(DomainError::validation("months", "at least one month is required"));
    }
    months
        .into_iter()
        .map(|m| {
            let m = m.trim();
            if m.is_empty() {
                Err(DomainError::validation("months", "month labels must not be empty"))
            } else {
                Ok(m.to_owned())
            }
        })
        .collect()
}
