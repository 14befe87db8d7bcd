use std::sync::Arc;

use estate_sdk::{
    Building, Colony, ColonyHint, Flat, FlatPatch, Floor, NewBuilding, NewColony, NewFlat,
};
use estate_security::{Principal, Role};
use sea_orm::ConnectionTrait;
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

use super::{DbProvider, ServiceConfig, require_role, validate_amount};
use crate::domain::error::DomainError;
use crate::domain::repos::EntityStore;
use crate::domain::repos::entities::{BUILDING, COLONY, FLAT, FLOOR};

pub const DEFAULT_FLOOR_NUMBER: i32 = 1;
pub const DEFAULT_FLAT_TYPE: &str = "1BHK";

/// Hierarchy builder.
///
/// Resolves or creates the ancestors of an entity before the entity itself is
/// written: colony, then building, then floor, then flat. Explicit ids are
/// only ever looked up, never created. Implicit ancestors (the default colony,
/// a floor by number) are created with "insert, on conflict fetch existing",
/// so two requests racing on the same new ancestor both end up with the same
/// row.
pub struct HierarchyService<S: EntityStore> {
    db: Arc<DbProvider>,
    store: Arc<S>,
    config: ServiceConfig,
}

impl<S: EntityStore> HierarchyService<S> {
    pub fn new(db: Arc<DbProvider>, store: Arc<S>, config: ServiceConfig) -> Self {
        Self { db, store, config }
    }

    // ==================== Colony ====================

    #[instrument(skip(self, principal, new_colony), fields(name = %new_colony.name))]
    pub async fn create_colony(
        &self,
        principal: &Principal,
        new_colony: NewColony,
    ) -> Result<Colony, DomainError> {
        require_role(principal, Role::SuperAdmin, "create colony")?;
        let name = self.config.validate_name("name", &new_colony.name)?;

        let colony = Colony {
            id: Uuid::now_v7(),
            name,
            address: new_colony.address,
            city: new_colony.city,
            state: new_colony.state,
            pincode: new_colony.pincode,
            is_default: false,
            created_at: OffsetDateTime::now_utc(),
        };
        let colony = self.store.insert_colony(self.db.as_ref(), colony).await?;
        tracing::info!(colony_id = %colony.id, "Created colony");
        Ok(colony)
    }

    /// Resolve the colony a new building goes into.
    #[instrument(skip(self))]
    pub async fn ensure_colony(&self, hint: ColonyHint) -> Result<Colony, DomainError> {
        let conn = self.db.as_ref();
        match hint {
            ColonyHint::Id(id) => self
                .store
                .get_colony(conn, id)
                .await?
                .ok_or_else(|| DomainError::not_found(COLONY, id)),
            ColonyHint::Implicit => {
                if !self.config.allow_implicit_default_colony {
                    return Err(DomainError::validation(
                        "colony_id",
                        "an explicit colony is required",
                    ));
                }
                if let Some(existing) = self.store.first_colony(conn).await? {
                    tracing::debug!(colony_id = %existing.id, "Reusing existing colony");
                    return Ok(existing);
                }
                self.insert_or_fetch_default_colony().await
            }
        }
    }

    /// Create the singleton default colony, or return it if another request
    /// created it first.
    pub(crate) async fn insert_or_fetch_default_colony(&self) -> Result<Colony, DomainError> {
        let conn = self.db.as_ref();
        let colony = Colony {
            id: Uuid::now_v7(),
            name: self.config.default_colony_name.clone(),
            address: None,
            city: None,
            state: None,
            pincode: None,
            is_default: true,
            created_at: OffsetDateTime::now_utc(),
        };

        match self.store.insert_colony(conn, colony).await {
            Ok(colony) => {
                tracing::info!(colony_id = %colony.id, "Created default colony");
                Ok(colony)
            }
            Err(e) if e.is_conflict() => {
                tracing::warn!("Default colony created concurrently; reusing existing row");
                self.store
                    .find_default_colony(conn)
                    .await?
                    .ok_or_else(|| {
                        DomainError::database(COLONY, "default colony missing after unique conflict")
                    })
            }
            Err(e) => Err(e),
        }
    }

    // ==================== Building ====================

    /// Create a building ("block") under the resolved colony.
    #[instrument(skip(self, principal, new_building), fields(principal = %principal.id(), name = %new_building.name))]
    pub async fn ensure_building(
        &self,
        principal: &Principal,
        hint: ColonyHint,
        new_building: NewBuilding,
    ) -> Result<Building, DomainError> {
        require_role(principal, Role::ColonyAdmin, "create building")?;
        let name = self.config.validate_name("name", &new_building.name)?;
        let total_floors = new_building.total_floors.unwrap_or(0);
        if total_floors < 0 {
            return Err(DomainError::validation("total_floors", "must not be negative"));
        }
        let hint = scoped_colony_hint(principal, hint)?;

        let colony = self.ensure_colony(hint).await?;

        let building = Building {
            id: Uuid::now_v7(),
            colony_id: colony.id,
            name,
            total_floors,
            description: new_building.description,
            created_at: OffsetDateTime::now_utc(),
        };
        let building = self
            .store
            .insert_building(self.db.as_ref(), building)
            .await?;
        tracing::info!(building_id = %building.id, colony_id = %colony.id, "Created building");
        Ok(building)
    }

    pub async fn get_building(&self, id: Uuid) -> Result<Building, DomainError> {
        self.store
            .get_building(self.db.as_ref(), id)
            .await?
            .ok_or_else(|| DomainError::not_found(BUILDING, id))
    }

    pub async fn list_buildings(&self, colony_id: Option<Uuid>) -> Result<Vec<Building>, DomainError> {
        self.store.list_buildings(self.db.as_ref(), colony_id).await
    }

    // ==================== Floor ====================

    /// Resolve the floor `(building_id, floor_number)`, creating it if absent.
    #[instrument(skip(self, principal), fields(principal = %principal.id()))]
    pub async fn ensure_floor(
        &self,
        principal: &Principal,
        building_id: Uuid,
        floor_number: i32,
    ) -> Result<Floor, DomainError> {
        require_role(principal, Role::BlockManager, "create floor")?;
        validate_floor_number(floor_number)?;
        let building = self.get_building(building_id).await?;
        check_building_jurisdiction(principal, &building)?;
        self.ensure_floor_in(&building, floor_number).await
    }

    pub async fn list_floors(
        &self,
        principal: &Principal,
        building_id: Uuid,
    ) -> Result<Vec<Floor>, DomainError> {
        let building = self.get_building(building_id).await?;
        check_building_jurisdiction(principal, &building)?;
        self.store.list_floors(self.db.as_ref(), building.id).await
    }

    async fn ensure_floor_in(
        &self,
        building: &Building,
        floor_number: i32,
    ) -> Result<Floor, DomainError> {
        if let Some(floor) = self
            .store
            .find_floor(self.db.as_ref(), building.id, floor_number)
            .await?
        {
            tracing::debug!(floor_id = %floor.id, "Reusing existing floor");
            return Ok(floor);
        }
        self.insert_or_fetch_floor(building.id, floor_number).await
    }

    /// Insert a floor with the creation defaults; on a unique violation the
    /// row written by the concurrent winner is returned instead.
    pub(crate) async fn insert_or_fetch_floor(
        &self,
        building_id: Uuid,
        floor_number: i32,
    ) -> Result<Floor, DomainError> {
        let conn = self.db.as_ref();
        let floor = Floor {
            id: Uuid::now_v7(),
            building_id,
            floor_number,
            label: format!("Floor {floor_number}"),
            maintenance_charge: 0,
            created_at: OffsetDateTime::now_utc(),
        };

        match self.store.insert_floor(conn, floor).await {
            Ok(floor) => {
                tracing::info!(floor_id = %floor.id, %building_id, floor_number, "Created floor");
                Ok(floor)
            }
            Err(e) if e.is_conflict() => {
                tracing::warn!(%building_id, floor_number, "Floor created concurrently; reusing existing row");
                self.store
                    .find_floor(conn, building_id, floor_number)
                    .await?
                    .ok_or_else(|| {
                        DomainError::database(FLOOR, "floor missing after unique conflict")
                    })
            }
            Err(e) => Err(e),
        }
    }

    // ==================== Flat ====================

    /// Create a flat in block `block_id` on floor `floor_number` (default 1),
    /// creating the floor if needed. The block must already exist.
    #[instrument(
        skip(self, principal, new_flat),
        fields(principal = %principal.id(), flat_number = %new_flat.flat_number)
    )]
    pub async fn ensure_flat(
        &self,
        principal: &Principal,
        block_id: Uuid,
        floor_number: Option<i32>,
        new_flat: NewFlat,
    ) -> Result<Flat, DomainError> {
        require_role(principal, Role::BlockManager, "create flat")?;
        let floor_number = floor_number.unwrap_or(DEFAULT_FLOOR_NUMBER);
        validate_floor_number(floor_number)?;
        let flat_number = self
            .config
            .validate_name("flat_number", &new_flat.flat_number)?;
        let flat_type = new_flat
            .flat_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_FLAT_TYPE)
            .to_owned();
        let rent_amount = validate_amount("rent_amount", new_flat.rent_amount.unwrap_or(0))?;
        let deposit_amount =
            validate_amount("deposit_amount", new_flat.deposit_amount.unwrap_or(0))?;

        let building = self.get_building(block_id).await?;
        check_building_jurisdiction(principal, &building)?;
        let floor = self.ensure_floor_in(&building, floor_number).await?;

        let flat = Flat {
            id: Uuid::now_v7(),
            floor_id: floor.id,
            flat_number,
            flat_type,
            status: new_flat.status.unwrap_or_default(),
            rent_amount,
            deposit_amount,
            created_at: OffsetDateTime::now_utc(),
        };
        let flat_number = flat.flat_number.clone();
        let flat = self
            .store
            .insert_flat(self.db.as_ref(), flat)
            .await
            .map_err(|e| {
                if e.is_conflict() {
                    DomainError::conflict(
                        FLAT,
                        format!("flat '{flat_number}' already exists on floor {floor_number}"),
                    )
                } else {
                    e
                }
            })?;
        tracing::info!(flat_id = %flat.id, floor_id = %floor.id, "Created flat");
        Ok(flat)
    }

    pub async fn get_flat(&self, id: Uuid) -> Result<Flat, DomainError> {
        self.store
            .get_flat(self.db.as_ref(), id)
            .await?
            .ok_or_else(|| DomainError::not_found(FLAT, id))
    }

    pub async fn list_flats(
        &self,
        principal: &Principal,
        floor_id: Uuid,
    ) -> Result<Vec<Flat>, DomainError> {
        let conn = self.db.as_ref();
        let floor = self
            .store
            .get_floor(conn, floor_id)
            .await?
            .ok_or_else(|| DomainError::not_found(FLOOR, floor_id))?;
        let building = building_of_floor(self.store.as_ref(), conn, floor.id).await?;
        check_building_jurisdiction(principal, &building)?;
        self.store.list_flats(conn, floor.id).await
    }

    #[instrument(skip(self, principal, patch), fields(principal = %principal.id()))]
    pub async fn update_flat(
        &self,
        principal: &Principal,
        id: Uuid,
        patch: FlatPatch,
    ) -> Result<Flat, DomainError> {
        require_role(principal, Role::BlockManager, "update flat")?;
        let mut flat = self.get_flat(id).await?;
        let building = self.building_of_flat(&flat).await?;
        check_building_jurisdiction(principal, &building)?;

        if let Some(flat_type) = patch.flat_type {
            flat.flat_type = self.config.validate_name("flat_type", &flat_type)?;
        }
        if let Some(status) = patch.status {
            flat.status = status;
        }
        if let Some(rent) = patch.rent_amount {
            flat.rent_amount = validate_amount("rent_amount", rent)?;
        }
        if let Some(deposit) = patch.deposit_amount {
            flat.deposit_amount = validate_amount("deposit_amount", deposit)?;
        }

        let flat = self.store.update_flat(self.db.as_ref(), flat).await?;
        tracing::info!(flat_id = %flat.id, "Updated flat");
        Ok(flat)
    }

    /// Delete a flat nothing refers to. Referenced flats are rejected with
    /// `Conflict`; nothing is cascaded.
    #[instrument(skip(self, principal), fields(principal = %principal.id()))]
    pub async fn delete_flat(&self, principal: &Principal, id: Uuid) -> Result<(), DomainError> {
        require_role(principal, Role::BlockManager, "delete flat")?;
        let conn = self.db.as_ref();
        let flat = self.get_flat(id).await?;
        let building = self.building_of_flat(&flat).await?;
        check_building_jurisdiction(principal, &building)?;

        let members = self.store.count_members_in_flat(conn, id).await?;
        let entries = self.store.count_fee_entries_for_flat(conn, id).await?;
        if members > 0 || entries > 0 {
            tracing::warn!(flat_id = %id, members, entries, "Refusing to delete referenced flat");
            return Err(DomainError::conflict(
                FLAT,
                format!(
                    "flat '{}' is referenced by {members} member(s) and {entries} fee entr(ies)",
                    flat.flat_number
                ),
            ));
        }

        if !self.store.delete_flat(conn, id).await? {
            return Err(DomainError::not_found(FLAT, id));
        }
        tracing::info!(flat_id = %id, "Deleted flat");
        Ok(())
    }

    pub(crate) async fn building_of_flat(&self, flat: &Flat) -> Result<Building, DomainError> {
        building_of_floor(self.store.as_ref(), self.db.as_ref(), flat.floor_id).await
    }
}

/// Typed join floor → building.
pub(crate) async fn building_of_floor<S: EntityStore, C: ConnectionTrait>(
    store: &S,
    conn: &C,
    floor_id: Uuid,
) -> Result<Building, DomainError> {
    let floor = store
        .get_floor(conn, floor_id)
        .await?
        .ok_or_else(|| DomainError::not_found(FLOOR, floor_id))?;
    store
        .get_building(conn, floor.building_id)
        .await?
        .ok_or_else(|| DomainError::not_found(BUILDING, floor.building_id))
}

fn validate_floor_number(floor_number: i32) -> Result<(), DomainError> {
    if floor_number < 0 {
        return Err(DomainError::validation("floor_number", "must not be negative"));
    }
    Ok(())
}

/// Narrow a colony hint to the principal's colony jurisdiction.
///
/// A colony-scoped principal implicitly targets its own colony and may not
/// name another one. Super admins are never narrowed.
fn scoped_colony_hint(principal: &Principal, hint: ColonyHint) -> Result<ColonyHint, DomainError> {
    if principal.role() == Role::SuperAdmin {
        return Ok(hint);
    }
    match (hint, principal.profile().colony_id) {
        (ColonyHint::Implicit, Some(scope)) => Ok(ColonyHint::Id(scope)),
        (ColonyHint::Id(id), Some(scope)) if id != scope => Err(DomainError::forbidden(format!(
            "colony {id} is outside the principal's jurisdiction"
        ))),
        (hint, _) => Ok(hint),
    }
}

/// Check a building against the principal's colony/building jurisdiction.
pub(crate) fn check_building_jurisdiction(
    principal: &Principal,
    building: &Building,
) -> Result<(), DomainError> {
    if principal.role() == Role::SuperAdmin {
        return Ok(());
    }
    let profile = principal.profile();
    let colony_ok = profile.colony_id.is_none_or(|c| c == building.colony_id);
    let building_ok = profile.building_id.is_none_or(|b| b == building.id);
    if colony_ok && building_ok {
        Ok(())
    } else {
        tracing::warn!(principal = %principal.id(), building_id = %building.id, "Building outside jurisdiction");
        Err(DomainError::forbidden(format!(
            "building {} is outside the principal's jurisdiction",
            building.id
        )))
    }
}

/// Members without a flat sit outside every building, so only principals
/// without a colony or building scope may act on them.
pub(crate) fn check_unplaced_member_scope(principal: &Principal) -> Result<(), DomainError> {
    if principal.role() == Role::SuperAdmin {
        return Ok(());
    }
    let profile = principal.profile();
    if profile.colony_id.is_none() && profile.building_id.is_none() {
        return Ok(());
    }
    tracing::warn!(principal = %principal.id(), "Scoped principal touched a member without a flat");
    Err(DomainError::forbidden(
        "members without a flat are outside the principal's jurisdiction",
    ))
}
