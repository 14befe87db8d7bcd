use async_trait::async_trait;
use estate_sdk::{Building, Colony, Flat, Floor};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use super::OrmEntityStore;
use super::db::{db_err, utc};
use super::entity::building::{
    ActiveModel as BuildingAM, Column as BuildingColumn, Entity as BuildingEntity,
};
use super::entity::colony::{
    self, ActiveModel as ColonyAM, Column as ColonyColumn, Entity as ColonyEntity,
};
use super::entity::flat::{ActiveModel as FlatAM, Column as FlatColumn, Entity as FlatEntity};
use super::entity::floor::{ActiveModel as FloorAM, Column as FloorColumn, Entity as FloorEntity};
use crate::domain::error::DomainError;
use crate::domain::repos::entities::{BUILDING, COLONY, FLAT, FLOOR};
use crate::domain::repos::{
    BuildingsRepository, ColoniesRepository, FlatsRepository, FloorsRepository,
};

#[async_trait]
impl ColoniesRepository for OrmEntityStore {
    async fn get_colony<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<Colony>, DomainError> {
        let found = ColonyEntity::find_by_id(id)
            .one(conn)
            .await
            .map_err(db_err(COLONY))?;
        Ok(found.map(Into::into))
    }

    async fn first_colony<C: ConnectionTrait>(
        &self,
        conn: &C,
    ) -> Result<Option<Colony>, DomainError> {
        let found = ColonyEntity::find()
            .order_by_asc(ColonyColumn::CreatedAt)
            .order_by_asc(ColonyColumn::Id)
            .one(conn)
            .await
            .map_err(db_err(COLONY))?;
        Ok(found.map(Into::into))
    }

    async fn find_default_colony<C: ConnectionTrait>(
        &self,
        conn: &C,
    ) -> Result<Option<Colony>, DomainError> {
        let found = ColonyEntity::find()
            .filter(ColonyColumn::DefaultKey.eq(colony::DEFAULT_KEY))
            .one(conn)
            .await
            .map_err(db_err(COLONY))?;
        Ok(found.map(Into::into))
    }

    async fn insert_colony<C: ConnectionTrait>(
        &self,
        conn: &C,
        colony: Colony,
    ) -> Result<Colony, DomainError> {
        let m = ColonyAM {
            id: Set(colony.id),
            name: Set(colony.name.clone()),
            address: Set(colony.address.clone()),
            city: Set(colony.city.clone()),
            state: Set(colony.state.clone()),
            pincode: Set(colony.pincode.clone()),
            default_key: Set(colony.is_default.then(|| colony::DEFAULT_KEY.to_owned())),
            created_at: Set(utc(colony.created_at)),
        };

        ColonyEntity::insert(m)
            .exec_without_returning(conn)
            .await
            .map_err(db_err(COLONY))?;
        Ok(colony)
    }
}

#[async_trait]
impl BuildingsRepository for OrmEntityStore {
    async fn get_building<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<Building>, DomainError> {
        let found = BuildingEntity::find_by_id(id)
            .one(conn)
            .await
            .map_err(db_err(BUILDING))?;
        Ok(found.map(Into::into))
    }

    async fn list_buildings<C: ConnectionTrait>(
        &self,
        conn: &C,
        colony_id: Option<Uuid>,
    ) -> Result<Vec<Building>, DomainError> {
        let mut query = BuildingEntity::find();
        if let Some(colony_id) = colony_id {
            query = query.filter(BuildingColumn::ColonyId.eq(colony_id));
        }
        let rows = query
            .order_by_asc(BuildingColumn::CreatedAt)
            .order_by_asc(BuildingColumn::Id)
            .all(conn)
            .await
            .map_err(db_err(BUILDING))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert_building<C: ConnectionTrait>(
        &self,
        conn: &C,
        building: Building,
    ) -> Result<Building, DomainError> {
        let m = BuildingAM {
            id: Set(building.id),
            colony_id: Set(building.colony_id),
            name: Set(building.name.clone()),
            total_floors: Set(building.total_floors),
            description: Set(building.description.clone()),
            created_at: Set(utc(building.created_at)),
        };

        BuildingEntity::insert(m)
            .exec_without_returning(conn)
            .await
            .map_err(db_err(BUILDING))?;
        Ok(building)
    }
}

#[async_trait]
impl FloorsRepository for OrmEntityStore {
    async fn get_floor<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<Floor>, DomainError> {
        let found = FloorEntity::find_by_id(id)
            .one(conn)
            .await
            .map_err(db_err(FLOOR))?;
        Ok(found.map(Into::into))
    }

    async fn find_floor<C: ConnectionTrait>(
        &self,
        conn: &C,
        building_id: Uuid,
        floor_number: i32,
    ) -> Result<Option<Floor>, DomainError> {
        let found = FloorEntity::find()
            .filter(FloorColumn::BuildingId.eq(building_id))
            .filter(FloorColumn::FloorNumber.eq(floor_number))
            .one(conn)
            .await
            .map_err(db_err(FLOOR))?;
        Ok(found.map(Into::into))
    }

    async fn list_floors<C: ConnectionTrait>(
        &self,
        conn: &C,
        building_id: Uuid,
    ) -> Result<Vec<Floor>, DomainError> {
        let rows = FloorEntity::find()
            .filter(FloorColumn::BuildingId.eq(building_id))
            .order_by_asc(FloorColumn::FloorNumber)
            .all(conn)
            .await
            .map_err(db_err(FLOOR))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert_floor<C: ConnectionTrait>(
        &self,
        conn: &C,
        floor: Floor,
    ) -> Result<Floor, DomainError> {
        let m = FloorAM {
            id: Set(floor.id),
            building_id: Set(floor.building_id),
            floor_number: Set(floor.floor_number),
            label: Set(floor.label.clone()),
            maintenance_charge: Set(floor.maintenance_charge),
            created_at: Set(utc(floor.created_at)),
        };

        FloorEntity::insert(m)
            .exec_without_returning(conn)
            .await
            .map_err(db_err(FLOOR))?;
        Ok(floor)
    }
}

#[async_trait]
impl FlatsRepository for OrmEntityStore {
    async fn get_flat<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<Flat>, DomainError> {
        FlatEntity::find_by_id(id)
            .one(conn)
            .await
            .map_err(db_err(FLAT))?
            .map(Flat::try_from)
            .transpose()
    }

    async fn list_flats<C: ConnectionTrait>(
        &self,
        conn: &C,
        floor_id: Uuid,
    ) -> Result<Vec<Flat>, DomainError> {
        FlatEntity::find()
            .filter(FlatColumn::FloorId.eq(floor_id))
            .order_by_asc(FlatColumn::FlatNumber)
            .all(conn)
            .await
            .map_err(db_err(FLAT))?
            .into_iter()
            .map(Flat::try_from)
            .collect()
    }

    async fn insert_flat<C: ConnectionTrait>(
        &self,
        conn: &C,
        flat: Flat,
    ) -> Result<Flat, DomainError> {
        FlatEntity::insert(flat_active_model(&flat))
            .exec_without_returning(conn)
            .await
            .map_err(db_err(FLAT))?;
        Ok(flat)
    }

    async fn update_flat<C: ConnectionTrait>(
        &self,
        conn: &C,
        flat: Flat,
    ) -> Result<Flat, DomainError> {
        let result = FlatEntity::update_many()
            .set(flat_active_model(&flat))
            .filter(FlatColumn::Id.eq(flat.id))
            .exec(conn)
            .await
            .map_err(db_err(FLAT))?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found(FLAT, flat.id));
        }
        Ok(flat)
    }

    async fn delete_flat<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<bool, DomainError> {
        let result = FlatEntity::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(db_err(FLAT))?;
        Ok(result.rows_affected > 0)
    }
}

fn flat_active_model(flat: &Flat) -> FlatAM {
    FlatAM {
        id: Set(flat.id),
        floor_id: Set(flat.floor_id),
        flat_number: Set(flat.flat_number.clone()),
        flat_type: Set(flat.flat_type.clone()),
        status: Set(flat.status.as_str().to_owned()),
        rent_amount: Set(flat.rent_amount),
        deposit_amount: Set(flat.deposit_amount),
        created_at: Set(utc(flat.created_at)),
    }
}
