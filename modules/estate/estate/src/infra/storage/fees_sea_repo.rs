use async_trait::async_trait;
use estate_sdk::{FeeEntry, FeePeriod, FeeType};
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::OrmEntityStore;
use super::db::{db_err, utc};
use super::entity::fee_entry::{
    ActiveModel as FeeEntryAM, Column as FeeEntryColumn, Entity as FeeEntryEntity, encode_months,
};
use super::entity::fee_type::{
    ActiveModel as FeeTypeAM, Column as FeeTypeColumn, Entity as FeeTypeEntity,
};
use crate::domain::error::DomainError;
use crate::domain::repos::entities::{FEE_ENTRY, FEE_TYPE};
use crate::domain::repos::{FeeEntriesRepository, FeeTypesRepository};

#[async_trait]
impl FeeTypesRepository for OrmEntityStore {
    async fn get_fee_type<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<FeeType>, DomainError> {
        let found = FeeTypeEntity::find_by_id(id)
            .one(conn)
            .await
            .map_err(db_err(FEE_TYPE))?;
        Ok(found.map(Into::into))
    }

    async fn list_fee_types<C: ConnectionTrait>(
        &self,
        conn: &C,
        active_only: bool,
    ) -> Result<Vec<FeeType>, DomainError> {
        let mut query = FeeTypeEntity::find();
        if active_only {
            query = query.filter(FeeTypeColumn::IsActive.eq(true));
        }
        let rows = query
            .order_by_asc(FeeTypeColumn::Name)
            .all(conn)
            .await
            .map_err(db_err(FEE_TYPE))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert_fee_type<C: ConnectionTrait>(
        &self,
        conn: &C,
        fee_type: FeeType,
    ) -> Result<FeeType, DomainError> {
        FeeTypeEntity::insert(fee_type_active_model(&fee_type))
            .exec_without_returning(conn)
            .await
            .map_err(db_err(FEE_TYPE))?;
        Ok(fee_type)
    }

    async fn update_fee_type<C: ConnectionTrait>(
        &self,
        conn: &C,
        fee_type: FeeType,
    ) -> Result<FeeType, DomainError> {
        let result = FeeTypeEntity::update_many()
            .set(fee_type_active_model(&fee_type))
            .filter(FeeTypeColumn::Id.eq(fee_type.id))
            .exec(conn)
            .await
            .map_err(db_err(FEE_TYPE))?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found(FEE_TYPE, fee_type.id));
        }
        Ok(fee_type)
    }
}

#[async_trait]
impl FeeEntriesRepository for OrmEntityStore {
    async fn insert_fee_entry<C: ConnectionTrait>(
        &self,
        conn: &C,
        entry: FeeEntry,
    ) -> Result<FeeEntry, DomainError> {
        let m = FeeEntryAM {
            id: Set(entry.id),
            member_id: Set(entry.member_id),
            fee_type_id: Set(entry.fee_type_id),
            building_id: Set(entry.building_id),
            flat_id: Set(entry.flat_id),
            flat_number: Set(entry.flat_number.clone()),
            months: Set(encode_months(&entry.months)?),
            fee: Set(entry.fee),
            total_fee: Set(entry.total_fee),
            payment_type: Set(entry.payment_type.clone()),
            remarks: Set(entry.remarks.clone()),
            created_at: Set(utc(entry.created_at)),
        };

        FeeEntryEntity::insert(m)
            .exec_without_returning(conn)
            .await
            .map_err(db_err(FEE_ENTRY))?;
        Ok(entry)
    }

    async fn list_member_fee_entries<C: ConnectionTrait>(
        &self,
        conn: &C,
        member_id: Uuid,
        period: FeePeriod,
    ) -> Result<Vec<FeeEntry>, DomainError> {
        let mut query = FeeEntryEntity::find().filter(FeeEntryColumn::MemberId.eq(member_id));
        if let Some(from) = period.from {
            query = query.filter(FeeEntryColumn::CreatedAt.gte(utc(from)));
        }
        if let Some(to) = period.to {
            query = query.filter(FeeEntryColumn::CreatedAt.lt(utc(to)));
        }

        query
            .order_by_asc(FeeEntryColumn::CreatedAt)
            .order_by_asc(FeeEntryColumn::Id)
            .all(conn)
            .await
            .map_err(db_err(FEE_ENTRY))?
            .into_iter()
            .map(FeeEntry::try_from)
            .collect()
    }

    async fn count_fee_entries_for_flat<C: ConnectionTrait>(
        &self,
        conn: &C,
        flat_id: Uuid,
    ) -> Result<u64, DomainError> {
        FeeEntryEntity::find()
            .filter(FeeEntryColumn::FlatId.eq(flat_id))
            .count(conn)
            .await
            .map_err(db_err(FEE_ENTRY))
    }

    async fn count_fee_entries_for_member<C: ConnectionTrait>(
        &self,
        conn: &C,
        member_id: Uuid,
    ) -> Result<u64, DomainError> {
        FeeEntryEntity::find()
            .filter(FeeEntryColumn::MemberId.eq(member_id))
            .count(conn)
            .await
            .map_err(db_err(FEE_ENTRY))
    }
}

fn fee_type_active_model(fee_type: &FeeType) -> FeeTypeAM {
    FeeTypeAM {
        id: Set(fee_type.id),
        name: Set(fee_type.name.clone()),
        description: Set(fee_type.description.clone()),
        amount: Set(fee_type.amount),
        is_active: Set(fee_type.is_active),
        created_at: Set(utc(fee_type.created_at)),
    }
}
