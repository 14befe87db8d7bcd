use estate_sdk::Flat;
use sea_orm::entity::prelude::*;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::repos::entities::FLAT;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "flats")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub floor_id: Uuid,
    pub flat_number: String,
    pub flat_type: String,
    pub status: String,
    pub rent_amount: i64,
    pub deposit_amount: i64,
    pub created_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::floor::Entity",
        from = "Column::FloorId",
        to = "super::floor::Column::Id"
    )]
    Floor,
    #[sea_orm(has_many = "super::member::Entity")]
    Member,
}

impl Related<super::floor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Floor.def()
    }
}

impl Related<super::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Member.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Flat {
    type Error = DomainError;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let status = m
            .status
            .parse()
            .map_err(|e: String| DomainError::database(FLAT, e))?;
        Ok(Self {
            id: m.id,
            floor_id: m.floor_id,
            flat_number: m.flat_number,
            flat_type: m.flat_type,
            status,
            rent_amount: m.rent_amount,
            deposit_amount: m.deposit_amount,
            created_at: m.created_at,
        })
    }
}
