use estate_sdk::FeeType;
use sea_orm::entity::prelude::*;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "fee_types")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub description: Option<String>,
    pub amount: i64,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::fee_entry::Entity")]
    FeeEntry,
}

impl Related<super::fee_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeeEntry.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for FeeType {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            amount: m.amount,
            is_active: m.is_active,
            created_at: m.created_at,
        }
    }
}
