use estate_sdk::Floor;
use sea_orm::entity::prelude::*;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "floors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub building_id: Uuid,
    pub floor_number: i32,
    pub label: String,
    pub maintenance_charge: i64,
    pub created_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::building::Entity",
        from = "Column::BuildingId",
        to = "super::building::Column::Id"
    )]
    Building,
    #[sea_orm(has_many = "super::flat::Entity")]
    Flat,
}

impl Related<super::building::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Building.def()
    }
}

impl Related<super::flat::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Flat.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Floor {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            building_id: m.building_id,
            floor_number: m.floor_number,
            label: m.label,
            maintenance_charge: m.maintenance_charge,
            created_at: m.created_at,
        }
    }
}
