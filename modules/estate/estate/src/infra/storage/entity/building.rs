use estate_sdk::Building;
use sea_orm::entity::prelude::*;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "buildings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub colony_id: Uuid,
    pub name: String,
    pub total_floors: i32,
    pub description: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::colony::Entity",
        from = "Column::ColonyId",
        to = "super::colony::Column::Id"
    )]
    Colony,
    #[sea_orm(has_many = "super::floor::Entity")]
    Floor,
}

impl Related<super::colony::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Colony.def()
    }
}

impl Related<super::floor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Floor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Building {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            colony_id: m.colony_id,
            name: m.name,
            total_floors: m.total_floors,
            description: m.description,
            created_at: m.created_at,
        }
    }
}
