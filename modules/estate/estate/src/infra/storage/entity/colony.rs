use estate_sdk::Colony;
use sea_orm::entity::prelude::*;
use time::OffsetDateTime;
use uuid::Uuid;

/// Value of `default_key` on the default colony. The column is unique and
/// NULL everywhere else, so at most one default colony can exist.
pub const DEFAULT_KEY: &str = "default";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "colonies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    #[sea_orm(unique)]
    pub default_key: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::building::Entity")]
    Building,
}

impl Related<super::building::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Building.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Colony {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            address: m.address,
            city: m.city,
            state: m.state,
            pincode: m.pincode,
            is_default: m.default_key.is_some(),
            created_at: m.created_at,
        }
    }
}
