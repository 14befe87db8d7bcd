use estate_sdk::Member;
use sea_orm::entity::prelude::*;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "members")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub flat_id: Option<Uuid>,
    #[sea_orm(unique)]
    pub user_id: Option<Uuid>,
    pub created_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::flat::Entity",
        from = "Column::FlatId",
        to = "super::flat::Column::Id"
    )]
    Flat,
    #[sea_orm(
        belongs_to = "super::user_profile::Entity",
        from = "Column::UserId",
        to = "super::user_profile::Column::Id"
    )]
    UserProfile,
    #[sea_orm(has_many = "super::fee_entry::Entity")]
    FeeEntry,
}

impl Related<super::flat::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Flat.def()
    }
}

impl Related<super::user_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserProfile.def()
    }
}

impl Related<super::fee_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeeEntry.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Member {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            phone: m.phone,
            email: m.email,
            flat_id: m.flat_id,
            user_id: m.user_id,
            created_at: m.created_at,
        }
    }
}
