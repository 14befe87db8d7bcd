use estate_sdk::UserProfile;
use estate_security::RoleParseError;
use sea_orm::entity::prelude::*;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::repos::entities::USER_PROFILE;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_profiles")]
pub struct Model {
    /// Authentication identity id.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    pub colony_id: Option<Uuid>,
    pub building_id: Option<Uuid>,
    pub flat_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for UserProfile {
    type Error = DomainError;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let role = m
            .role
            .parse()
            .map_err(|e: RoleParseError| {
                DomainError::database(USER_PROFILE, e.to_string())
            })?;
        Ok(Self {
            id: m.id,
            email: m.email,
            role,
            first_name: m.first_name,
            last_name: m.last_name,
            colony_id: m.colony_id,
            building_id: m.building_id,
            flat_id: m.flat_id,
            is_active: m.is_active,
            created_at: m.created_at,
            updated_at: m.updated_at,
        })
    }
}
