use estate_sdk::FeeEntry;
use sea_orm::entity::prelude::*;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::repos::entities::FEE_ENTRY;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "fee_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub member_id: Uuid,
    pub fee_type_id: Option<Uuid>,
    pub building_id: Option<Uuid>,
    pub flat_id: Option<Uuid>,
    pub flat_number: Option<String>,
    /// JSON array of month labels.
    pub months: String,
    pub fee: i64,
    pub total_fee: i64,
    pub payment_type: String,
    pub remarks: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::member::Entity",
        from = "Column::MemberId",
        to = "super::member::Column::Id"
    )]
    Member,
    #[sea_orm(
        belongs_to = "super::fee_type::Entity",
        from = "Column::FeeTypeId",
        to = "super::fee_type::Column::Id"
    )]
    FeeType,
}

impl Related<super::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Member.def()
    }
}

impl Related<super::fee_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeeType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub(crate) fn encode_months(months: &[String]) -> Result<String, DomainError> {
    serde_json::to_string(months).map_err(|e| DomainError::database(FEE_ENTRY, e.to_string()))
}

impl TryFrom<Model> for FeeEntry {
    type Error = DomainError;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let months: Vec<String> = serde_json::from_str(&m.months)
            .map_err(|e| DomainError::database(FEE_ENTRY, format!("malformed months: {e}")))?;
        Ok(Self {
            id: m.id,
            member_id: m.member_id,
            fee_type_id: m.fee_type_id,
            building_id: m.building_id,
            flat_id: m.flat_id,
            flat_number: m.flat_number,
            months,
            fee: m.fee,
            total_fee: m.total_fee,
            payment_type: m.payment_type,
            remarks: m.remarks,
            created_at: m.created_at,
        })
    }
}
