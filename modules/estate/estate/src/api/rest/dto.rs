//! REST request and response bodies.
//!
//! Timestamps are RFC 3339 strings; amounts are integers in the smallest
//! currency unit.

use estate_sdk::{
    Building, Colony, FeeEntry, FeeType, FeeTypePatch, Flat, FlatPatch, FlatStatus, Floor, Member,
    MemberPatch, NewBuilding, NewColony, NewFeeEntry, NewFeeType, NewFlat, NewMember, UserProfile,
};
use estate_security::{Principal, Role};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

use crate::domain::error::DomainError;

pub(crate) fn format_rfc3339(at: OffsetDateTime) -> String {
    at.format(&Rfc3339).unwrap_or_default()
}

pub(crate) fn parse_rfc3339(field: &str, value: &str) -> Result<OffsetDateTime, DomainError> {
    OffsetDateTime::parse(value, &Rfc3339)
        .map_err(|e| DomainError::validation(field, format!("expected an RFC 3339 timestamp: {e}")))
}

// ==================== Pages ====================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageDto {
    pub page: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
}

/// Body of a role page while the session is still resolving.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadingDto {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardDto {
    pub principal_id: Uuid,
    pub email: String,
    pub role: Role,
    pub landing_route: String,
    pub colony_id: Option<Uuid>,
    pub building_id: Option<Uuid>,
    pub flat_id: Option<Uuid>,
}

impl From<&Principal> for DashboardDto {
    fn from(p: &Principal) -> Self {
        Self {
            principal_id: p.id(),
            email: p.email().to_owned(),
            role: p.role(),
            landing_route: p.role().landing_route().to_owned(),
            colony_id: p.profile().colony_id,
            building_id: p.profile().building_id,
            flat_id: p.profile().flat_id,
        }
    }
}

// ==================== Hierarchy ====================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateColonyReq {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub pincode: Option<String>,
}

impl From<CreateColonyReq> for NewColony {
    fn from(r: CreateColonyReq) -> Self {
        Self {
            name: r.name,
            address: r.address,
            city: r.city,
            state: r.state,
            pincode: r.pincode,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColonyDto {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub is_default: bool,
    pub created_at: String,
}

impl From<Colony> for ColonyDto {
    fn from(c: Colony) -> Self {
        Self {
            id: c.id,
            name: c.name,
            address: c.address,
            city: c.city,
            state: c.state,
            pincode: c.pincode,
            is_default: c.is_default,
            created_at: format_rfc3339(c.created_at),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateBlockReq {
    pub name: String,
    /// Omitted: the existing colony, or the default one if none exists.
    #[serde(default)]
    pub colony_id: Option<Uuid>,
    #[serde(default)]
    pub total_floors: Option<i32>,
    #[serde(default)]
    pub description: Option<String>,
}

impl CreateBlockReq {
    pub fn into_parts(self) -> (Option<Uuid>, NewBuilding) {
        (
            self.colony_id,
            NewBuilding {
                name: self.name,
                total_floors: self.total_floors,
                description: self.description,
            },
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListBlocksQuery {
    #[serde(default)]
    pub colony_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingDto {
    pub id: Uuid,
    pub colony_id: Uuid,
    pub name: String,
    pub total_floors: i32,
    pub description: Option<String>,
    pub created_at: String,
}

impl From<Building> for BuildingDto {
    fn from(b: Building) -> Self {
        Self {
            id: b.id,
            colony_id: b.colony_id,
            name: b.name,
            total_floors: b.total_floors,
            description: b.description,
            created_at: format_rfc3339(b.created_at),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorDto {
    pub id: Uuid,
    pub building_id: Uuid,
    pub floor_number: i32,
    pub label: String,
    pub maintenance_charge: i64,
    pub created_at: String,
}

impl From<Floor> for FloorDto {
    fn from(f: Floor) -> Self {
        Self {
            id: f.id,
            building_id: f.building_id,
            floor_number: f.floor_number,
            label: f.label,
            maintenance_charge: f.maintenance_charge,
            created_at: format_rfc3339(f.created_at),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateFlatReq {
    pub block_id: Uuid,
    /// Defaults to floor 1.
    #[serde(default)]
    pub floor_number: Option<i32>,
    pub flat_number: String,
    #[serde(default)]
    pub flat_type: Option<String>,
    #[serde(default)]
    pub status: Option<FlatStatus>,
    #[serde(default)]
    pub rent_amount: Option<i64>,
    #[serde(default)]
    pub deposit_amount: Option<i64>,
}

impl CreateFlatReq {
    pub fn into_parts(self) -> (Uuid, Option<i32>, NewFlat) {
        (
            self.block_id,
            self.floor_number,
            NewFlat {
                flat_number: self.flat_number,
                flat_type: self.flat_type,
                status: self.status,
                rent_amount: self.rent_amount,
                deposit_amount: self.deposit_amount,
            },
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateFlatReq {
    #[serde(default)]
    pub flat_type: Option<String>,
    #[serde(default)]
    pub status: Option<FlatStatus>,
    #[serde(default)]
    pub rent_amount: Option<i64>,
    #[serde(default)]
    pub deposit_amount: Option<i64>,
}

impl From<UpdateFlatReq> for FlatPatch {
    fn from(r: UpdateFlatReq) -> Self {
        Self {
            flat_type: r.flat_type,
            status: r.status,
            rent_amount: r.rent_amount,
            deposit_amount: r.deposit_amount,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatDto {
    pub id: Uuid,
    pub floor_id: Uuid,
    pub flat_number: String,
    pub flat_type: String,
    pub status: FlatStatus,
    pub rent_amount: i64,
    pub deposit_amount: i64,
    pub created_at: String,
}

impl From<Flat> for FlatDto {
    fn from(f: Flat) -> Self {
        Self {
            id: f.id,
            floor_id: f.floor_id,
            flat_number: f.flat_number,
            flat_type: f.flat_type,
            status: f.status,
            rent_amount: f.rent_amount,
            deposit_amount: f.deposit_amount,
            created_at: format_rfc3339(f.created_at),
        }
    }
}

// ==================== Members & profiles ====================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateMemberReq {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub flat_id: Option<Uuid>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

impl From<CreateMemberReq> for NewMember {
    fn from(r: CreateMemberReq) -> Self {
        Self {
            name: r.name,
            phone: r.phone,
            email: r.email,
            flat_id: r.flat_id,
            user_id: r.user_id,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateMemberReq {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub flat_id: Option<Uuid>,
}

impl From<UpdateMemberReq> for MemberPatch {
    fn from(r: UpdateMemberReq) -> Self {
        Self {
            name: r.name,
            phone: r.phone,
            email: r.email,
            flat_id: r.flat_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDto {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub flat_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub created_at: String,
}

impl From<Member> for MemberDto {
    fn from(m: Member) -> Self {
        Self {
            id: m.id,
            name: m.name,
            phone: m.phone,
            email: m.email,
            flat_id: m.flat_id,
            user_id: m.user_id,
            created_at: format_rfc3339(m.created_at),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateRoleReq {
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileDto {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub colony_id: Option<Uuid>,
    pub building_id: Option<Uuid>,
    pub flat_id: Option<Uuid>,
    pub is_active: bool,
    pub updated_at: String,
}

impl From<UserProfile> for ProfileDto {
    fn from(p: UserProfile) -> Self {
        Self {
            id: p.id,
            email: p.email,
            role: p.role,
            first_name: p.first_name,
            last_name: p.last_name,
            colony_id: p.colony_id,
            building_id: p.building_id,
            flat_id: p.flat_id,
            is_active: p.is_active,
            updated_at: format_rfc3339(p.updated_at),
        }
    }
}

// ==================== Fees ====================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateFeeTypeReq {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub amount: i64,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl From<CreateFeeTypeReq> for NewFeeType {
    fn from(r: CreateFeeTypeReq) -> Self {
        Self {
            name: r.name,
            description: r.description,
            amount: r.amount,
            is_active: r.is_active,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateFeeTypeReq {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl From<UpdateFeeTypeReq> for FeeTypePatch {
    fn from(r: UpdateFeeTypeReq) -> Self {
        Self {
            description: r.description,
            amount: r.amount,
            is_active: r.is_active,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListFeeTypesQuery {
    #[serde(default)]
    pub active_only: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeTypeDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub amount: i64,
    pub is_active: bool,
    pub created_at: String,
}

impl From<FeeType> for FeeTypeDto {
    fn from(t: FeeType) -> Self {
        Self {
            id: t.id,
            name: t.name,
            description: t.description,
            amount: t.amount,
            is_active: t.is_active,
            created_at: format_rfc3339(t.created_at),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateFeeEntryReq {
    pub member_id: Uuid,
    #[serde(default)]
    pub fee_type_id: Option<Uuid>,
    pub months: Vec<String>,
    /// Omitted: the fee type's current amount.
    #[serde(default)]
    pub fee: Option<i64>,
    pub payment_type: String,
    #[serde(default)]
    pub remarks: Option<String>,
}

impl From<CreateFeeEntryReq> for NewFeeEntry {
    fn from(r: CreateFeeEntryReq) -> Self {
        Self {
            member_id: r.member_id,
            fee_type_id: r.fee_type_id,
            months: r.months,
            fee: r.fee,
            payment_type: r.payment_type,
            remarks: r.remarks,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeEntryDto {
    pub id: Uuid,
    pub member_id: Uuid,
    pub fee_type_id: Option<Uuid>,
    pub building_id: Option<Uuid>,
    pub flat_id: Option<Uuid>,
    pub flat_number: Option<String>,
    pub months: Vec<String>,
    pub fee: i64,
    pub total_fee: i64,
    pub payment_type: String,
    pub remarks: Option<String>,
    pub created_at: String,
}

impl From<FeeEntry> for FeeEntryDto {
    fn from(e: FeeEntry) -> Self {
        Self {
            id: e.id,
            member_id: e.member_id,
            fee_type_id: e.fee_type_id,
            building_id: e.building_id,
            flat_id: e.flat_id,
            flat_number: e.flat_number,
            months: e.months,
            fee: e.fee,
            total_fee: e.total_fee,
            payment_type: e.payment_type,
            remarks: e.remarks,
            created_at: format_rfc3339(e.created_at),
        }
    }
}

/// `?from=&to=` window, both RFC 3339 and optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeeTotalQuery {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeTotalDto {
    pub member_id: Uuid,
    pub total: i64,
    pub from: Option<String>,
    pub to: Option<String>,
}
