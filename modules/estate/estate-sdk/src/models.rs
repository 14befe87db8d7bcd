//! Transport-agnostic models of the property hierarchy and fee ledger.
//!
//! Monetary amounts are `i64` in the smallest currency unit.

use std::fmt;
use std::str::FromStr;

use estate_security::Role;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

// ==================== Hierarchy ====================

/// Residential complex; root of the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Colony {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    /// Set on the single lazily-created default colony.
    pub is_default: bool,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Default)]
pub struct NewColony {
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
}

/// How the colony of a new building is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColonyHint {
    /// Use this colony; it must exist.
    Id(Uuid),
    /// Use the existing colony, creating the default one if there is none.
    Implicit,
}

impl From<Option<Uuid>> for ColonyHint {
    fn from(id: Option<Uuid>) -> Self {
        id.map_or(Self::Implicit, Self::Id)
    }
}

/// A block within a colony.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Building {
    pub id: Uuid,
    pub colony_id: Uuid,
    pub name: String,
    pub total_floors: i32,
    pub description: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Default)]
pub struct NewBuilding {
    pub name: String,
    pub total_floors: Option<i32>,
    pub description: Option<String>,
}

/// A level within a building. `(building_id, floor_number)` is unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Floor {
    pub id: Uuid,
    pub building_id: Uuid,
    pub floor_number: i32,
    pub label: String,
    pub maintenance_charge: i64,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlatStatus {
    #[default]
    Vacant,
    Occupied,
}

impl FlatStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vacant => "vacant",
            Self::Occupied => "occupied",
        }
    }
}

impl fmt::Display for FlatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlatStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vacant" => Ok(Self::Vacant),
            "occupied" => Ok(Self::Occupied),
            other => Err(format!("unknown flat status: '{other}'")),
        }
    }
}

/// An individually occupiable unit. `(floor_id, flat_number)` is unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flat {
    pub id: Uuid,
    pub floor_id: Uuid,
    pub flat_number: String,
    pub flat_type: String,
    pub status: FlatStatus,
    pub rent_amount: i64,
    pub deposit_amount: i64,
    pub created_at: OffsetDateTime,
}

/// Attributes of a flat to create. Omitted fields take the creation defaults.
#[derive(Debug, Clone, Default)]
pub struct NewFlat {
    pub flat_number: String,
    pub flat_type: Option<String>,
    pub status: Option<FlatStatus>,
    pub rent_amount: Option<i64>,
    pub deposit_amount: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct FlatPatch {
    pub flat_type: Option<String>,
    pub status: Option<FlatStatus>,
    pub rent_amount: Option<i64>,
    pub deposit_amount: Option<i64>,
}

// ==================== People ====================

/// A person associated with a flat, optionally linked to a login identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub flat_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Default)]
pub struct NewMember {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub flat_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct MemberPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub flat_id: Option<Uuid>,
}

/// Role and jurisdiction of an authentication identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    /// Equals the authentication identity id.
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub colony_id: Option<Uuid>,
    pub building_id: Option<Uuid>,
    pub flat_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

// ==================== Fees ====================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeType {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub amount: i64,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Default)]
pub struct NewFeeType {
    pub name: String,
    pub description: Option<String>,
    pub amount: i64,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct FeeTypePatch {
    pub description: Option<String>,
    pub amount: Option<i64>,
    pub is_active: Option<bool>,
}

/// A recorded fee for a member over one or more months.
///
/// `total_fee` is fixed at creation (`fee × months`); later fee type changes
/// never touch it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeEntry {
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
    pub created_at: OffsetDateTime,
}

/// Fee entry to record. Block and flat identifiers are taken from the
/// member's flat.
#[derive(Debug, Clone, Default)]
pub struct NewFeeEntry {
    pub member_id: Uuid,
    pub fee_type_id: Option<Uuid>,
    pub months: Vec<String>,
    /// Per-month fee; defaults to the fee type's current amount.
    pub fee: Option<i64>,
    pub payment_type: String,
    pub remarks: Option<String>,
}

/// Half-open `[from, to)` window over entry creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeePeriod {
    pub from: Option<OffsetDateTime>,
    pub to: Option<OffsetDateTime>,
}

impl FeePeriod {
    /// Unbounded period.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            from: None,
            to: None,
        }
    }

    #[must_use]
    pub const fn between(from: OffsetDateTime, to: OffsetDateTime) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    #[must_use]
    pub fn contains(&self, at: OffsetDateTime) -> bool {
        self.from.is_none_or(|from| at >= from) && self.to.is_none_or(|to| at < to)
    }
}
