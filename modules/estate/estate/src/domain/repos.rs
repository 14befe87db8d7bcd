//! Entity store contract.
//!
//! One repository trait per aggregate. Repositories do not hold a connection:
//! every method takes `&impl ConnectionTrait`, so the service decides which
//! connection (or transaction) a call runs on.
//!
//! `insert_*` methods must report unique-constraint violations as
//! [`DomainError::Conflict`]; the hierarchy builder relies on that to recover
//! from ancestor-creation races.

use async_trait::async_trait;
use estate_sdk::{
    Building, Colony, FeeEntry, FeePeriod, FeeType, Flat, Floor, Member, UserProfile,
};
use sea_orm::ConnectionTrait;
use uuid::Uuid;

use super::error::DomainError;

/// Entity names used in errors and logs.
pub mod entities {
    pub const COLONY: &str = "colony";
    pub const BUILDING: &str = "building";
    pub const FLOOR: &str = "floor";
    pub const FLAT: &str = "flat";
    pub const MEMBER: &str = "member";
    pub const USER_PROFILE: &str = "user_profile";
    pub const FEE_TYPE: &str = "fee_type";
    pub const FEE_ENTRY: &str = "fee_entry";
}

#[async_trait]
pub trait ColoniesRepository: Send + Sync {
    async fn get_colony<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<Colony>, DomainError>;

    /// Oldest colony, if any exists.
    async fn first_colony<C: ConnectionTrait>(
        &self,
        conn: &C,
    ) -> Result<Option<Colony>, DomainError>;

    async fn find_default_colony<C: ConnectionTrait>(
        &self,
        conn: &C,
    ) -> Result<Option<Colony>, DomainError>;

    async fn insert_colony<C: ConnectionTrait>(
        &self,
        conn: &C,
        colony: Colony,
    ) -> Result<Colony, DomainError>;
}

#[async_trait]
pub trait BuildingsRepository: Send + Sync {
    async fn get_building<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<Building>, DomainError>;

    async fn list_buildings<C: ConnectionTrait>(
        &self,
        conn: &C,
        colony_id: Option<Uuid>,
    ) -> Result<Vec<Building>, DomainError>;

    async fn insert_building<C: ConnectionTrait>(
        &self,
        conn: &C,
        building: Building,
    ) -> Result<Building, DomainError>;
}

#[async_trait]
pub trait FloorsRepository: Send + Sync {
    async fn get_floor<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<Floor>, DomainError>;

    /// Lookup by the unique `(building_id, floor_number)` key.
    async fn find_floor<C: ConnectionTrait>(
        &self,
        conn: &C,
        building_id: Uuid,
        floor_number: i32,
    ) -> Result<Option<Floor>, DomainError>;

    async fn list_floors<C: ConnectionTrait>(
        &self,
        conn: &C,
        building_id: Uuid,
    ) -> Result<Vec<Floor>, DomainError>;

    async fn insert_floor<C: ConnectionTrait>(
        &self,
        conn: &C,
        floor: Floor,
    ) -> Result<Floor, DomainError>;
}

#[async_trait]
pub trait FlatsRepository: Send + Sync {
    async fn get_flat<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<Flat>, DomainError>;

    async fn list_flats<C: ConnectionTrait>(
        &self,
        conn: &C,
        floor_id: Uuid,
    ) -> Result<Vec<Flat>, DomainError>;

    async fn insert_flat<C: ConnectionTrait>(
        &self,
        conn: &C,
        flat: Flat,
    ) -> Result<Flat, DomainError>;

    async fn update_flat<C: ConnectionTrait>(
        &self,
        conn: &C,
        flat: Flat,
    ) -> Result<Flat, DomainError>;

    async fn delete_flat<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<bool, DomainError>;
}

#[async_trait]
pub trait MembersRepository: Send + Sync {
    async fn get_member<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<Member>, DomainError>;

    async fn count_members_in_flat<C: ConnectionTrait>(
        &self,
        conn: &C,
        flat_id: Uuid,
    ) -> Result<u64, DomainError>;

    async fn insert_member<C: ConnectionTrait>(
        &self,
        conn: &C,
        member: Member,
    ) -> Result<Member, DomainError>;

    async fn update_member<C: ConnectionTrait>(
        &self,
        conn: &C,
        member: Member,
    ) -> Result<Member, DomainError>;

    async fn delete_member<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<bool, DomainError>;
}

#[async_trait]
pub trait ProfilesRepository: Send + Sync {
    async fn get_profile<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<UserProfile>, DomainError>;

    async fn insert_profile<C: ConnectionTrait>(
        &self,
        conn: &C,
        profile: UserProfile,
    ) -> Result<UserProfile, DomainError>;

    async fn update_profile<C: ConnectionTrait>(
        &self,
        conn: &C,
        profile: UserProfile,
    ) -> Result<UserProfile, DomainError>;
}

#[async_trait]
pub trait FeeTypesRepository: Send + Sync {
    async fn get_fee_type<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<FeeType>, DomainError>;

    async fn list_fee_types<C: ConnectionTrait>(
        &self,
        conn: &C,
        active_only: bool,
    ) -> Result<Vec<FeeType>, DomainError>;

    async fn insert_fee_type<C: ConnectionTrait>(
        &self,
        conn: &C,
        fee_type: FeeType,
    ) -> Result<FeeType, DomainError>;

    async fn update_fee_type<C: ConnectionTrait>(
        &self,
        conn: &C,
        fee_type: FeeType,
    ) -> Result<FeeType, DomainError>;
}

#[async_trait]
pub trait FeeEntriesRepository: Send + Sync {
    async fn insert_fee_entry<C: ConnectionTrait>(
        &self,
        conn: &C,
        entry: FeeEntry,
    ) -> Result<FeeEntry, DomainError>;

    /// Entries of one member created within `period`, oldest first.
    async fn list_member_fee_entries<C: ConnectionTrait>(
        &self,
        conn: &C,
        member_id: Uuid,
        period: FeePeriod,
    ) -> Result<Vec<FeeEntry>, DomainError>;

    async fn count_fee_entries_for_flat<C: ConnectionTrait>(
        &self,
        conn: &C,
        flat_id: Uuid,
    ) -> Result<u64, DomainError>;

    async fn count_fee_entries_for_member<C: ConnectionTrait>(
        &self,
        conn: &C,
        member_id: Uuid,
    ) -> Result<u64, DomainError>;
}

/// The full entity store: every aggregate repository behind one handle.
pub trait EntityStore:
    ColoniesRepository
    + BuildingsRepository
    + FloorsRepository
    + FlatsRepository
    + MembersRepository
    + ProfilesRepository
    + FeeTypesRepository
    + FeeEntriesRepository
    + 'static
{
}

impl<T> EntityStore for T where
    T: ColoniesRepository
        + BuildingsRepository
        + FloorsRepository
        + FlatsRepository
        + MembersRepository
        + ProfilesRepository
        + FeeTypesRepository
        + FeeEntriesRepository
        + 'static
{
}
