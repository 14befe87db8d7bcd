//! Estate SDK
//!
//! Public models and errors of the estate module. The module crate converts
//! its internal `DomainError` into [`EstateError`] at the boundary.

pub mod errors;
pub mod models;

pub use errors::{ErrorKind, EstateError};
pub use estate_security::Role;
pub use models::{
    Building, Colony, ColonyHint, FeeEntry, FeePeriod, FeeType, FeeTypePatch, Flat, FlatPatch,
    FlatStatus, Floor, Member, MemberPatch, NewBuilding, NewColony, NewFeeEntry, NewFeeType,
    NewFlat, NewMember, UserProfile,
};
