pub mod building;
pub mod colony;
pub mod fee_entry;
pub mod fee_type;
pub mod flat;
pub mod floor;
pub mod member;
pub mod user_profile;
