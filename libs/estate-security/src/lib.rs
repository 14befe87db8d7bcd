#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
pub mod principal;
pub mod role;

pub use principal::{Principal, PrincipalBuilder, PrincipalProfile};
pub use role::{PUBLIC_LANDING_ROUTE, Role, RoleParseError, default_route};
