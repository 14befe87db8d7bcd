//! Estate module
//!
//! Role-gated management of the colony → building → floor → flat → member
//! hierarchy and the per-member fee ledger.
//!
//! - [`domain::session`] resolves a bearer token into a session
//! - [`domain::gate`] decides allow / redirect / continue and guards pages
//! - [`domain::service`] holds the hierarchy builder, member, profile and fee services
//! - [`infra::storage`] is the SeaORM entity store
//! - [`api::rest`] exposes the route surface over axum
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod config;
pub mod domain;
pub mod infra;
pub mod module;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::EstateConfig;
pub use module::{AppServices, EstateModule};
