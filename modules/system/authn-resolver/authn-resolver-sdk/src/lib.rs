//! Authentication boundary for the estate workspace.
//!
//! A backend implements [`AuthNResolverClient`] and maps a bearer token to an
//! [`Identity`]. Roles and profiles are not part of this crate; the estate
//! module resolves them from its own store.

pub mod api;
pub mod error;
pub mod models;

pub use api::AuthNResolverClient;
pub use error::AuthNResolverError;
pub use models::{AuthenticationResult, Identity};
