#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Static `AuthN` Resolver Plugin
//!
//! This plugin provides static token-to-identity mapping for development and testing.
//!
//! ## Modes
//!
//! - **`accept_all`** (default): Accepts any non-empty token, returns configured default identity.
//!
//! - **`static_tokens`**: Maps specific tokens to specific identities. Useful for E2E tests
//!   with distinct users.
//!
//! Setting `unavailable: true` makes every call fail with `ServiceUnavailable`,
//! which is how the "backend down" path is exercised without a real backend.
//! `static_tokens` with an empty token list answers `NoPluginAvailable`, and an
//! identity with a nil `subject_id` answers `Internal`.
//!
//! ## Configuration
//!
//! ```yaml
//! authn:
//!   mode: static_tokens
//!   default_identity:
//!     subject_id: "11111111-6a88-4768-9dfc-6bcd5187d9ed"
//!     email: "admin@estate.local"
//!   tokens:
//!     - token: "resident-token"
//!       identity:
//!         subject_id: "22222222-0000-4000-8000-000000000002"
//!         email: "resident@estate.local"
//! ```

pub mod config;
pub mod domain;

pub use config::StaticAuthNPluginConfig;
pub use domain::service::Service as StaticAuthNPlugin;
