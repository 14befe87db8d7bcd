use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Landing route for visitors without a role.
pub const PUBLIC_LANDING_ROUTE: &str = "/";

/// Administrative role of a principal.
///
/// The set is closed. Variants are declared from the narrowest jurisdiction to
/// the broadest, so the derived `Ord` follows jurisdiction breadth:
/// `SuperAdmin > ColonyAdmin > BlockManager > Resident`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Resident,
    BlockManager,
    ColonyAdmin,
    SuperAdmin,
}

impl Role {
    /// All roles, broadest first.
    pub const ALL: [Self; 4] = [
        Self::SuperAdmin,
        Self::ColonyAdmin,
        Self::BlockManager,
        Self::Resident,
    ];

    /// Wire name of the role (`super_admin`, `colony_admin`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::ColonyAdmin => "colony_admin",
            Self::BlockManager => "block_manager",
            Self::Resident => "resident",
        }
    }

    /// Path prefix of the pages owned by this role.
    #[must_use]
    pub const fn path_prefix(self) -> &'static str {
        match self {
            Self::SuperAdmin => "/super-admin",
            Self::ColonyAdmin => "/colony-admin",
            Self::BlockManager => "/block-manager",
            Self::Resident => "/resident",
        }
    }

    /// Canonical landing route for the role.
    #[must_use]
    pub const fn landing_route(self) -> &'static str {
        match self {
            Self::SuperAdmin => "/super-admin/dashboard",
            Self::ColonyAdmin => "/colony-admin/dashboard",
            Self::BlockManager => "/block-manager/dashboard",
            Self::Resident => "/resident/dashboard",
        }
    }

    /// Whether this role's jurisdiction is at least as broad as `other`.
    #[must_use]
    pub fn at_least(self, other: Self) -> bool {
        self >= other
    }

    /// Resolve the role owning a role-scoped path, if any.
    #[must_use]
    pub fn owning_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| {
            path.strip_prefix(role.path_prefix())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name one of the closed set of roles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: '{0}'")]
pub struct RoleParseError(pub String);

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Self::SuperAdmin),
            "colony_admin" => Ok(Self::ColonyAdmin),
            "block_manager" => Ok(Self::BlockManager),
            "resident" => Ok(Self::Resident),
            other => Err(RoleParseError(other.to_owned())),
        }
    }
}

/// Landing route for an optional role.
///
/// Pure and total: login-success redirects and session-initiation redirects
/// both go through here. A missing role lands on the public home page.
#[must_use]
pub const fn default_route(role: Option<Role>) -> &'static str {
    match role {
        Some(role) => role.landing_route(),
        None => PUBLIC_LANDING_ROUTE,
    }
}
