use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::role::Role;

/// Profile part of a [`Principal`]: display names and the jurisdiction the
/// profile is scoped to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalProfile {
    pub first_name: String,
    pub last_name: String,
    pub colony_id: Option<Uuid>,
    pub building_id: Option<Uuid>,
    pub flat_id: Option<Uuid>,
}

/// `Principal` is the resolved identity and role of the current request.
///
/// Built by the session resolver from an authenticated identity and its
/// `UserProfile` row, then passed by reference to every service operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Authentication identity id (equals the `UserProfile` id).
    id: Uuid,
    email: String,
    role: Role,
    profile: PrincipalProfile,
}

impl Principal {
    #[must_use]
    pub fn builder() -> PrincipalBuilder {
        PrincipalBuilder::default()
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn profile(&self) -> &PrincipalProfile {
        &self.profile
    }

    /// Whether the principal's role is at least `min`.
    #[must_use]
    pub fn has_role_at_least(&self, min: Role) -> bool {
        self.role.at_least(min)
    }
}

/// Builder for [`Principal`]. Unset fields fall back to nil/empty values and
/// the `Resident` role, the narrowest jurisdiction.
#[derive(Default)]
pub struct PrincipalBuilder {
    id: Option<Uuid>,
    email: Option<String>,
    role: Option<Role>,
    profile: PrincipalProfile,
}

impl PrincipalBuilder {
    #[must_use]
    pub fn id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    #[must_use]
    pub fn names(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.profile.first_name = first_name.into();
        self.profile.last_name = last_name.into();
        self
    }

    #[must_use]
    pub fn colony_id(mut self, colony_id: Option<Uuid>) -> Self {
        self.profile.colony_id = colony_id;
        self
    }

    #[must_use]
    pub fn building_id(mut self, building_id: Option<Uuid>) -> Self {
        self.profile.building_id = building_id;
        self
    }

    #[must_use]
    pub fn flat_id(mut self, flat_id: Option<Uuid>) -> Self {
        self.profile.flat_id = flat_id;
        self
    }

    #[must_use]
    pub fn build(self) -> Principal {
        Principal {
            id: self.id.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            role: self.role.unwrap_or(Role::Resident),
            profile: self.profile,
        }
    }
}
