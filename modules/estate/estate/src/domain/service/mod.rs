use estate_security::{Principal, Role};

use crate::config::EstateConfig;
use crate::domain::error::DomainError;

mod fees;
mod hierarchy;
mod members;
mod profiles;

#[cfg(test)]
mod tests_fees;
#[cfg(test)]
mod tests_hierarchy;
#[cfg(test)]
mod tests_members;

pub use fees::FeesService;
pub use hierarchy::HierarchyService;
pub use members::MembersService;
pub use profiles::ProfilesService;

/// Database handle shared by all services. Passed in explicitly; there is no
/// process-wide client.
pub type DbProvider = sea_orm::DatabaseConnection;

// ============================================================================
// Service Configuration
// ============================================================================

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub allow_implicit_default_colony: bool,
    pub default_colony_name: String,
    pub max_name_length: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::from(&EstateConfig::default())
    }
}

impl From<&EstateConfig> for ServiceConfig {
    fn from(cfg: &EstateConfig) -> Self {
        Self {
            allow_implicit_default_colony: cfg.allow_implicit_default_colony,
            default_colony_name: cfg.default_colony_name.clone(),
            max_name_length: cfg.max_name_length,
        }
    }
}

impl ServiceConfig {
    /// Trimmed, non-empty, bounded free-text name.
    pub(crate) fn validate_name(&self, field: &str, value: &str) -> Result<String, DomainError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation(field, "must not be empty"));
        }
        if trimmed.chars().count() > self.max_name_length {
            return Err(DomainError::validation(
                field,
                format!("exceeds maximum length of {}", self.max_name_length),
            ));
        }
        Ok(trimmed.to_owned())
    }
}

/// Reject the call unless the principal's role is at least `min`.
pub(crate) fn require_role(principal: &Principal, min: Role, action: &str) -> Result<(), DomainError> {
    if principal.has_role_at_least(min) {
        Ok(())
    } else {
        tracing::warn!(
            principal = %principal.id(),
            role = %principal.role(),
            required = %min,
            action,
            "Role below required level"
        );
        Err(DomainError::forbidden(format!(
            "{action} requires role {min} or above"
        )))
    }
}

pub(crate) fn validate_amount(field: &str, amount: i64) -> Result<i64, DomainError> {
    if amount < 0 {
        return Err(DomainError::validation(field, "must not be negative"));
    }
    Ok(amount)
}
