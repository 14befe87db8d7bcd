use serde::{Deserialize, Serialize};

/// Configuration for the estate module.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EstateConfig {
    /// Allow building creation without an explicit colony, falling back to
    /// the lazily-created default colony.
    #[serde(default = "default_allow_implicit_default_colony")]
    pub allow_implicit_default_colony: bool,

    /// Name given to the default colony when it is first created.
    #[serde(default = "default_colony_name")]
    pub default_colony_name: String,

    /// Upper bound for free-text names (members, buildings, fee types).
    #[serde(default = "default_max_name_length")]
    pub max_name_length: usize,
}

impl Default for EstateConfig {
    fn default() -> Self {
        Self {
            allow_implicit_default_colony: default_allow_implicit_default_colony(),
            default_colony_name: default_colony_name(),
            max_name_length: default_max_name_length(),
        }
    }
}

fn default_allow_implicit_default_colony() -> bool {
    true
}

fn default_colony_name() -> String {
    "Default Colony".to_owned()
}

fn default_max_name_length() -> usize {
    100
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn empty_section_takes_defaults() {
        let cfg: EstateConfig = serde_json::from_str("{}").unwrap();

        assert!(cfg.allow_implicit_default_colony);
        assert_eq!(cfg.default_colony_name, "Default Colony");
        assert_eq!(cfg.max_name_length, 100);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_json::from_str::<EstateConfig>(r#"{"rls": true}"#).is_err());
    }
}
