//! Server configuration: YAML file merged with `ESTATE__` environment variables.

use std::path::Path;

use anyhow::{Context, bail};
use estate::EstateConfig;
use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use serde::Deserialize;
use static_authn_plugin::StaticAuthNPluginConfig;

/// Environment prefix; `__` separates nested keys (`ESTATE__DATABASE__URL`).
pub const ENV_PREFIX: &str = "ESTATE__";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub estate: EstateConfig,
    #[serde(default)]
    pub authn: StaticAuthNPluginConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8087".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Connection URL, e.g. `sqlite://estate.db?mode=rwc` or `postgres://...`.
    pub url: String,
    pub max_conns: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_conns: 5,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Emit JSON lines instead of the human-readable format.
    pub json: bool,
}

impl AppConfig {
    /// Layered providers: optional YAML file, then environment overrides.
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::new();
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load and validate the configuration.
    ///
    /// # Errors
    ///
    /// Fails when the file does not exist, a key is unknown or malformed, or a
    /// required key is missing.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = path
            && !path.exists()
        {
            bail!("config file {} does not exist", path.display());
        }
        Self::from_figment(&Self::figment(path))
    }

    /// # Errors
    ///
    /// Fails on extraction or validation errors.
    pub fn from_figment(figment: &Figment) -> anyhow::Result<Self> {
        let cfg: Self = figment
            .extract()
            .context("failed to parse configuration")?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.database.url.trim().is_empty() {
            bail!("missing required configuration key `database.url` (env {ENV_PREFIX}DATABASE__URL)");
        }
        if self.database.max_conns == 0 {
            bail!("`database.max_conns` must be at least 1");
        }
        if self.server.bind_addr.trim().is_empty() {
            bail!("missing required configuration key `server.bind_addr`");
        }
        Ok(())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::io::Write;

    fn yaml_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn full_file_is_loaded() {
        let file = yaml_file(
            r#"
server:
  bind_addr: "0.0.0.0:9000"
database:
  url: "sqlite::memory:"
  max_conns: 1
logging:
  json: true
estate:
  default_colony_name: "Green Acres"
authn:
  mode: static_tokens
  tokens:
    - token: "mgr"
      identity:
        subject_id: "22222222-0000-4000-8000-000000000002"
        email: "mgr@estate.local"
"#,
        );

        let cfg = AppConfig::from_figment(&Figment::new().merge(Yaml::file(file.path()))).unwrap();

        assert_eq!(cfg.server.bind_addr, "0.0.0.0:9000");
        assert_eq!(cfg.database.max_conns, 1);
        assert!(cfg.logging.json);
        assert_eq!(cfg.estate.default_colony_name, "Green Acres");
        assert!(cfg.estate.allow_implicit_default_colony);
        assert_eq!(cfg.authn.tokens.len(), 1);
        assert_eq!(cfg.authn.tokens[0].token, "mgr");
    }

    #[test]
    fn missing_database_url_is_reported() {
        let file = yaml_file("server:\n  bind_addr: \"127.0.0.1:1\"\n");

        let err = AppConfig::from_figment(&Figment::new().merge(Yaml::file(file.path())))
            .unwrap_err();

        assert!(err.to_string().contains("database.url"), "{err}");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let file = yaml_file("database:\n  url: \"sqlite::memory:\"\n  pool: 3\n");

        assert!(AppConfig::from_figment(&Figment::new().merge(Yaml::file(file.path()))).is_err());
    }

    #[test]
    fn nonexistent_file_is_an_error() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/estate.yaml"))).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
