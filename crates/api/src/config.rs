//! Process configuration: optional YAML file, then `POLARIS_*` environment overrides.

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use polaris_infra::services::SeedAdmin;

pub const DEFAULT_CONFIG_FILE: &str = "env.yaml";
const DEV_JWT_SECRET: &str = "polaris-dev-secret";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Mongo,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    #[serde(default = "default_mongo_uri")]
    pub connection_string: String,
    #[serde(default = "default_mongo_db")]
    pub database: String,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self { connection_string: default_mongo_uri(), database: default_mongo_db() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default = "default_ttl_minutes")]
    pub ttl_minutes: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self { secret: None, ttl_minutes: default_ttl_minutes() }
    }
}

impl JwtConfig {
    /// A missing secret falls back to a fixed development value.
    pub fn secret_or_dev_default(&self) -> String {
        match self.secret.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => {
                tracing::warn!("jwt.secret not set; using insecure dev default");
                DEV_JWT_SECRET.to_string()
            }
        }
    }

    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.ttl_minutes.max(1))
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SeedConfig {
    #[serde(default)]
    pub super_admins: Vec<SeedAdmin>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: String,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub mongo: MongoConfig,
    #[serde(default)]
    pub jwt: JwtConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

fn default_env() -> String {
    "development".to_string()
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_mongo_uri() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_mongo_db() -> String {
    "polaris".to_string()
}

fn default_ttl_minutes() -> i64 {
    720
}

impl AppConfig {
    /// Reads `POLARIS_CONFIG` (default `env.yaml`) if present, then the environment.
    pub fn load() -> Result<Self, config::ConfigError> {
        let path = std::env::var("POLARIS_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Config::builder()
            .add_source(File::new(&path, FileFormat::Yaml).required(false))
            .add_source(
                Environment::with_prefix("POLARIS")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Parse from YAML text alone.
    pub fn from_yaml(yaml: &str) -> Result<Self, config::ConfigError> {
        Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_an_empty_document() {
        let cfg = AppConfig::from_yaml("{}").unwrap();
        assert_eq!(cfg.env, "development");
        assert_eq!(cfg.listen_addr, "0.0.0.0:8080");
        assert_eq!(cfg.storage.backend, StorageBackend::Memory);
        assert_eq!(cfg.jwt.ttl_minutes, 720);
        assert!(cfg.seed.super_admins.is_empty());
    }

    #[test]
    fn yaml_sections_are_read() {
        let cfg = AppConfig::from_yaml(
            r#"
storage:
  backend: mongo
mongo:
  connection_string: mongodb://db:27017
  database: polaris_test
jwt:
  secret: s3cret
  ttl_minutes: 30
seed:
  super_admins:
    - email: root@polaris.test
      password: change-me-now
"#,
        )
        .unwrap();
        assert_eq!(cfg.storage.backend, StorageBackend::Mongo);
        assert_eq!(cfg.mongo.database, "polaris_test");
        assert_eq!(cfg.jwt.secret_or_dev_default(), "s3cret");
        assert_eq!(cfg.jwt.ttl(), chrono::Duration::minutes(30));
        assert_eq!(cfg.seed.super_admins[0].email, "root@polaris.test");
    }

    #[test]
    fn blank_secret_uses_dev_default() {
        let jwt = JwtConfig { secret: Some("  ".into()), ttl_minutes: 5 };
        assert_eq!(jwt.secret_or_dev_default(), DEV_JWT_SECRET);
    }
}
