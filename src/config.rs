//! Configuration module
//!
//! TOML file, one table per concern. Every table and key has a default, so a
//! partial file is valid. A missing file is created with the defaults on
//! first load.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::infrastructure::crypto::password::DEFAULT_HASH_COST;
use crate::infrastructure::DatabaseConfig;

pub const CONFIG_ENV: &str = "CLINIC_CONFIG";
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

const APP_DIR: &str = "clinic-service";
const VALID_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSection,
    pub database: DatabaseSection,
    pub security: SecuritySection,
    pub admin: AdminSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerSection {
    pub api_host: String,
    pub api_port: u16,
    /// Seconds to wait for in-flight requests after a shutdown signal
    pub shutdown_timeout: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            api_host: "0.0.0.0".to_string(),
            api_port: 8080,
            shutdown_timeout: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        let db = DatabaseConfig::default();
        Self {
            url: db.url,
            max_connections: db.max_connections,
            min_connections: db.min_connections,
            connect_timeout_secs: db.connect_timeout_secs,
        }
    }
}

impl DatabaseSection {
    pub fn connection_url(&self) -> String {
        self.url.clone()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SecuritySection {
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    /// bcrypt cost, 4..=31
    pub password_hash_cost: u32,
}

impl Default for SecuritySection {
    fn default() -> Self {
        Self {
            jwt_secret: JwtConfig::default().secret,
            jwt_expiration_hours: 24,
            password_hash_cost: DEFAULT_HASH_COST,
        }
    }
}

/// Seed account created when the users table is empty
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AdminSection {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl Default for AdminSection {
    fn default() -> Self {
        Self {
            email: "admin@clinic.local".to_string(),
            password: "admin12345".to_string(),
            first_name: "System".to_string(),
            last_name: "Administrator".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
    /// `text` or `json`
    pub format: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

/// `<config_dir>/clinic-service/config.toml`, or `./config.toml` when the
/// platform has no config directory.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("config.toml")
}

impl AppConfig {
    /// Load from `path`, writing defaults there first if the file is missing.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let config = Self::default();
            config.save(path)?;
            return Ok(config);
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `DATABASE_URL` replaces the configured database URL.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(DATABASE_URL_ENV) {
            if !url.is_empty() {
                self.database.url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.api_port == 0 {
            return Err(ConfigError::Invalid("server.api_port cannot be 0".into()));
        }
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Invalid("database.url cannot be empty".into()));
        }
        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::Invalid(format!(
                "database.min_connections ({}) exceeds max_connections ({})",
                self.database.min_connections, self.database.max_connections
            )));
        }
        if self.security.jwt_secret.is_empty() {
            return Err(ConfigError::Invalid("security.jwt_secret cannot be empty".into()));
        }
        if self.security.jwt_expiration_hours <= 0 {
            return Err(ConfigError::Invalid(
                "security.jwt_expiration_hours must be positive".into(),
            ));
        }
        if !(4..=31).contains(&self.security.password_hash_cost) {
            return Err(ConfigError::Invalid(format!(
                "security.password_hash_cost must be 4-31, got {}",
                self.security.password_hash_cost
            )));
        }
        if !VALID_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                VALID_LEVELS.join(", ")
            )));
        }
        if !matches!(self.logging.format.to_lowercase().as_str(), "text" | "json") {
            return Err(ConfigError::Invalid(format!(
                "Invalid log format '{}'. Must be text or json",
                self.logging.format
            )));
        }
        Ok(())
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database.connection_url(),
            max_connections: self.database.max_connections,
            min_connections: self.database.min_connections,
            connect_timeout_secs: self.database.connect_timeout_secs,
        }
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig {
            secret: self.security.jwt_secret.clone(),
            expiration_hours: self.security.jwt_expiration_hours,
            ..JwtConfig::default()
        }
    }

    pub fn api_address(&self) -> String {
        format!("{}:{}", self.server.api_host, self.server.api_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("clinic-config-{}", uuid::Uuid::new_v4()))
            .join("config.toml")
    }

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.api_port, 8080);
        assert_eq!(config.admin.email, "admin@clinic.local");
        assert_eq!(config.security.password_hash_cost, 10);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [server]
            api_port = 9090

            [logging]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.api_port, 9090);
        assert_eq!(config.server.api_host, "0.0.0.0");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.database, DatabaseSection::default());
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        assert!(matches!(
            AppConfig::from_toml("[server\napi_port = 1"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.logging.level = "loud".into();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.security.password_hash_cost = 2;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.database.min_connections = 20;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_is_created_with_defaults() {
        let path = scratch_path();
        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded, AppConfig::default());
        assert!(path.exists());

        let mut changed = loaded.clone();
        changed.server.api_port = 7000;
        changed.save(&path).unwrap();
        assert_eq!(AppConfig::load(&path).unwrap().server.api_port, 7000);

        if let Some(dir) = path.parent() {
            let _ = fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn derived_configs_follow_sections() {
        let mut config = AppConfig::default();
        config.security.jwt_expiration_hours = 2;
        config.database.max_connections = 3;

        assert_eq!(config.jwt_config().expiration_hours, 2);
        assert_eq!(config.jwt_config().issuer, "clinic-service");
        assert_eq!(config.database_config().max_connections, 3);
        assert_eq!(config.api_address(), "0.0.0.0:8080");
    }

    #[test]
    fn default_path_ends_in_app_dir() {
        let path = default_config_path();
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("config.toml"));
    }
}
