//! Repository configuration file support.
//!
//! Reads repository selection and Postgres connection settings from a
//! `repository.toml` file, as an alternative to environment variables.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::factory::RepositoryType;
use super::repository::RepositoryError;

/// Repository configuration from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub repository: RepositorySettings,
    #[serde(default)]
    pub postgres: PostgresSettings,
}

/// Repository type settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type")]
    pub repo_type: String,
}

/// Postgres connection settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostgresSettings {
    #[serde(default)]
    pub database_url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout: u64,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_idle_timeout() -> u64 {
    600
}

impl RepositoryConfig {
    /// Load repository configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!("Failed to read config file: {}", e))
        })?;

        let config: RepositoryConfig = toml::from_str(&content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })?;

        Ok(config)
    }

    /// Load repository configuration from the default location.
    ///
    /// Searches for `repository.toml` in the current directory and its
    /// parent.
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        let search_paths = vec![
            PathBuf::from("repository.toml"),
            PathBuf::from("../repository.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(RepositoryError::configuration(
            "No repository.toml found in standard locations",
        ))
    }

    /// Parse the configured repository type.
    pub fn repository_type(&self) -> Result<RepositoryType, String> {
        RepositoryType::from_str(&self.repository.repo_type)
    }

    /// Convert the `[postgres]` section into a connection configuration.
    ///
    /// Returns `Ok(None)` when no database URL is configured.
    #[cfg(feature = "postgres-repo")]
    pub fn to_postgres_config(
        &self,
    ) -> Result<Option<crate::db::PostgresConfig>, RepositoryError> {
        if self.postgres.database_url.is_empty() {
            return Ok(None);
        }

        Ok(Some(crate::db::PostgresConfig {
            database_url: self.postgres.database_url.clone(),
            max_pool_size: self.postgres.max_connections,
            min_pool_size: self.postgres.min_connections,
            connection_timeout_sec: self.postgres.connect_timeout,
            idle_timeout_sec: self.postgres.idle_timeout,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_local_config() {
        let config: RepositoryConfig = toml::from_str(
            r#"
            [repository]
            type = "local"
            "#,
        )
        .unwrap();
        assert_eq!(config.repository_type().unwrap(), RepositoryType::Local);
    }

    #[test]
    fn test_parse_postgres_config_with_defaults() {
        let config: RepositoryConfig = toml::from_str(
            r#"
            [repository]
            type = "postgres"

            [postgres]
            database_url = "postgres://localhost/films"
            "#,
        )
        .unwrap();
        assert_eq!(config.repository_type().unwrap(), RepositoryType::Postgres);
        assert_eq!(config.postgres.max_connections, 10);
        assert_eq!(config.postgres.connect_timeout, 30);
    }

    #[test]
    fn test_unknown_type_is_error() {
        let config: RepositoryConfig = toml::from_str(
            r#"
            [repository]
            type = "oracle"
            "#,
        )
        .unwrap();
        assert!(config.repository_type().is_err());
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let err = RepositoryConfig::from_file("/nonexistent/repository.toml").unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::ConfigurationError { .. }
        ));
    }
}
