use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Repository manager configuration for database connections.
///
/// **Secret handling**: the database password should be provided via the
/// configuration file (resolved at config load time).
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct RepositoryManagerConfigRaw {
    pub user: String,
    pub password: Option<String>,
    pub database: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    pub min_connections: u32,
}

impl RepositoryManagerConfigRaw {
    pub(crate) fn resolve(self) -> Result<RepositoryManagerConfig, ConfigError> {
        let password = self.password.ok_or_else(|| {
            ConfigError::MissingSecret("database password required in configuration".to_string())
        })?;

        Ok(RepositoryManagerConfig {
            user: self.user,
            password,
            database: self.database,
            host: self.host,
            port: self.port,
            max_connections: self.max_connections,
            min_connections: self.min_connections,
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct RepositoryManagerConfig {
    pub user: String,
    pub password: String,
    pub database: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    pub min_connections: u32,
}

impl RepositoryManagerConfig {
    pub(crate) fn connection_string(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.database
        )
    }
}
