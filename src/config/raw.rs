use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    config::ConfigError,
    controllers::http_api_controller::router::HttpApiConfig,
    logger::LoggerConfig,
    managers::{
        chain::{ChainManagerConfig, ChainManagerConfigRaw},
        repository::{RepositoryManagerConfig, RepositoryManagerConfigRaw},
    },
};

/// Prometheus metrics exporter configuration.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct MetricsConfig {
    /// Whether to expose Prometheus metrics.
    pub enabled: bool,
    /// Bind address for the Prometheus metrics endpoint.
    pub bind_address: String,
}

/// Expired eligible-item cleanup configuration.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct CleanupConfig {
    pub enabled: bool,
    pub interval_secs: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct ManagersConfigRaw {
    pub repository: RepositoryManagerConfigRaw,
    pub chain: ChainManagerConfigRaw,
}

impl ManagersConfigRaw {
    fn resolve(self) -> Result<ManagersConfig, ConfigError> {
        Ok(ManagersConfig {
            repository: self.repository.resolve()?,
            chain: self.chain.resolve()?,
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ManagersConfig {
    pub repository: RepositoryManagerConfig,
    pub chain: ChainManagerConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct ConfigRaw {
    pub environment: String,
    pub managers: ManagersConfigRaw,
    pub http_api: HttpApiConfig,
    pub cleanup: CleanupConfig,
    pub logger: LoggerConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub managers: ManagersConfig,
    pub http_api: HttpApiConfig,
    pub cleanup: CleanupConfig,
    pub logger: LoggerConfig,
    pub metrics: MetricsConfig,
}

impl ConfigRaw {
    pub(crate) fn resolve(self) -> Result<Config, ConfigError> {
        Ok(Config {
            managers: self.managers.resolve()?,
            http_api: self.http_api,
            cleanup: self.cleanup,
            logger: self.logger,
            metrics: self.metrics,
        })
    }
}

impl Config {
    pub(crate) fn chain_poll_interval(&self) -> Duration {
        self.managers.chain.poll_interval
    }
}
