//! Typed default configurations for each environment.
//!
//! Each environment (development, testnet, mainnet) gets a fully constructed
//! [`ConfigRaw`] via [`config_for`]. Shared defaults are factored into helper
//! functions to make it easy to see what differs between environments.

use super::{
    ConfigError, ConfigRaw,
    raw::{CleanupConfig, ManagersConfigRaw, MetricsConfig},
};
use crate::{
    controllers::http_api_controller::router::HttpApiConfig,
    logger::{LogFormat, LoggerConfig},
    managers::{chain::ChainManagerConfigRaw, repository::RepositoryManagerConfigRaw},
};

/// Returns the default [`ConfigRaw`] for the given environment name.
pub(crate) fn config_for(environment: &str) -> Result<ConfigRaw, ConfigError> {
    match environment {
        "development" => Ok(development()),
        "testnet" => Ok(testnet()),
        "mainnet" => Ok(mainnet()),
        _ => Err(ConfigError::UnknownEnvironment(environment.to_string())),
    }
}

// ── Shared defaults (identical across all environments) ─────────

fn http_api() -> HttpApiConfig {
    HttpApiConfig {
        enabled: true,
        port: 8080,
    }
}

fn cleanup() -> CleanupConfig {
    CleanupConfig {
        enabled: true,
        interval_secs: 3600,
    }
}

fn metrics(enabled: bool) -> MetricsConfig {
    MetricsConfig {
        enabled,
        bind_address: "127.0.0.1:9464".to_string(),
    }
}

// ── Parameterized helpers (shared structure, varying values) ────

fn repository(database: &str, max_connections: u32) -> RepositoryManagerConfigRaw {
    RepositoryManagerConfigRaw {
        user: "roundkeeper".to_string(),
        password: None,
        database: database.to_string(),
        host: "localhost".to_string(),
        port: 5432,
        max_connections,
        min_connections: 1,
    }
}

fn chain(
    rpc_endpoints: Vec<String>,
    contract_address: &str,
    poll_interval_secs: u64,
) -> ChainManagerConfigRaw {
    ChainManagerConfigRaw {
        rpc_endpoints,
        contract_address: contract_address.to_string(),
        poll_interval_secs,
    }
}

// ── Per-environment constructors ────────────────────────────────

fn development() -> ConfigRaw {
    ConfigRaw {
        environment: "development".to_string(),
        logger: LoggerConfig {
            level: "roundkeeper=trace".to_string(),
            format: LogFormat::Pretty,
        },
        metrics: metrics(true),
        http_api: http_api(),
        cleanup: cleanup(),
        managers: ManagersConfigRaw {
            repository: repository("roundkeeper_dev", 10),
            chain: chain(
                vec!["http://localhost:8545".to_string()],
                "0x5FbDB2315678afecb367f032d93F642f64180aa3",
                4,
            ),
        },
    }
}

fn testnet() -> ConfigRaw {
    ConfigRaw {
        environment: "testnet".to_string(),
        logger: LoggerConfig {
            level: "roundkeeper=info".to_string(),
            format: LogFormat::Pretty,
        },
        metrics: metrics(false),
        http_api: http_api(),
        cleanup: cleanup(),
        managers: ManagersConfigRaw {
            repository: repository("roundkeeper", 50),
            chain: chain(
                vec!["https://api.calibration.node.glif.io/rpc/v1".to_string()],
                "0x8460766Edc62B525fc1FA4D628FC79229dC73031",
                30,
            ),
        },
    }
}

fn mainnet() -> ConfigRaw {
    ConfigRaw {
        environment: "mainnet".to_string(),
        logger: LoggerConfig {
            level: "roundkeeper=info".to_string(),
            format: LogFormat::Pretty,
        },
        metrics: metrics(false),
        http_api: http_api(),
        cleanup: cleanup(),
        managers: ManagersConfigRaw {
            repository: repository("roundkeeper", 50),
            chain: chain(
                vec![
                    "https://api.node.glif.io/rpc/v0".to_string(),
                    "https://api.chain.love/rpc/v1".to_string(),
                ],
                "0xc524b83BF85021e674a7c9F18f5381179Fabaf6c",
                30,
            ),
        },
    }
}

#[cfg(test)]
mod tests {
    use figment::{Figment, providers::Serialized};

    use super::*;

    /// Verify that development defaults can round-trip through Figment.
    #[test]
    fn development_defaults_round_trip() {
        let config = config_for("development").expect("development defaults should resolve");
        let figment = Figment::from(Serialized::defaults(&config));
        let extracted: ConfigRaw = figment
            .extract()
            .expect("development defaults failed to extract");
        assert_eq!(extracted.environment, "development");
        assert_eq!(extracted.logger.level, "roundkeeper=trace");
        assert!(extracted.metrics.enabled);
        assert_eq!(extracted.managers.chain.poll_interval_secs, 4);
    }

    /// Verify that mainnet defaults can round-trip through Figment.
    #[test]
    fn mainnet_defaults_round_trip() {
        let config = config_for("mainnet").expect("mainnet defaults should resolve");
        let figment = Figment::from(Serialized::defaults(&config));
        let extracted: ConfigRaw = figment
            .extract()
            .expect("mainnet defaults failed to extract");
        assert_eq!(extracted.environment, "mainnet");
        assert!(!extracted.metrics.enabled);
        assert_eq!(extracted.managers.chain.rpc_endpoints.len(), 2);
    }

    /// Verify that user TOML overrides merge correctly on top of typed defaults.
    #[test]
    fn user_toml_overrides_defaults() {
        use figment::providers::{Format, Toml};

        let defaults = config_for("development").expect("development defaults should resolve");
        let user_toml = r#"
            environment = "development"
            [managers.repository]
            max_connections = 50
        "#;
        let figment = Figment::from(Serialized::defaults(&defaults)).merge(Toml::string(user_toml));
        let config: ConfigRaw = figment.extract().expect("merge failed");
        assert_eq!(config.managers.repository.max_connections, 50);
        // Other defaults should be preserved
        assert_eq!(config.http_api.port, 8080);
        assert_eq!(config.managers.repository.user, "roundkeeper");
    }

    #[test]
    fn unknown_environment_returns_error() {
        let error = config_for("staging").expect_err("unknown env should fail");
        assert!(matches!(error, ConfigError::UnknownEnvironment(env) if env == "staging"));
    }
}
