use std::time::Duration;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Chain manager configuration.
///
/// The round contract is identified by its address; all access is read-only
/// so no wallet material is required.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct ChainManagerConfigRaw {
    /// HTTP JSON-RPC endpoints, tried in failover order.
    pub rpc_endpoints: Vec<String>,
    /// Address of the round contract.
    pub contract_address: String,
    /// How often to poll for RoundStart events, in seconds.
    pub poll_interval_secs: u64,
}

impl ChainManagerConfigRaw {
    pub(crate) fn resolve(self) -> Result<ChainManagerConfig, ConfigError> {
        if self.rpc_endpoints.is_empty() {
            return Err(ConfigError::InvalidValue(
                "at least one RPC endpoint is required".to_string(),
            ));
        }

        let contract_address = self.contract_address.parse::<Address>().map_err(|_| {
            ConfigError::InvalidValue(format!(
                "invalid contract address: {}",
                self.contract_address
            ))
        })?;

        Ok(ChainManagerConfig {
            rpc_endpoints: self.rpc_endpoints,
            contract_address,
            poll_interval: Duration::from_secs(self.poll_interval_secs),
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ChainManagerConfig {
    pub rpc_endpoints: Vec<String>,
    pub contract_address: Address,
    pub poll_interval: Duration,
}
