mod config;
mod contract;
mod error;

use alloy::{
    primitives::U256,
    providers::Provider,
    rpc::types::Filter,
    sol_types::SolEvent,
};

pub(crate) use config::{ChainManagerConfig, ChainManagerConfigRaw};
use contract::{ChainProvider, RoundRegistry, initialize_provider};
pub(crate) use error::ChainError;

/// Maximum number of blocks fetched per `eth_getLogs` request.
const MAXIMUM_NUMBERS_OF_BLOCKS_TO_FETCH: u64 = 50;

/// Read-only access to the round contract: the current round index view
/// call and `RoundStart` event logs.
pub(crate) struct ChainManager {
    provider: ChainProvider,
    contract_address: alloy::primitives::Address,
    contract_address_str: String,
}

impl ChainManager {
    /// Connects the provider stack and verifies chain reachability.
    pub(crate) async fn connect(config: &ChainManagerConfig) -> Result<Self, ChainError> {
        let provider = initialize_provider(&config.rpc_endpoints).await?;

        Ok(Self {
            provider,
            contract_address: config.contract_address,
            contract_address_str: config.contract_address.to_string(),
        })
    }

    /// The round contract identity as an opaque string.
    pub(crate) fn contract_address(&self) -> &str {
        &self.contract_address_str
    }

    pub(crate) async fn get_block_number(&self) -> Result<u64, ChainError> {
        Ok(self.provider.get_block_number().await?)
    }

    /// Queries the contract's current round index.
    pub(crate) async fn current_round_index(&self) -> Result<i64, ChainError> {
        let contract = RoundRegistry::new(self.contract_address, self.provider.clone());
        let index = contract.currentRoundIndex().call().await?;
        into_round_index(index)
    }

    /// Fetches `RoundStart` round indices between the given blocks, in log
    /// order. The span is split into bounded `eth_getLogs` batches.
    pub(crate) async fn fetch_round_start_events(
        &self,
        from_block: u64,
        current_block: u64,
    ) -> Result<Vec<i64>, ChainError> {
        let mut round_indices = Vec::new();

        let mut block = from_block;
        while block <= current_block {
            let to_block = std::cmp::min(
                block + MAXIMUM_NUMBERS_OF_BLOCKS_TO_FETCH - 1,
                current_block,
            );

            let filter = Filter::new()
                .address(self.contract_address)
                .event_signature(RoundRegistry::RoundStart::SIGNATURE_HASH)
                .from_block(block)
                .to_block(to_block);

            let logs = self.provider.get_logs(&filter).await?;

            for log in logs {
                match RoundRegistry::RoundStart::decode_log(log.as_ref()) {
                    Ok(decoded) => round_indices.push(into_round_index(decoded.data.roundIndex)?),
                    Err(error) => {
                        tracing::warn!(
                            block_number = log.block_number.unwrap_or_default(),
                            error = %error,
                            "Failed to decode RoundStart log"
                        );
                    }
                }
            }

            block = to_block + 1;
        }

        Ok(round_indices)
    }
}

fn into_round_index(value: U256) -> Result<i64, ChainError> {
    i64::try_from(value).map_err(|_| ChainError::RoundIndexOverflow(value.to_string()))
}
