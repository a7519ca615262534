use std::num::NonZeroUsize;

use alloy::{
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::client::RpcClient,
    transports::{
        BoxTransport, IntoBoxTransport,
        http::{Http, reqwest::Url},
        layers::FallbackLayer,
    },
};
use tower::ServiceBuilder;

use crate::managers::chain::error::ChainError;

/// Type-erased provider, cheap to clone and thread-safe.
pub(crate) type ChainProvider = DynProvider;

#[allow(clippy::too_many_arguments)]
pub(crate) mod round_registry {
    use alloy::sol;

    sol!(
        #[derive(Debug)]
        #[sol(rpc)]
        RoundRegistry,
        "abi/RoundRegistry.json"
    );
}

pub(crate) use round_registry::RoundRegistry;

/// Creates a read-only provider over the given HTTP RPC endpoints with
/// automatic failover.
pub(crate) async fn initialize_provider(
    rpc_endpoints: &[String],
) -> Result<ChainProvider, ChainError> {
    let mut transports: Vec<BoxTransport> = Vec::new();
    let mut valid_endpoints = Vec::new();

    for endpoint in rpc_endpoints {
        match endpoint.parse::<Url>() {
            Ok(url) => {
                transports.push(Http::new(url).into_box_transport());
                valid_endpoints.push(endpoint.clone());
                tracing::debug!("HTTP RPC endpoint added: {}", endpoint);
            }
            Err(e) => {
                tracing::warn!("Invalid RPC URL '{}': {}", endpoint, e);
            }
        }
    }

    if transports.is_empty() {
        return Err(ChainError::RpcConnectionFailed {
            attempts: rpc_endpoints.len(),
        });
    }

    // Configure fallback layer:
    // - Queries 1 transport at a time (pure failover, no parallel requests)
    // - Automatically ranks by latency + success rate
    // - Falls back to next transport only on failure
    let fallback_layer = FallbackLayer::default().with_active_transport_count(NonZeroUsize::MIN);

    let transport = ServiceBuilder::new()
        .layer(fallback_layer)
        .service(transports);

    let client = RpcClient::builder().transport(transport, false);

    let provider = ProviderBuilder::new().connect_client(client);

    // Verify connectivity
    match provider.get_block_number().await {
        Ok(block) => {
            tracing::info!(
                "Chain provider initialized with {} RPC endpoints (block: {}): {:?}",
                valid_endpoints.len(),
                block,
                valid_endpoints
            );
            Ok(provider.erased())
        }
        Err(e) => {
            tracing::error!("All RPC endpoints failed connectivity check: {}", e);
            Err(ChainError::RpcConnectionFailed {
                attempts: valid_endpoints.len(),
            })
        }
    }
}
