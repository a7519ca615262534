mod config;
mod context;
mod controllers;
mod error;
mod logger;
mod managers;
mod periodic;
mod rounds;
mod runtime;

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::{
    context::Context,
    controllers::http_api_controller::router::HttpApiRouter,
    managers::{chain::ChainManager, repository::RepositoryManager},
    rounds::{
        mapper::RoundMapper,
        watcher::{CurrentRoundCell, RoundAdvance, RoundWatcher},
    },
};

/// Buffer size for the round-advance channel. Events are rare (one per
/// on-chain round) so a small buffer is plenty.
const ROUND_ADVANCE_CHANNEL_CAPACITY: usize = 16;

pub async fn run() {
    // Install rustls crypto provider before any TLS connections
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let config = config::initialize_configuration();
    logger::initialize(&config.logger, &config.metrics);

    display_roundkeeper_ascii_art();

    let repository_manager = Arc::new(
        RepositoryManager::connect(&config.managers.repository)
            .await
            .expect("Failed to connect to the database"),
    );

    let chain_manager = Arc::new(
        ChainManager::connect(&config.managers.chain)
            .await
            .expect("Failed to initialize chain manager"),
    );

    let current_round = CurrentRoundCell::new();
    let (round_tx, round_rx) = mpsc::channel::<RoundAdvance>(ROUND_ADVANCE_CHANNEL_CAPACITY);

    let mapper = RoundMapper::new(repository_manager.connection());
    let watcher = RoundWatcher::new(mapper, current_round.clone(), round_rx);

    // Synchronize with the chain before any events arrive, so the current
    // round is served as soon as the watcher processes this first advance.
    let initial_round_index = chain_manager
        .current_round_index()
        .await
        .expect("Failed to query current round index");
    round_tx
        .send(RoundAdvance {
            contract_address: chain_manager.contract_address().to_string(),
            round_index: initial_round_index,
        })
        .await
        .expect("Round advance channel closed during startup");

    let context = Arc::new(Context::new(
        Arc::clone(&repository_manager),
        current_round,
    ));

    let http_router = config
        .http_api
        .enabled
        .then(|| HttpApiRouter::new(&config.http_api, &context));

    runtime::run(
        watcher,
        round_tx,
        chain_manager,
        repository_manager,
        config.chain_poll_interval(),
        config.cleanup.clone(),
        http_router,
    )
    .await;
}

fn display_roundkeeper_ascii_art() {
    tracing::info!("██████╗  ██████╗ ██╗   ██╗███╗   ██╗██████╗ ");
    tracing::info!("██╔══██╗██╔═══██╗██║   ██║████╗  ██║██╔══██╗");
    tracing::info!("██████╔╝██║   ██║██║   ██║██╔██╗ ██║██║  ██║");
    tracing::info!("██╔══██╗██║   ██║██║   ██║██║╚██╗██║██║  ██║");
    tracing::info!("██║  ██║╚██████╔╝╚██████╔╝██║ ╚████║██████╔╝");
    tracing::info!("╚═╝  ╚═╝ ╚═════╝  ╚═════╝ ╚═╝  ╚═══╝╚═════╝ ");

    tracing::info!("======================================================");
    tracing::info!("             Roundkeeper v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("======================================================");
    let environment = config::current_env();
    tracing::info!("Node is running in {} environment", environment);
}
