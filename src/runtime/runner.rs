use std::{sync::Arc, time::Duration};

use tokio::{select, signal::unix::SignalKind, sync::mpsc};
use tokio_util::sync::CancellationToken;

use super::shutdown;
use crate::{
    config::CleanupConfig,
    controllers::http_api_controller::router::HttpApiRouter,
    managers::{chain::ChainManager, repository::RepositoryManager},
    periodic::{CleanupTask, RoundEventListenerTask},
    rounds::watcher::{RoundAdvance, RoundWatcher},
};

pub(crate) async fn run(
    watcher: RoundWatcher,
    round_tx: mpsc::Sender<RoundAdvance>,
    chain_manager: Arc<ChainManager>,
    repository_manager: Arc<RepositoryManager>,
    chain_poll_interval: Duration,
    cleanup_config: CleanupConfig,
    http_router: Option<HttpApiRouter>,
) {
    let periodic_shutdown = CancellationToken::new();

    // Create HTTP shutdown channel (oneshot for single signal)
    let (http_shutdown_tx, http_shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    // Spawn the watcher; it exits once every round-advance sender is dropped
    let watcher_task = tokio::task::spawn(async move { watcher.run().await });

    // Spawn the round event listener; it owns the remaining channel sender
    let listener =
        RoundEventListenerTask::new(Arc::clone(&chain_manager), round_tx, chain_poll_interval);
    let listener_shutdown = periodic_shutdown.clone();
    let listener_task = tokio::task::spawn(async move { listener.run(listener_shutdown).await });

    // Spawn the eligible-item cleanup task if enabled
    let cleanup_task = cleanup_config.enabled.then(|| {
        let cleanup = CleanupTask::new(Arc::clone(&repository_manager), &cleanup_config);
        let cleanup_shutdown = periodic_shutdown.clone();
        tokio::task::spawn(async move { cleanup.run(cleanup_shutdown).await })
    });

    // Spawn HTTP API task if enabled
    let handle_http_events_task = tokio::task::spawn(async move {
        if let Some(router) = http_router {
            router
                .listen_and_handle_http_requests(http_shutdown_rx)
                .await;
        } else {
            // HTTP API disabled - wait for shutdown signal
            let _ = http_shutdown_rx.await;
        }
    });

    // Wait for shutdown signal (SIGINT or SIGTERM)
    let ctrl_c = tokio::signal::ctrl_c();
    let mut sigterm = tokio::signal::unix::signal(SignalKind::terminate())
        .expect("Failed to install SIGTERM handler");

    select! {
        _ = ctrl_c => tracing::info!("Received SIGINT, initiating shutdown..."),
        _ = sigterm.recv() => tracing::info!("Received SIGTERM, initiating shutdown..."),
    }

    shutdown::graceful_shutdown(shutdown::ShutdownContext {
        periodic_shutdown,
        listener_task,
        cleanup_task,
        watcher_task,
        http_shutdown_tx,
        handle_http_events_task,
    })
    .await;
}
