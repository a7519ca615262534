use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const PERIODIC_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(60);
const WATCHER_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);
const HTTP_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

pub(super) struct ShutdownContext {
    pub(super) periodic_shutdown: CancellationToken,
    pub(super) listener_task: JoinHandle<()>,
    pub(super) cleanup_task: Option<JoinHandle<()>>,
    pub(super) watcher_task: JoinHandle<()>,
    pub(super) http_shutdown_tx: tokio::sync::oneshot::Sender<()>,
    pub(super) handle_http_events_task: JoinHandle<()>,
}

pub(super) async fn graceful_shutdown(context: ShutdownContext) {
    // Ordered shutdown sequence:
    //
    // 1. Stop HTTP server (stop accepting new requests)
    // 2. Cancel periodic tasks (listener + cleanup finish their iteration)
    // 3. Wait for periodic tasks to exit; this drops the last round-advance
    //    sender
    // 4. Wait for the watcher to drain queued events and exit
    // 5. Wait for HTTP to finish in-flight requests
    let ShutdownContext {
        periodic_shutdown,
        mut listener_task,
        cleanup_task,
        mut watcher_task,
        http_shutdown_tx,
        mut handle_http_events_task,
    } = context;

    tracing::info!("Shutting down gracefully...");

    // Step 1: Signal HTTP server to stop accepting new connections
    let _ = http_shutdown_tx.send(());

    // Step 2: Cancel periodic tasks (they check the token between iterations)
    periodic_shutdown.cancel();

    // Step 3: Wait for periodic tasks to finish their current iteration
    wait_for_shutdown_task(
        "round_event_listener",
        PERIODIC_SHUTDOWN_TIMEOUT,
        &mut listener_task,
        true,
    )
    .await;

    if let Some(mut cleanup_task) = cleanup_task {
        wait_for_shutdown_task(
            "cleanup",
            PERIODIC_SHUTDOWN_TIMEOUT,
            &mut cleanup_task,
            true,
        )
        .await;
    }

    // Step 4: The watcher exits once the listener (the last sender) is gone
    wait_for_shutdown_task(
        "round_watcher",
        WATCHER_SHUTDOWN_TIMEOUT,
        &mut watcher_task,
        true,
    )
    .await;

    // Step 5: Wait for HTTP server to finish in-flight requests
    wait_for_shutdown_task(
        "http_server",
        HTTP_SHUTDOWN_TIMEOUT,
        &mut handle_http_events_task,
        false,
    )
    .await;

    tracing::info!("Shutdown complete");
}

async fn wait_for_shutdown_task(
    task: &str,
    timeout: Duration,
    handle: &mut JoinHandle<()>,
    abort_on_timeout: bool,
) {
    match tokio::time::timeout(timeout, &mut *handle).await {
        Ok(Ok(())) => {}
        Ok(Err(error)) => tracing::error!(
            task,
            error = ?error,
            "Shutdown task panicked"
        ),
        Err(_) if abort_on_timeout => {
            tracing::warn!(
                task,
                timeout_secs = timeout.as_secs(),
                "Shutdown timeout reached, aborting task"
            );
            handle.abort();
            let _ = handle.await;
        }
        Err(_) => tracing::warn!(
            task,
            timeout_secs = timeout.as_secs(),
            "Shutdown timeout reached"
        ),
    }
}
