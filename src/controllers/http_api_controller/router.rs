use std::{
    net::{Ipv4Addr, SocketAddr},
    sync::Arc,
};

use axum::{
    Router,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tokio::{
    net::TcpListener,
    sync::{Mutex, oneshot},
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use super::v1::{
    eligible_item_http_api_controller::EligibleItemHttpApiController,
    info_http_api_controller::InfoHttpApiController,
    round_http_api_controller::RoundHttpApiController,
};
use crate::context::Context;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct HttpApiConfig {
    /// Whether the HTTP API server is enabled.
    pub enabled: bool,
    pub port: u16,
}

pub(crate) struct HttpApiRouter {
    config: HttpApiConfig,
    router: Arc<Mutex<Router>>,
}

/// Maximum request body size in bytes (10 MB)
const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

impl HttpApiRouter {
    pub(crate) fn new(config: &HttpApiConfig, context: &Arc<Context>) -> Self {
        // Build the base router with routes and state
        let mut router = Router::new()
            .route("/v1/info", get(InfoHttpApiController::handle_request))
            .route(
                "/v1/rounds/current",
                get(RoundHttpApiController::handle_current),
            )
            .route(
                "/v1/rounds/{round_id}",
                get(RoundHttpApiController::handle_by_id),
            )
            .route(
                "/v1/rounds/external/{address}/{external_round}",
                get(RoundHttpApiController::handle_by_external),
            )
            .route(
                "/v1/eligible-items",
                post(EligibleItemHttpApiController::handle_request),
            )
            .with_state(Arc::clone(context));

        // Layer order (bottom-to-top, last added runs first):
        // 1. Body size limit
        // 2. Request tracing
        // 3. CORS (outermost)

        router = router.layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE));
        tracing::info!("Request body limit: {} MB", MAX_BODY_SIZE / (1024 * 1024));

        router = router.layer(TraceLayer::new_for_http());
        tracing::info!("Request tracing enabled");

        router = router.layer(CorsLayer::permissive());

        HttpApiRouter {
            config: config.to_owned(),
            router: Arc::new(Mutex::new(router)),
        }
    }

    pub(crate) async fn listen_and_handle_http_requests(&self, shutdown_rx: oneshot::Receiver<()>) {
        let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.config.port));

        let cloned_router_for_serve = self.router.lock().await.clone();

        let listener = TcpListener::bind(addr)
            .await
            .expect("Failed to bind HTTP listener");

        axum::serve(listener, cloned_router_for_serve)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
                tracing::info!("HTTP server shutting down gracefully");
            })
            .await
            .expect("Server failed");
    }
}
