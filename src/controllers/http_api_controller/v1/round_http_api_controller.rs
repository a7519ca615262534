use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use hyper::StatusCode;

use crate::{
    context::Context,
    controllers::http_api_controller::v1::dto::round::{
        CurrentRoundResponse, RoundErrorResponse, RoundResponse,
    },
    managers::repository::RoundRecord,
};

pub(crate) struct RoundHttpApiController;

impl RoundHttpApiController {
    /// Returns the watcher's snapshot of the latest round. Before the first
    /// successful chain synchronization there is nothing to serve yet.
    pub(crate) async fn handle_current(State(context): State<Arc<Context>>) -> impl IntoResponse {
        match context.current_round().snapshot().await {
            Some(current) => (
                StatusCode::OK,
                Json(CurrentRoundResponse::new(
                    current.internal_round,
                    current.contract_address,
                    current.external_round,
                )),
            )
                .into_response(),
            None => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(RoundErrorResponse::new("Round tracking is not ready yet.")),
            )
                .into_response(),
        }
    }

    pub(crate) async fn handle_by_id(
        State(context): State<Arc<Context>>,
        Path(round_id): Path<i64>,
    ) -> impl IntoResponse {
        let round = match context
            .repository_manager()
            .round_repository()
            .find_round(round_id)
            .await
        {
            Ok(round) => round,
            Err(error) => {
                tracing::error!(round_id, error = %error, "Failed to look up round");
                return internal_error();
            }
        };

        Self::respond_with_round(&context, round).await
    }

    pub(crate) async fn handle_by_external(
        State(context): State<Arc<Context>>,
        Path((address, external_round)): Path<(String, i64)>,
    ) -> impl IntoResponse {
        let round = match context
            .repository_manager()
            .round_repository()
            .find_round_by_external(&address, external_round)
            .await
        {
            Ok(round) => round,
            Err(error) => {
                tracing::error!(
                    address = %address,
                    external_round,
                    error = %error,
                    "Failed to look up round by external pair"
                );
                return internal_error();
            }
        };

        Self::respond_with_round(&context, round).await
    }

    /// A round is served with its full task list or not at all; consumers
    /// never see a partial round object.
    async fn respond_with_round(
        context: &Arc<Context>,
        round: Option<RoundRecord>,
    ) -> axum::response::Response {
        let Some(round) = round else {
            return (
                StatusCode::NOT_FOUND,
                Json(RoundErrorResponse::new("Round not found.")),
            )
                .into_response();
        };

        match context
            .repository_manager()
            .task_repository()
            .tasks_for_round(round.id)
            .await
        {
            Ok(tasks) => (StatusCode::OK, Json(RoundResponse::new(round, tasks))).into_response(),
            Err(error) => {
                tracing::error!(round_id = round.id, error = %error, "Failed to load round tasks");
                internal_error()
            }
        }
    }
}

fn internal_error() -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(RoundErrorResponse::new("Internal server error.")),
    )
        .into_response()
}
