use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    response::IntoResponse,
};
use hyper::StatusCode;

use crate::{
    context::Context,
    controllers::http_api_controller::v1::dto::eligible_item::{
        EligibleItemDto, EligibleItemErrorResponse, EligibleItemIngestResponse,
    },
    managers::repository::EligibleItemInput,
};

pub(crate) struct EligibleItemHttpApiController;

impl EligibleItemHttpApiController {
    /// Bulk-upserts items into the eligible-work-item pool.
    pub(crate) async fn handle_request(
        State(context): State<Arc<Context>>,
        Json(items): Json<Vec<EligibleItemDto>>,
    ) -> impl IntoResponse {
        if items.is_empty() {
            return (
                StatusCode::BAD_REQUEST,
                Json(EligibleItemErrorResponse::new("No items provided.")),
            )
                .into_response();
        }

        let inputs: Vec<EligibleItemInput> = items
            .into_iter()
            .map(|item| EligibleItemInput {
                content_id: item.content_id,
                protocol: item.protocol,
                expires_at: item.expires_at,
            })
            .collect();

        match context
            .repository_manager()
            .eligible_item_repository()
            .upsert_items(inputs)
            .await
        {
            Ok(ingested) => {
                (StatusCode::OK, Json(EligibleItemIngestResponse::new(ingested))).into_response()
            }
            Err(error) => {
                tracing::error!(error = %error, "Failed to ingest eligible items");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(EligibleItemErrorResponse::new("Internal server error.")),
                )
                    .into_response()
            }
        }
    }
}
