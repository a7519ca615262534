use axum::Json;

use crate::controllers::http_api_controller::v1::dto::info::InfoResponse;

pub(crate) struct InfoHttpApiController;

impl InfoHttpApiController {
    pub(crate) async fn handle_request() -> Json<InfoResponse> {
        Json(InfoResponse::new(env!("CARGO_PKG_VERSION")))
    }
}
