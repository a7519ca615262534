use sea_orm::prelude::DateTimeUtc;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EligibleItemDto {
    pub content_id: String,
    #[serde(default)]
    pub protocol: Option<String>,
    pub expires_at: DateTimeUtc,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EligibleItemIngestResponse {
    pub ingested: usize,
}

impl EligibleItemIngestResponse {
    pub(crate) fn new(ingested: usize) -> Self {
        Self { ingested }
    }
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EligibleItemErrorResponse {
    pub message: String,
}

impl EligibleItemErrorResponse {
    pub(crate) fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}
