use sea_orm::prelude::DateTimeUtc;

/// Round metadata as served to API consumers.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RoundRecord {
    pub id: i64,
    pub created_at: DateTimeUtc,
    pub external_address: String,
    pub external_round: i64,
    pub max_tasks_per_node: i32,
}

/// A single work item bound to a round.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TaskRecord {
    pub content_id: String,
    pub protocol: Option<String>,
}

/// Input for eligible-item pool ingestion.
#[derive(Debug, Clone)]
pub(crate) struct EligibleItemInput {
    pub content_id: String,
    pub protocol: Option<String>,
    pub expires_at: DateTimeUtc,
}
