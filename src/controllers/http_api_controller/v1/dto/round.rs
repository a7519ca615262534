use sea_orm::prelude::DateTimeUtc;
use serde::Serialize;

use crate::managers::repository::{RoundRecord, TaskRecord};

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CurrentRoundResponse {
    pub internal_round: i64,
    pub contract_address: String,
    pub external_round: i64,
}

impl CurrentRoundResponse {
    pub(crate) fn new(internal_round: i64, contract_address: String, external_round: i64) -> Self {
        Self {
            internal_round,
            contract_address,
            external_round,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TaskResponse {
    pub content_id: String,
    pub protocol: Option<String>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RoundResponse {
    pub id: i64,
    pub created_at: DateTimeUtc,
    pub external_address: String,
    pub external_round: i64,
    pub max_tasks_per_node: i32,
    pub tasks: Vec<TaskResponse>,
}

impl RoundResponse {
    pub(crate) fn new(round: RoundRecord, tasks: Vec<TaskRecord>) -> Self {
        Self {
            id: round.id,
            created_at: round.created_at,
            external_address: round.external_address,
            external_round: round.external_round,
            max_tasks_per_node: round.max_tasks_per_node,
            tasks: tasks
                .into_iter()
                .map(|task| TaskResponse {
                    content_id: task.content_id,
                    protocol: task.protocol,
                })
                .collect(),
        }
    }
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RoundErrorResponse {
    pub message: String,
}

impl RoundErrorResponse {
    pub(crate) fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn round_response_serializes_camel_case_with_tasks() {
        let response = RoundResponse::new(
            RoundRecord {
                id: 7,
                created_at: Utc::now(),
                external_address: "0x1a".to_string(),
                external_round: 120,
                max_tasks_per_node: 15,
            },
            vec![TaskRecord {
                content_id: "bafyone".to_string(),
                protocol: None,
            }],
        );

        let json = serde_json::to_value(&response).expect("serialization failed");
        assert_eq!(json["externalAddress"], "0x1a");
        assert_eq!(json["externalRound"], 120);
        assert_eq!(json["maxTasksPerNode"], 15);
        assert_eq!(json["tasks"][0]["contentId"], "bafyone");
        assert!(json["tasks"][0]["protocol"].is_null());
    }
}
