use chrono::Utc;
use sea_orm::DatabaseTransaction;

use crate::{
    managers::repository::{
        RepositoryError, TaskRecord,
        repositories::{EligibleItemRepository, RoundRepository, TaskRepository},
    },
    rounds::{MAX_TASKS_PER_NODE, TASKS_PER_ROUND},
};

/// Idempotently creates a round row and its task set.
///
/// The conflict-free round insert decides which caller provisions: only the
/// transaction that actually created the row samples tasks, so each internal
/// round number gets exactly one task-population pass no matter how many
/// duplicate notifications or racing mappers observe it.
pub(crate) struct RoundProvisioner;

impl RoundProvisioner {
    pub(crate) fn new() -> Self {
        Self
    }

    /// Creates the round and samples its tasks unless the round already
    /// exists. Runs entirely on the caller's transaction.
    pub(crate) async fn ensure_round_exists(
        &self,
        txn: &DatabaseTransaction,
        internal_round: i64,
        contract_address: &str,
        external_round: i64,
    ) -> Result<(), RepositoryError> {
        let now = Utc::now();

        let created = RoundRepository::insert_if_absent(
            txn,
            internal_round,
            contract_address,
            external_round,
            MAX_TASKS_PER_NODE,
            now,
        )
        .await?;

        if !created {
            return Ok(());
        }

        let items = EligibleItemRepository::sample_eligible(txn, now, TASKS_PER_ROUND).await?;

        // Fewer eligible items than TASKS_PER_ROUND simply yields a smaller
        // task set
        let tasks: Vec<TaskRecord> = items
            .into_iter()
            .map(|item| TaskRecord {
                content_id: item.content_id,
                protocol: item.protocol,
            })
            .collect();

        let task_count = TaskRepository::insert_for_round(txn, internal_round, tasks).await?;

        tracing::info!(
            internal_round,
            task_count,
            "Provisioned new round with sampled tasks"
        );

        Ok(())
    }
}
