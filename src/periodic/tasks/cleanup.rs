//! Expired eligible-item cleanup periodic task.

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::{
    config::CleanupConfig, error::NodeError, managers::repository::RepositoryManager,
    periodic::runner::run_with_shutdown,
};

pub(crate) struct CleanupTask {
    repository_manager: Arc<RepositoryManager>,
    interval: Duration,
}

impl CleanupTask {
    pub(crate) fn new(repository_manager: Arc<RepositoryManager>, config: &CleanupConfig) -> Self {
        Self {
            repository_manager,
            interval: Duration::from_secs(config.interval_secs),
        }
    }

    pub(crate) async fn run(self, shutdown: CancellationToken) {
        run_with_shutdown("cleanup", shutdown, || self.execute()).await;
    }

    async fn execute(&self) -> Duration {
        match self.delete_expired_items().await {
            Ok(0) => {}
            Ok(deleted) => {
                tracing::info!(deleted, "Removed expired eligible items");
            }
            Err(error) => {
                tracing::error!(error = %error, "Eligible item cleanup failed");
            }
        }

        self.interval
    }

    async fn delete_expired_items(&self) -> Result<u64, NodeError> {
        Ok(self
            .repository_manager
            .eligible_item_repository()
            .delete_expired(Utc::now())
            .await?)
    }
}
