use std::sync::Arc;

use crate::{managers::repository::RepositoryManager, rounds::watcher::CurrentRoundCell};

/// Shared state handed to the HTTP controllers.
pub(crate) struct Context {
    repository_manager: Arc<RepositoryManager>,
    current_round: CurrentRoundCell,
}

impl Context {
    pub(crate) fn new(
        repository_manager: Arc<RepositoryManager>,
        current_round: CurrentRoundCell,
    ) -> Self {
        Self {
            repository_manager,
            current_round,
        }
    }

    pub(crate) fn repository_manager(&self) -> &Arc<RepositoryManager> {
        &self.repository_manager
    }

    pub(crate) fn current_round(&self) -> &CurrentRoundCell {
        &self.current_round
    }
}
