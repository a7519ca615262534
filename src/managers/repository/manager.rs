use std::sync::Arc;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use crate::managers::repository::{
    config::RepositoryManagerConfig,
    error::RepositoryError,
    migrations::Migrator,
    repositories::{EligibleItemRepository, RoundRepository, TaskRepository},
};

pub(crate) struct RepositoryManager {
    conn: Arc<DatabaseConnection>,
    round_repository: RoundRepository,
    task_repository: TaskRepository,
    eligible_item_repository: EligibleItemRepository,
}

impl RepositoryManager {
    /// Creates a new RepositoryManager instance
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if:
    /// - Database connection fails (e.g. database missing, bad credentials)
    /// - Migrations fail
    pub(crate) async fn connect(
        config: &RepositoryManagerConfig,
    ) -> Result<Self, RepositoryError> {
        let mut opt = ConnectOptions::new(config.connection_string());
        opt.max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .sqlx_logging(true)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        // Establish connection to the specific database
        let conn = Arc::new(Database::connect(opt).await?);

        // Apply all pending migrations
        Migrator::up(conn.as_ref(), None).await?;

        Ok(Self::from_connection(conn))
    }

    /// Builds the manager around an already-migrated connection.
    pub(crate) fn from_connection(conn: Arc<DatabaseConnection>) -> Self {
        RepositoryManager {
            round_repository: RoundRepository::new(Arc::clone(&conn)),
            task_repository: TaskRepository::new(Arc::clone(&conn)),
            eligible_item_repository: EligibleItemRepository::new(Arc::clone(&conn)),
            conn,
        }
    }

    /// Raw connection handle for transaction-owning callers.
    pub(crate) fn connection(&self) -> Arc<DatabaseConnection> {
        Arc::clone(&self.conn)
    }

    pub(crate) fn round_repository(&self) -> RoundRepository {
        self.round_repository.clone()
    }

    pub(crate) fn task_repository(&self) -> TaskRepository {
        self.task_repository.clone()
    }

    pub(crate) fn eligible_item_repository(&self) -> EligibleItemRepository {
        self.eligible_item_repository.clone()
    }
}
