use std::{sync::Arc, time::Instant};

use sea_orm::{
    ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    prelude::DateTimeUtc, sea_query::OnConflict,
};

use crate::managers::repository::{
    error::Result,
    models::rounds::{ActiveModel, Column, Entity, Model},
    observability::record_repository_query,
    types::RoundRecord,
};

#[derive(Clone)]
pub(crate) struct RoundRepository {
    conn: Arc<DatabaseConnection>,
}

impl RoundRepository {
    pub(crate) fn new(conn: Arc<DatabaseConnection>) -> Self {
        Self { conn }
    }

    /// Inserts the round row unless one with the same id already exists.
    ///
    /// Returns `true` only when this call created the row. The conflict-free
    /// insert is the single arbiter across racing mappers: the first writer
    /// wins, every other caller observes `false` and must skip task
    /// population.
    pub(crate) async fn insert_if_absent<C: ConnectionTrait>(
        conn: &C,
        id: i64,
        external_address: &str,
        external_round: i64,
        max_tasks_per_node: i32,
        created_at: DateTimeUtc,
    ) -> Result<bool> {
        let model = ActiveModel {
            id: ActiveValue::Set(id),
            created_at: ActiveValue::Set(created_at),
            external_address: ActiveValue::Set(external_address.to_owned()),
            external_round: ActiveValue::Set(external_round),
            max_tasks_per_node: ActiveValue::Set(max_tasks_per_node),
        };

        let rows_affected = Entity::insert(model)
            .on_conflict(OnConflict::column(Column::Id).do_nothing().to_owned())
            .exec_without_returning(conn)
            .await?;

        Ok(rows_affected > 0)
    }

    /// Round lookup by internal round number.
    pub(crate) async fn find_round(&self, id: i64) -> Result<Option<RoundRecord>> {
        let started = Instant::now();
        let result = Entity::find_by_id(id)
            .one(self.conn.as_ref())
            .await
            .map(|model| model.map(Self::to_record))
            .map_err(Into::into);

        record_repository_query(
            "rounds",
            "find_round",
            if result.is_ok() { "ok" } else { "error" },
            started.elapsed(),
            None,
        );

        result
    }

    /// Round lookup by the external (contract address, round index) pair.
    pub(crate) async fn find_round_by_external(
        &self,
        external_address: &str,
        external_round: i64,
    ) -> Result<Option<RoundRecord>> {
        let started = Instant::now();
        let result = Entity::find()
            .filter(Column::ExternalAddress.eq(external_address))
            .filter(Column::ExternalRound.eq(external_round))
            .one(self.conn.as_ref())
            .await
            .map(|model| model.map(Self::to_record))
            .map_err(Into::into);

        record_repository_query(
            "rounds",
            "find_round_by_external",
            if result.is_ok() { "ok" } else { "error" },
            started.elapsed(),
            None,
        );

        result
    }

    fn to_record(model: Model) -> RoundRecord {
        RoundRecord {
            id: model.id,
            created_at: model.created_at,
            external_address: model.external_address,
            external_round: model.external_round,
            max_tasks_per_node: model.max_tasks_per_node,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sea_orm::{ConnectOptions, Database};
    use sea_orm_migration::MigratorTrait;

    use super::*;
    use crate::managers::repository::Migrator;

    async fn setup() -> Arc<DatabaseConnection> {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1);
        let conn = Arc::new(
            Database::connect(opt)
                .await
                .expect("failed to open in-memory database"),
        );
        Migrator::up(conn.as_ref(), None)
            .await
            .expect("migrations failed");
        conn
    }

    #[tokio::test]
    async fn insert_if_absent_reports_only_the_first_writer() {
        let conn = setup().await;

        let created =
            RoundRepository::insert_if_absent(conn.as_ref(), 1, "0x1a", 120, 15, Utc::now())
                .await
                .unwrap();
        assert!(created);

        // The duplicate insert is silently ignored, not an error
        let created =
            RoundRepository::insert_if_absent(conn.as_ref(), 1, "0x1a", 120, 15, Utc::now())
                .await
                .unwrap();
        assert!(!created);

        let repository = RoundRepository::new(Arc::clone(&conn));
        let round = repository.find_round(1).await.unwrap().unwrap();
        assert_eq!(round.external_address, "0x1a");
        assert_eq!(round.external_round, 120);
    }

    #[tokio::test]
    async fn find_round_by_external_matches_the_pair() {
        let conn = setup().await;
        RoundRepository::insert_if_absent(conn.as_ref(), 1, "0x1a", 120, 15, Utc::now())
            .await
            .unwrap();

        let repository = RoundRepository::new(Arc::clone(&conn));
        let round = repository
            .find_round_by_external("0x1a", 120)
            .await
            .unwrap()
            .expect("round missing");
        assert_eq!(round.id, 1);

        assert!(repository
            .find_round_by_external("0x1a", 121)
            .await
            .unwrap()
            .is_none());
        assert!(repository
            .find_round_by_external("0x1b", 120)
            .await
            .unwrap()
            .is_none());
        assert!(repository.find_round(2).await.unwrap().is_none());
    }
}
