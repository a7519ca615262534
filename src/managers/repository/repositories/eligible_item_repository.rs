use std::{sync::Arc, time::Instant};

use sea_orm::{
    ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, Order, QueryFilter,
    QueryOrder, QuerySelect,
    prelude::DateTimeUtc,
    sea_query::{Func, OnConflict, SimpleExpr},
};

use crate::managers::repository::{
    error::Result,
    models::eligible_items::{ActiveModel, Column, Entity, Model},
    observability::record_repository_query,
    types::EligibleItemInput,
};

#[derive(Clone)]
pub(crate) struct EligibleItemRepository {
    conn: Arc<DatabaseConnection>,
}

impl EligibleItemRepository {
    pub(crate) fn new(conn: Arc<DatabaseConnection>) -> Self {
        Self { conn }
    }

    /// Randomly samples up to `limit` distinct non-expired items.
    ///
    /// `Func::random()` renders to the backend's random function, so the
    /// sampling stays in the database and never loads the full pool.
    pub(crate) async fn sample_eligible<C: ConnectionTrait>(
        conn: &C,
        now: DateTimeUtc,
        limit: u64,
    ) -> Result<Vec<Model>> {
        Ok(Entity::find()
            .filter(Column::ExpiresAt.gt(now))
            .order_by(SimpleExpr::FunctionCall(Func::random()), Order::Asc)
            .limit(limit)
            .all(conn)
            .await?)
    }

    /// Upserts pool items; an existing content id gets its protocol and
    /// expiry refreshed.
    pub(crate) async fn upsert_items(&self, items: Vec<EligibleItemInput>) -> Result<usize> {
        if items.is_empty() {
            return Ok(0);
        }

        let started = Instant::now();
        let count = items.len();
        let active_models: Vec<ActiveModel> = items
            .into_iter()
            .map(|item| ActiveModel {
                content_id: ActiveValue::Set(item.content_id),
                protocol: ActiveValue::Set(item.protocol),
                expires_at: ActiveValue::Set(item.expires_at),
            })
            .collect();

        let result = Entity::insert_many(active_models)
            .on_conflict(
                OnConflict::column(Column::ContentId)
                    .update_columns([Column::Protocol, Column::ExpiresAt])
                    .to_owned(),
            )
            .exec_without_returning(self.conn.as_ref())
            .await
            .map(|_| count)
            .map_err(Into::into);

        record_repository_query(
            "eligible_items",
            "upsert_items",
            if result.is_ok() { "ok" } else { "error" },
            started.elapsed(),
            Some(count),
        );

        result
    }

    /// Deletes items whose expiry has passed. Returns rows removed.
    pub(crate) async fn delete_expired(&self, now: DateTimeUtc) -> Result<u64> {
        let started = Instant::now();
        let result = Entity::delete_many()
            .filter(Column::ExpiresAt.lte(now))
            .exec(self.conn.as_ref())
            .await
            .map(|deleted| deleted.rows_affected)
            .map_err(Into::into);

        match &result {
            Ok(rows) => record_repository_query(
                "eligible_items",
                "delete_expired",
                "ok",
                started.elapsed(),
                Some(*rows as usize),
            ),
            Err(_) => record_repository_query(
                "eligible_items",
                "delete_expired",
                "error",
                started.elapsed(),
                None,
            ),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use sea_orm::{ConnectOptions, Database};
    use sea_orm_migration::MigratorTrait;

    use super::*;
    use crate::managers::repository::Migrator;

    async fn setup() -> (Arc<DatabaseConnection>, EligibleItemRepository) {
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
        let repository = EligibleItemRepository::new(Arc::clone(&conn));
        (conn, repository)
    }

    fn item(content_id: &str, expires_in_hours: i64) -> EligibleItemInput {
        EligibleItemInput {
            content_id: content_id.to_string(),
            protocol: None,
            expires_at: Utc::now() + Duration::hours(expires_in_hours),
        }
    }

    #[tokio::test]
    async fn sampling_respects_limit_and_expiry() {
        let (conn, repository) = setup().await;
        repository
            .upsert_items(vec![
                item("bafy1", 1),
                item("bafy2", 1),
                item("bafy3", 1),
                item("bafy4", 1),
                item("bafyexpired", -1),
            ])
            .await
            .unwrap();

        let sampled = EligibleItemRepository::sample_eligible(conn.as_ref(), Utc::now(), 3)
            .await
            .unwrap();
        assert_eq!(sampled.len(), 3);
        assert!(sampled.iter().all(|i| i.content_id != "bafyexpired"));

        // Sampling is without replacement: content ids are distinct
        let mut ids: Vec<&str> = sampled.iter().map(|i| i.content_id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[tokio::test]
    async fn sampling_returns_fewer_items_when_pool_is_small() {
        let (conn, repository) = setup().await;
        repository
            .upsert_items(vec![item("bafy1", 1), item("bafyexpired", -1)])
            .await
            .unwrap();

        let sampled = EligibleItemRepository::sample_eligible(conn.as_ref(), Utc::now(), 1000)
            .await
            .unwrap();
        assert_eq!(sampled.len(), 1);
        assert_eq!(sampled[0].content_id, "bafy1");
    }

    #[tokio::test]
    async fn upsert_refreshes_existing_items() {
        let (conn, repository) = setup().await;
        repository.upsert_items(vec![item("bafy1", -1)]).await.unwrap();

        // Expired item is invisible to sampling
        let sampled = EligibleItemRepository::sample_eligible(conn.as_ref(), Utc::now(), 10)
            .await
            .unwrap();
        assert!(sampled.is_empty());

        // Re-ingesting the same content id extends its expiry
        repository.upsert_items(vec![item("bafy1", 2)]).await.unwrap();
        let sampled = EligibleItemRepository::sample_eligible(conn.as_ref(), Utc::now(), 10)
            .await
            .unwrap();
        assert_eq!(sampled.len(), 1);
    }

    #[tokio::test]
    async fn delete_expired_removes_only_past_items() {
        let (_conn, repository) = setup().await;
        repository
            .upsert_items(vec![item("bafy1", 1), item("bafyold1", -1), item("bafyold2", -2)])
            .await
            .unwrap();

        let deleted = repository.delete_expired(Utc::now()).await.unwrap();
        assert_eq!(deleted, 2);

        let deleted = repository.delete_expired(Utc::now()).await.unwrap();
        assert_eq!(deleted, 0);
    }
}
