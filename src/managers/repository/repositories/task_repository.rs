use std::{sync::Arc, time::Instant};

use sea_orm::{
    ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};

use crate::managers::repository::{
    error::Result,
    models::tasks::{ActiveModel, Column, Entity},
    observability::record_repository_query,
    types::TaskRecord,
};

#[derive(Clone)]
pub(crate) struct TaskRepository {
    conn: Arc<DatabaseConnection>,
}

impl TaskRepository {
    pub(crate) fn new(conn: Arc<DatabaseConnection>) -> Self {
        Self { conn }
    }

    /// Bulk-inserts the sampled task set for a freshly created round.
    pub(crate) async fn insert_for_round<C: ConnectionTrait>(
        conn: &C,
        round_id: i64,
        tasks: Vec<TaskRecord>,
    ) -> Result<usize> {
        if tasks.is_empty() {
            return Ok(0);
        }

        let count = tasks.len();
        let active_models: Vec<ActiveModel> = tasks
            .into_iter()
            .map(|task| ActiveModel {
                round_id: ActiveValue::Set(round_id),
                content_id: ActiveValue::Set(task.content_id),
                protocol: ActiveValue::Set(task.protocol),
            })
            .collect();

        Entity::insert_many(active_models)
            .exec_without_returning(conn)
            .await?;

        Ok(count)
    }

    /// All tasks belonging to a round, in stable content-id order.
    pub(crate) async fn tasks_for_round(&self, round_id: i64) -> Result<Vec<TaskRecord>> {
        let started = Instant::now();
        let result: Result<Vec<TaskRecord>> = Entity::find()
            .filter(Column::RoundId.eq(round_id))
            .order_by_asc(Column::ContentId)
            .all(self.conn.as_ref())
            .await
            .map(|models| {
                models
                    .into_iter()
                    .map(|model| TaskRecord {
                        content_id: model.content_id,
                        protocol: model.protocol,
                    })
                    .collect()
            })
            .map_err(Into::into);

        match &result {
            Ok(tasks) => record_repository_query(
                "tasks",
                "tasks_for_round",
                "ok",
                started.elapsed(),
                Some(tasks.len()),
            ),
            Err(_) => record_repository_query(
                "tasks",
                "tasks_for_round",
                "error",
                started.elapsed(),
                None,
            ),
        }

        result
    }
}
