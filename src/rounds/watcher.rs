use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};

use crate::rounds::mapper::RoundMapper;

/// A round-advance notification from the external event source.
///
/// Delivery is at-least-once; the mapper's idempotence makes duplicates and
/// replays harmless.
#[derive(Debug, Clone)]
pub(crate) struct RoundAdvance {
    pub contract_address: String,
    pub round_index: i64,
}

/// Snapshot of the latest successfully mapped round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CurrentRound {
    pub internal_round: i64,
    pub contract_address: String,
    pub external_round: i64,
}

/// Owned state cell holding the latest round snapshot.
///
/// Only the watcher's sequential event loop replaces the value; readers
/// always take a clone, never a live reference.
#[derive(Clone)]
pub(crate) struct CurrentRoundCell {
    inner: Arc<RwLock<Option<CurrentRound>>>,
}

impl CurrentRoundCell {
    pub(crate) fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the latest snapshot, or `None` before the first successful
    /// mapping.
    pub(crate) async fn snapshot(&self) -> Option<CurrentRound> {
        self.inner.read().await.clone()
    }

    async fn replace(&self, round: CurrentRound) {
        *self.inner.write().await = Some(round);
    }
}

/// Sequential consumer of round-advance events.
///
/// Events are processed strictly one at a time in arrival order, so the
/// watcher itself never issues overlapping mapping transactions. Concurrent
/// callers elsewhere (retries, other instances) are handled by the mapper's
/// idempotence, not by this loop.
pub(crate) struct RoundWatcher {
    mapper: RoundMapper,
    current_round: CurrentRoundCell,
    round_rx: mpsc::Receiver<RoundAdvance>,
}

impl RoundWatcher {
    pub(crate) fn new(
        mapper: RoundMapper,
        current_round: CurrentRoundCell,
        round_rx: mpsc::Receiver<RoundAdvance>,
    ) -> Self {
        Self {
            mapper,
            current_round,
            round_rx,
        }
    }

    /// Runs until every sender is dropped.
    pub(crate) async fn run(mut self) {
        while let Some(advance) = self.round_rx.recv().await {
            self.handle_round_advance(advance).await;
        }

        tracing::info!("Round watcher shutting down");
    }

    /// Maps one advance and replaces the snapshot on success. On failure the
    /// previous snapshot stays in place; the event source will resend or a
    /// later poll reconciles.
    async fn handle_round_advance(&self, advance: RoundAdvance) {
        match self
            .mapper
            .map_external_round(&advance.contract_address, advance.round_index)
            .await
        {
            Ok(internal_round) => {
                tracing::info!(internal_round, "Round started");
                self.current_round
                    .replace(CurrentRound {
                        internal_round,
                        contract_address: advance.contract_address,
                        external_round: advance.round_index,
                    })
                    .await;
            }
            Err(error) => {
                tracing::error!(
                    contract_address = %advance.contract_address,
                    round_index = advance.round_index,
                    error = %error,
                    "Cannot handle round advance"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sea_orm::{ConnectOptions, Database, DatabaseConnection};
    use sea_orm_migration::MigratorTrait;

    use super::*;
    use crate::managers::repository::Migrator;

    async fn setup_mapper() -> (Arc<DatabaseConnection>, RoundMapper) {
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
        let mapper = RoundMapper::new(Arc::clone(&conn));
        (conn, mapper)
    }

    fn watcher_parts(mapper: RoundMapper) -> (RoundWatcher, CurrentRoundCell) {
        let cell = CurrentRoundCell::new();
        let (_tx, rx) = mpsc::channel(1);
        let watcher = RoundWatcher::new(mapper, cell.clone(), rx);
        (watcher, cell)
    }

    #[tokio::test]
    async fn snapshot_is_none_before_first_mapping() {
        let cell = CurrentRoundCell::new();
        assert!(cell.snapshot().await.is_none());
    }

    #[tokio::test]
    async fn successful_advance_replaces_the_snapshot() {
        let (_conn, mapper) = setup_mapper().await;
        let (watcher, cell) = watcher_parts(mapper);

        watcher
            .handle_round_advance(RoundAdvance {
                contract_address: "0x1a".to_string(),
                round_index: 120,
            })
            .await;

        let snapshot = cell.snapshot().await.expect("snapshot missing");
        assert_eq!(
            snapshot,
            CurrentRound {
                internal_round: 1,
                contract_address: "0x1a".to_string(),
                external_round: 120,
            }
        );

        watcher
            .handle_round_advance(RoundAdvance {
                contract_address: "0x1a".to_string(),
                round_index: 121,
            })
            .await;

        let snapshot = cell.snapshot().await.expect("snapshot missing");
        assert_eq!(snapshot.internal_round, 2);
        assert_eq!(snapshot.external_round, 121);
    }

    #[tokio::test]
    async fn failed_advance_keeps_the_previous_snapshot() {
        let (_conn, mapper) = setup_mapper().await;
        let (watcher, cell) = watcher_parts(mapper);

        watcher
            .handle_round_advance(RoundAdvance {
                contract_address: "0x1a".to_string(),
                round_index: 120,
            })
            .await;
        watcher
            .handle_round_advance(RoundAdvance {
                contract_address: "0x1b".to_string(),
                round_index: 10,
            })
            .await;

        // Reverting to 0x1a fails inside the mapper (duplicate ledger row);
        // the cache must keep serving the last good round
        watcher
            .handle_round_advance(RoundAdvance {
                contract_address: "0x1a".to_string(),
                round_index: 121,
            })
            .await;

        let snapshot = cell.snapshot().await.expect("snapshot missing");
        assert_eq!(snapshot.internal_round, 2);
        assert_eq!(snapshot.contract_address, "0x1b");
    }

    #[tokio::test]
    async fn run_processes_events_in_arrival_order_until_senders_drop() {
        let (_conn, mapper) = setup_mapper().await;
        let cell = CurrentRoundCell::new();
        let (tx, rx) = mpsc::channel(4);
        let watcher = RoundWatcher::new(mapper, cell.clone(), rx);

        tx.send(RoundAdvance {
            contract_address: "0x1a".to_string(),
            round_index: 120,
        })
        .await
        .unwrap();
        tx.send(RoundAdvance {
            contract_address: "0x1a".to_string(),
            round_index: 121,
        })
        .await
        .unwrap();
        drop(tx);

        // run() drains the queued events and returns once the channel closes
        watcher.run().await;

        let snapshot = cell.snapshot().await.expect("snapshot missing");
        assert_eq!(snapshot.internal_round, 2);
        assert_eq!(snapshot.external_round, 121);
    }
}
