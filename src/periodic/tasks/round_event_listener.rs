//! Round event listener periodic task.
//!
//! Polls the round contract for `RoundStart` events and forwards each
//! advance into the watcher's channel.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::{
    error::NodeError,
    managers::chain::ChainManager,
    periodic::runner::run_with_shutdown,
    rounds::watcher::RoundAdvance,
};

/// Number of blocks kept behind the tip for finality safety.
const FINALITY_LAG_BLOCKS: u64 = 2;

pub(crate) struct RoundEventListenerTask {
    chain_manager: Arc<ChainManager>,
    round_tx: mpsc::Sender<RoundAdvance>,
    poll_interval: Duration,
    /// Last block already scanned for events. Zero means the cursor has not
    /// been established yet; the first poll only records the tip, since the
    /// startup synchronization already mapped the current round.
    last_checked_block: AtomicU64,
}

impl RoundEventListenerTask {
    pub(crate) fn new(
        chain_manager: Arc<ChainManager>,
        round_tx: mpsc::Sender<RoundAdvance>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            chain_manager,
            round_tx,
            poll_interval,
            last_checked_block: AtomicU64::new(0),
        }
    }

    pub(crate) async fn run(self, shutdown: CancellationToken) {
        run_with_shutdown("round_events", shutdown, || self.execute()).await;
    }

    async fn execute(&self) -> Duration {
        if let Err(error) = self.fetch_and_forward_round_events().await {
            tracing::error!(
                error = %error,
                "Error fetching/forwarding round events"
            );
        }

        self.poll_interval
    }

    async fn fetch_and_forward_round_events(&self) -> Result<(), NodeError> {
        let current_block = self
            .chain_manager
            .get_block_number()
            .await?
            .saturating_sub(FINALITY_LAG_BLOCKS);

        let last_checked_block = self.last_checked_block.load(Ordering::Relaxed);
        if last_checked_block == 0 {
            self.last_checked_block
                .store(current_block, Ordering::Relaxed);
            return Ok(());
        }

        let from_block = last_checked_block + 1;
        if from_block > current_block {
            return Ok(());
        }

        let round_indices = self
            .chain_manager
            .fetch_round_start_events(from_block, current_block)
            .await?;

        if !round_indices.is_empty() {
            tracing::debug!(
                from_block,
                current_block,
                event_count = round_indices.len(),
                "Fetched round start events"
            );
        }

        for round_index in round_indices {
            let advance = RoundAdvance {
                contract_address: self.chain_manager.contract_address().to_string(),
                round_index,
            };

            if self.round_tx.send(advance).await.is_err() {
                tracing::warn!("Round advance channel closed, dropping event");
                return Ok(());
            }
        }

        // Advance the cursor only after every event was forwarded. A crash
        // in between re-delivers events, which the mapper tolerates.
        self.last_checked_block
            .store(current_block, Ordering::Relaxed);

        Ok(())
    }
}
