//! Client-side status polling
//!
//! Repeatedly fetches a batch's status on a fixed interval until a
//! terminal state, then fetches results exactly once more and stops.
//! Cancellation is a hard requirement: once a subscription is cancelled
//! or dropped, no further timer callbacks fire, regardless of batch
//! state.

use crate::engine::AnalysisEngine;
use crate::error::EngineError;
use crate::types::{BatchId, BatchResults, BatchStatusView};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Snapshots buffered per subscription before older updates are dropped
const UPDATE_BUFFER: usize = 32;

/// Terminal outcome observed by a poll subscription
#[derive(Debug, Clone, PartialEq)]
pub struct PollOutcome {
    /// Final status snapshot
    pub status: BatchStatusView,
    /// Results, when the batch completed
    pub results: Option<BatchResults>,
}

/// Polls batch status on a fixed interval
#[derive(Debug, Clone)]
pub struct StatusPoller {
    engine: Arc<AnalysisEngine>,
    interval: Duration,
}

impl StatusPoller {
    /// Create a poller using the engine's configured interval
    #[must_use]
    pub fn new(engine: Arc<AnalysisEngine>) -> Self {
        let interval = Duration::from_millis(engine.config().poll_interval_ms);
        Self { engine, interval }
    }

    /// With an explicit poll interval
    #[inline]
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Start polling `batch_id`
    ///
    /// The subscription receives a status snapshot per tick; a batch the
    /// store has not seen yet is reported as queued rather than erroring.
    #[must_use]
    pub fn subscribe(&self, batch_id: BatchId) -> PollSubscription {
        let (update_tx, update_rx) = mpsc::channel(UPDATE_BUFFER);
        let (cancel_tx, cancel_rx) = watch::channel(false);

        let engine = Arc::clone(&self.engine);
        let interval = self.interval;
        let task = tokio::spawn(poll_loop(engine, batch_id, interval, update_tx, cancel_rx));

        PollSubscription {
            batch_id,
            updates: update_rx,
            cancel: cancel_tx,
            task,
        }
    }
}

/// A running poll loop for one batch
#[derive(Debug)]
pub struct PollSubscription {
    batch_id: BatchId,
    updates: mpsc::Receiver<BatchStatusView>,
    cancel: watch::Sender<bool>,
    task: JoinHandle<Option<PollOutcome>>,
}

impl PollSubscription {
    /// The observed batch
    #[inline]
    #[must_use]
    pub fn batch_id(&self) -> BatchId {
        self.batch_id
    }

    /// Next status snapshot; `None` once the loop has stopped
    pub async fn next_update(&mut self) -> Option<BatchStatusView> {
        self.updates.recv().await
    }

    /// Stop the loop; no further timer callbacks fire after this
    pub fn cancel(&self) {
        let _ = self.cancel.send(true);
    }

    /// Whether the loop has stopped
    #[inline]
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Await the loop and return the terminal outcome
    ///
    /// Returns `None` when the subscription was cancelled before the
    /// batch reached a terminal state.
    pub async fn into_outcome(self) -> Result<Option<PollOutcome>, EngineError> {
        self.task
            .await
            .map_err(|error| EngineError::Driver(error.to_string()))
    }
}

async fn poll_loop(
    engine: Arc<AnalysisEngine>,
    batch_id: BatchId,
    interval: Duration,
    updates: mpsc::Sender<BatchStatusView>,
    mut cancel: watch::Receiver<bool>,
) -> Option<PollOutcome> {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            changed = cancel.changed() => {
                // Either an explicit cancel or the subscription was
                // dropped; both stop the loop immediately.
                if changed.is_err() || *cancel.borrow() {
                    tracing::debug!(batch = %batch_id, "status polling cancelled");
                    return None;
                }
            }
            _ = ticker.tick() => {
                let snapshot = match engine.status(batch_id) {
                    Ok(view) => view,
                    Err(EngineError::BatchNotFound(_)) => {
                        BatchStatusView::queued_placeholder(batch_id)
                    }
                    Err(error) => {
                        tracing::warn!(batch = %batch_id, %error, "failed to fetch batch status");
                        continue;
                    }
                };

                let terminal = snapshot.status.is_terminal();
                match updates.try_send(snapshot.clone()) {
                    Ok(()) => {}
                    Err(mpsc::error::TrySendError::Full(_)) => {
                        tracing::debug!(batch = %batch_id, "dropping status update, consumer is behind");
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => {
                        // Consumer went away: stop polling.
                        return None;
                    }
                }

                if terminal {
                    let results = match engine.results(batch_id) {
                        Ok(results) => results,
                        Err(error) => {
                            tracing::warn!(batch = %batch_id, %error, "failed to fetch batch results");
                            None
                        }
                    };
                    return Some(PollOutcome { status: snapshot, results });
                }
            }
        }
    }
}
