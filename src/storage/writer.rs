//! Background writer for the permanent lists.
//!
//! Mutations hand a snapshot to [`Persister::save`] and return immediately.
//! A single task applies the snapshots in submission order, so the last write
//! always reflects the last mutation.

use super::{PersistedLists, StorageService};
use crate::error::StorageError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

enum PersistCommand {
    Save(PersistedLists),
    Flush(oneshot::Sender<()>),
}

/// Outcome counters of the writer task.
#[derive(Debug, Default)]
pub struct PersistStats {
    saved: AtomicU64,
    failed: AtomicU64,
}

impl PersistStats {
    pub fn saved(&self) -> u64 {
        self.saved.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }
}

#[derive(Clone)]
pub struct Persister {
    tx: mpsc::UnboundedSender<PersistCommand>,
    stats: Arc<PersistStats>,
}

impl Persister {
    /// Spawns the writer task on the current tokio runtime.
    pub fn spawn(storage: Arc<dyn StorageService>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let stats = Arc::new(PersistStats::default());

        let task_stats = stats.clone();
        tokio::spawn(async move {
            run_writer(storage, rx, task_stats).await;
        });

        Self { tx, stats }
    }

    /// Queues a write. Never blocks; failures surface in the log and in
    /// [`PersistStats::failed`].
    pub fn save(&self, lists: PersistedLists) {
        if self.tx.send(PersistCommand::Save(lists)).is_err() {
            self.stats.failed.fetch_add(1, Ordering::Relaxed);
            error!("Failed to persist lists: {}", StorageError::WriterClosed);
        }
    }

    /// Resolves once every write queued before this call has been applied.
    pub async fn flush(&self) -> Result<(), StorageError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.tx
            .send(PersistCommand::Flush(ack_tx))
            .map_err(|_| StorageError::WriterClosed)?;
        ack_rx.await.map_err(|_| StorageError::WriterClosed)
    }

    pub fn stats(&self) -> &PersistStats {
        &self.stats
    }
}

async fn run_writer(
    storage: Arc<dyn StorageService>,
    mut rx: mpsc::UnboundedReceiver<PersistCommand>,
    stats: Arc<PersistStats>,
) {
    while let Some(command) = rx.recv().await {
        match command {
            PersistCommand::Save(lists) => match storage.save_all(&lists).await {
                Ok(()) => {
                    stats.saved.fetch_add(1, Ordering::Relaxed);
                    debug!(
                        white = lists.white_list.as_ref().map_or(0, Vec::len),
                        black = lists.black_list.as_ref().map_or(0, Vec::len),
                        "Permanent lists persisted"
                    );
                }
                Err(e) => {
                    stats.failed.fetch_add(1, Ordering::Relaxed);
                    error!("Failed to persist lists: {}", e);
                }
            },
            PersistCommand::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }

    info!("List persistence writer stopping.");
}
