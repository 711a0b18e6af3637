//! Background Save Queue
//!
//! The game loop hands snapshots to [`SaveQueue::enqueue`] and moves on.
//! A single worker task performs the writes in submission order on the
//! blocking pool, so two saves for the same player always land in the
//! order they were taken.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::persist::store::{PlayerStore, StatsRecord};

enum SaveJob {
    Save(StatsRecord),
    Flush(oneshot::Sender<()>),
}

/// Fire-and-forget writer in front of a [`PlayerStore`].
pub struct SaveQueue {
    tx: mpsc::UnboundedSender<SaveJob>,
    worker: JoinHandle<()>,
}

impl SaveQueue {
    /// Spawn the worker. Must be called from within a tokio runtime.
    pub fn spawn(store: Arc<dyn PlayerStore>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<SaveJob>();

        let worker = tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                match job {
                    SaveJob::Save(record) => {
                        let store = Arc::clone(&store);
                        let key = record.key.clone();
                        let result = tokio::task::spawn_blocking(move || store.save(&record)).await;
                        match result {
                            Ok(Ok(())) => debug!("Saved stats for {}", key),
                            Ok(Err(e)) => warn!("Failed to save stats for {}: {}", key, e),
                            Err(e) => warn!("Save task for {} aborted: {}", key, e),
                        }
                    }
                    SaveJob::Flush(done) => {
                        let _ = done.send(());
                    }
                }
            }
        });

        Self { tx, worker }
    }

    /// Queue a snapshot for writing. Never blocks.
    pub fn enqueue(&self, record: StatsRecord) {
        if self.tx.send(SaveJob::Save(record)).is_err() {
            warn!("Save queue closed, dropping stats snapshot");
        }
    }

    /// Wait until every save queued so far has been attempted.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(SaveJob::Flush(done_tx)).is_err() {
            return;
        }
        let _ = done_rx.await;
    }
}

impl Drop for SaveQueue {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::store::MemoryStore;

    #[tokio::test]
    async fn test_last_write_wins() {
        let store = Arc::new(MemoryStore::new());
        let queue = SaveQueue::spawn(store.clone());

        for kills in 0..10 {
            let mut record = StatsRecord::fresh("k", "alice");
            record.kills = kills;
            queue.enqueue(record);
        }
        queue.flush().await;

        assert_eq!(store.load("k").unwrap().unwrap().kills, 9);
    }

    #[tokio::test]
    async fn test_failed_save_does_not_stop_worker() {
        let store = Arc::new(MemoryStore::new());
        let queue = SaveQueue::spawn(store.clone());

        store.set_failing(true);
        queue.enqueue(StatsRecord::fresh("a", "alice"));
        queue.flush().await;

        store.set_failing(false);
        queue.enqueue(StatsRecord::fresh("b", "bob"));
        queue.flush().await;

        assert_eq!(store.load("a").unwrap(), None);
        assert!(store.load("b").unwrap().is_some());
    }
}
