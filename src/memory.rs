//! In-process reference implementation of the store boundary.
//!
//! DESIGN
//! ======
//! Each document slot carries a commit version. A transaction attempt reads
//! `(state, version)` under a read lock, computes its effect with no lock
//! held, then reacquires the write lock and commits only if the version is
//! unchanged; otherwise it retries with a fresh read, up to an internal
//! budget. Committed states fan out to subscribers through a `watch`
//! channel, which naturally coalesces for slow readers while never exposing
//! a partially-applied document.

use std::collections::HashMap;

use tokio::sync::{RwLock, watch};
use tracing::{debug, warn};

use crate::store::{QueuePatch, QueueStore, Snapshot, StoreError, TxEffect, TxFn};

/// Attempts before a transaction gives up with [`StoreError::Contention`].
const MAX_TX_ATTEMPTS: u32 = 16;

struct DocSlot {
    state: Snapshot,
    /// Bumped on every committed write; transactions commit only against the
    /// version they read.
    version: u64,
    publish: watch::Sender<Snapshot>,
}

impl DocSlot {
    fn new() -> Self {
        let (publish, _) = watch::channel(None);
        Self { state: None, version: 0, publish }
    }

    fn commit(&mut self, state: Snapshot) {
        self.state = state;
        self.version += 1;
        // Send unconditionally; receivers may not exist yet.
        let _ = self.publish.send(self.state.clone());
    }
}

/// In-memory transactional document store keyed by queue id.
pub struct MemoryStore {
    slots: RwLock<HashMap<String, DocSlot>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self { slots: RwLock::new(HashMap::new()) }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl QueueStore for MemoryStore {
    async fn get(&self, queue_id: &str) -> Result<Snapshot, StoreError> {
        let slots = self.slots.read().await;
        Ok(slots.get(queue_id).and_then(|slot| slot.state.clone()))
    }

    async fn set(&self, queue_id: &str, state: crate::queue::QueueState) -> Result<(), StoreError> {
        let mut slots = self.slots.write().await;
        let slot = slots.entry(queue_id.to_owned()).or_insert_with(DocSlot::new);
        slot.commit(Some(state));
        debug!(queue_id, version = slot.version, "document overwritten");
        Ok(())
    }

    async fn update(&self, queue_id: &str, patch: QueuePatch) -> Result<(), StoreError> {
        let mut slots = self.slots.write().await;
        let Some(slot) = slots.get_mut(queue_id) else {
            return Err(StoreError::Missing(queue_id.to_owned()));
        };
        let Some(mut state) = slot.state.take() else {
            return Err(StoreError::Missing(queue_id.to_owned()));
        };
        patch.apply(&mut state);
        slot.commit(Some(state));
        Ok(())
    }

    async fn run_transaction(&self, queue_id: &str, op: TxFn<'_>) -> Result<(), StoreError> {
        for attempt in 1..=MAX_TX_ATTEMPTS {
            let (snapshot, read_version) = {
                let slots = self.slots.read().await;
                slots
                    .get(queue_id)
                    .map_or((None, 0), |slot| (slot.state.clone(), slot.version))
            };

            // Compute outside the lock; commit only if nothing moved.
            let effect = op(snapshot.as_ref());

            let mut slots = self.slots.write().await;
            let slot = slots.entry(queue_id.to_owned()).or_insert_with(DocSlot::new);
            if slot.version != read_version {
                debug!(queue_id, attempt, "transaction conflicted, retrying with fresh read");
                continue;
            }

            match effect {
                TxEffect::Skip => return Ok(()),
                TxEffect::Set(state) => slot.commit(Some(state)),
                TxEffect::Patch(patch) => {
                    let Some(mut state) = slot.state.take() else {
                        return Err(StoreError::Missing(queue_id.to_owned()));
                    };
                    patch.apply(&mut state);
                    slot.commit(Some(state));
                }
            }
            return Ok(());
        }

        warn!(queue_id, attempts = MAX_TX_ATTEMPTS, "transaction retry budget exhausted");
        Err(StoreError::Contention(queue_id.to_owned()))
    }

    async fn subscribe(&self, queue_id: &str) -> watch::Receiver<Snapshot> {
        let mut slots = self.slots.write().await;
        let slot = slots.entry(queue_id.to_owned()).or_insert_with(DocSlot::new);
        slot.publish.subscribe()
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
