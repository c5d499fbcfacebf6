//! Document store boundary.
//!
//! ARCHITECTURE
//! ============
//! The canonical queue documents live in an external transactional store
//! reachable by queue id. This module defines the seam: plain reads and
//! blind writes, sparse updates, optimistic read-modify-write transactions,
//! and snapshot subscription. `crate::memory` provides the in-process
//! reference implementation; a hosted document database slots in behind the
//! same trait.
//!
//! DESIGN
//! ======
//! A transaction body is a pure function from the current document (possibly
//! absent) to a [`TxEffect`]. The store guarantees that the effect it commits
//! was computed from the document state it commits over — if the document
//! changed in between, the body is re-run against a fresh read. That retry
//! loop is the sole serialization point; no explicit locks exist at this
//! layer.

use async_trait::async_trait;
use tokio::sync::watch;

use crate::queue::{HistoryEntry, QueueState, StudentStatus};

/// The latest committed document, or `None` while it does not exist.
pub type Snapshot = Option<QueueState>;

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A sparse update targeted a document that does not exist.
    #[error("queue document not found: {0}")]
    Missing(String),
    /// A transaction kept conflicting past the store's internal retry budget.
    #[error("transaction contention exceeded retry budget for queue: {0}")]
    Contention(String),
}

// =============================================================================
// SPARSE UPDATE
// =============================================================================

/// Sparse update for a queue document. Only present fields are applied.
///
/// `advance` writes pointer, statuses and history through one patch so no
/// subscriber can observe a status change without its history entry.
#[derive(Debug, Clone, Default)]
pub struct QueuePatch {
    pub current_index: Option<i64>,
    pub updated_at: Option<i64>,
    pub statuses: Option<Vec<StudentStatus>>,
    pub history: Option<Vec<HistoryEntry>>,
    pub locked: Option<bool>,
}

impl QueuePatch {
    /// Apply the present fields onto a document.
    pub fn apply(self, state: &mut QueueState) {
        if let Some(current_index) = self.current_index {
            state.current_index = current_index;
        }
        if let Some(updated_at) = self.updated_at {
            state.updated_at = updated_at;
        }
        if let Some(statuses) = self.statuses {
            state.statuses = statuses;
        }
        if let Some(history) = self.history {
            state.history = history;
        }
        if let Some(locked) = self.locked {
            state.locked = locked;
        }
    }
}

// =============================================================================
// TRANSACTIONS
// =============================================================================

/// Outcome of one transaction attempt.
#[derive(Debug, Clone)]
pub enum TxEffect {
    /// Commit nothing. Used for precondition no-ops (locked queue, empty
    /// roster, absent document) which resolve silently.
    Skip,
    /// Replace the whole document (creating it if absent).
    Set(QueueState),
    /// Sparse-update an existing document. Fails the transaction with
    /// [`StoreError::Missing`] if the document is absent.
    Patch(QueuePatch),
}

/// Transaction body: current document in, effect out. Must be pure — it may
/// run several times under contention.
pub type TxFn<'a> = &'a (dyn Fn(Option<&QueueState>) -> TxEffect + Send + Sync);

// =============================================================================
// STORE TRAIT
// =============================================================================

/// The transactional keyed document store the queue core runs against.
#[async_trait]
pub trait QueueStore: Send + Sync {
    /// Read the current document.
    ///
    /// # Errors
    ///
    /// Returns a store error if the read fails.
    async fn get(&self, queue_id: &str) -> Result<Snapshot, StoreError>;

    /// Blind overwrite, creating the document if absent. Deliberately wins
    /// over any concurrent transaction (the designated recovery action).
    ///
    /// # Errors
    ///
    /// Returns a store error if the write fails.
    async fn set(&self, queue_id: &str, state: QueueState) -> Result<(), StoreError>;

    /// Sparse-update an existing document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Missing`] if the document does not exist.
    async fn update(&self, queue_id: &str, patch: QueuePatch) -> Result<(), StoreError>;

    /// Run an optimistic read-modify-write transaction. The body is retried
    /// with a fresh read whenever the document changed between its read and
    /// the commit.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Contention`] when retries are exhausted, or any
    /// other store error from the attempt.
    async fn run_transaction(&self, queue_id: &str, op: TxFn<'_>) -> Result<(), StoreError>;

    /// Subscribe to committed snapshots. The receiver always holds the
    /// latest committed state; intermediate states may coalesce for slow
    /// subscribers, torn reads cannot occur.
    async fn subscribe(&self, queue_id: &str) -> watch::Receiver<Snapshot>;
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
