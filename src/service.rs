//! Queue service — the transactional turn-changing operations.
//!
//! DESIGN
//! ======
//! Every turn-changing operation runs as one optimistic read-modify-write
//! transaction against the shared document, so two admin devices racing on
//! the same queue can never both consume one advance: the later transaction
//! recomputes from the earlier one's committed state. A transaction that
//! finds a failing precondition (locked queue, empty roster, unknown student
//! id, absent document where one is required) commits nothing and resolves
//! `Ok` — callers observe the real outcome through the snapshot
//! subscription, never through the return value.
//!
//! ERROR HANDLING
//! ==============
//! Store failures (connectivity, exhausted transaction retries) propagate
//! un-swallowed as `QueueError::Store`. No failed turn-change is re-queued;
//! the admin re-invokes manually.

use std::sync::Arc;

use tracing::{debug, info};

use crate::ledger::{default_statuses, upsert_status};
use crate::position::{next_unpresented_index, presenter_index};
use crate::queue::{HistoryEntry, PresentationStatus, QueueState, floored_mod, now_ms};
use crate::roster;
use crate::store::{QueuePatch, QueueStore, StoreError, TxEffect};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// How the current presenter's turn is resolved by an advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Presented; close the turn out.
    Done,
    /// Absent; skip, leaving the student recallable via jump-to.
    AbsentSkipped,
}

impl AdvanceOutcome {
    #[must_use]
    fn status(self) -> PresentationStatus {
        match self {
            Self::Done => PresentationStatus::Done,
            Self::AbsentSkipped => PresentationStatus::AbsentSkipped,
        }
    }
}

/// Handle for one queue's operations against a shared store.
#[derive(Clone)]
pub struct QueueService {
    store: Arc<dyn QueueStore>,
    queue_id: String,
}

// =============================================================================
// OPERATIONS
// =============================================================================

impl QueueService {
    #[must_use]
    pub fn new(store: Arc<dyn QueueStore>, queue_id: impl Into<String>) -> Self {
        Self { store, queue_id: queue_id.into() }
    }

    #[must_use]
    pub fn queue_id(&self) -> &str {
        &self.queue_id
    }

    /// Create the queue document from the static roster if it does not exist
    /// yet. Never overwrites an existing document.
    ///
    /// # Errors
    ///
    /// Returns a store error if the transaction fails.
    pub async fn initialize_if_absent(&self) -> Result<(), QueueError> {
        let queue_id = &self.queue_id;
        self.store
            .run_transaction(queue_id, &|current| {
                if current.is_some() {
                    return TxEffect::Skip;
                }
                info!(%queue_id, "seeding queue document from roster");
                TxEffect::Set(QueueState::seeded(roster::initial_roster(queue_id), now_ms()))
            })
            .await?;
        Ok(())
    }

    /// Resolve the current presenter with `outcome`, append the history
    /// entry, and move the pointer to the next unresolved student. Initializes
    /// an absent document (applying the outcome to the first student) within
    /// the same transaction. No-op on a locked queue or an empty roster.
    ///
    /// # Errors
    ///
    /// Returns a store error if the transaction fails.
    pub async fn advance(&self, outcome: AdvanceOutcome) -> Result<(), QueueError> {
        let status = outcome.status();
        let queue_id = &self.queue_id;
        self.store
            .run_transaction(queue_id, &|current| {
                let now = now_ms();
                let Some(state) = current else {
                    // First admin action can land before explicit
                    // initialization; seed and advance in one commit.
                    let mut seeded = QueueState::seeded(roster::initial_roster(queue_id), now);
                    if let Some(patch) = advance_patch(&seeded, status, now) {
                        patch.apply(&mut seeded);
                    }
                    return TxEffect::Set(seeded);
                };
                match advance_patch(state, status, now) {
                    Some(patch) => TxEffect::Patch(patch),
                    None => {
                        debug!(%queue_id, locked = state.locked, "advance elided");
                        TxEffect::Skip
                    }
                }
            })
            .await?;
        Ok(())
    }

    /// `advance(Done)`.
    ///
    /// # Errors
    ///
    /// Returns a store error if the transaction fails.
    pub async fn next(&self) -> Result<(), QueueError> {
        self.advance(AdvanceOutcome::Done).await
    }

    /// `advance(AbsentSkipped)`.
    ///
    /// # Errors
    ///
    /// Returns a store error if the transaction fails.
    pub async fn skip(&self) -> Result<(), QueueError> {
        self.advance(AdvanceOutcome::AbsentSkipped).await
    }

    /// Move the pointer back one slot, cyclically. A pure pointer move for
    /// manual correction: statuses and history are untouched. No-op if the
    /// document is absent, the queue is locked, or the roster is empty.
    ///
    /// # Errors
    ///
    /// Returns a store error if the transaction fails.
    pub async fn prev(&self) -> Result<(), QueueError> {
        self.store
            .run_transaction(&self.queue_id, &|current| {
                let Some(state) = current else {
                    return TxEffect::Skip;
                };
                if state.locked || state.students.is_empty() {
                    return TxEffect::Skip;
                }
                let prev = floored_mod(state.current_index - 1, state.students.len());
                TxEffect::Patch(QueuePatch {
                    current_index: Some(as_index(prev)),
                    updated_at: Some(now_ms()),
                    ..QueuePatch::default()
                })
            })
            .await?;
        Ok(())
    }

    /// Return the current presenter to the unresolved pool for a later turn:
    /// status back to `NotYet`, pointer forward to the next unresolved
    /// student by the same scan rule as advance. Appends no history. No-op if
    /// the document is absent, the queue is locked, or the roster is empty.
    ///
    /// # Errors
    ///
    /// Returns a store error if the transaction fails.
    pub async fn recall_current_presenter(&self) -> Result<(), QueueError> {
        let queue_id = &self.queue_id;
        self.store
            .run_transaction(queue_id, &|current| {
                let Some(state) = current else {
                    return TxEffect::Skip;
                };
                if state.locked {
                    return TxEffect::Skip;
                }
                let Some(presenter) = presenter_index(state.current_index, state.students.len()) else {
                    return TxEffect::Skip;
                };

                let mut statuses = if state.statuses.is_empty() {
                    default_statuses(&state.students)
                } else {
                    state.statuses.clone()
                };
                upsert_status(&mut statuses, &state.students[presenter].id, PresentationStatus::NotYet);
                let next = next_unpresented_index(&state.students, &statuses, presenter);

                info!(%queue_id, student_id = %state.students[presenter].id, "presenter recalled for a later turn");
                TxEffect::Patch(QueuePatch {
                    current_index: Some(as_index(next)),
                    updated_at: Some(now_ms()),
                    statuses: Some(statuses),
                    ..QueuePatch::default()
                })
            })
            .await?;
        Ok(())
    }

    /// Point the queue at a specific student, regardless of that student's
    /// status. Statuses and history are untouched. No-op if the document is
    /// absent, the queue is locked, or the id is not on the roster.
    ///
    /// # Errors
    ///
    /// Returns a store error if the transaction fails.
    pub async fn jump_to_student(&self, student_id: &str) -> Result<(), QueueError> {
        let queue_id = &self.queue_id;
        self.store
            .run_transaction(queue_id, &|current| {
                let Some(state) = current else {
                    return TxEffect::Skip;
                };
                if state.locked {
                    return TxEffect::Skip;
                }
                let Some(position) = state.position_of(student_id) else {
                    debug!(%queue_id, student_id, "jump target not on roster");
                    return TxEffect::Skip;
                };
                TxEffect::Patch(QueuePatch {
                    current_index: Some(as_index(position)),
                    updated_at: Some(now_ms()),
                    ..QueuePatch::default()
                })
            })
            .await?;
        Ok(())
    }

    /// Set the lock flag. Idempotent and effective regardless of the current
    /// lock state; no-op only when the document is absent.
    ///
    /// # Errors
    ///
    /// Returns a store error if the transaction fails.
    pub async fn set_locked(&self, locked: bool) -> Result<(), QueueError> {
        self.store
            .run_transaction(&self.queue_id, &|current| {
                if current.is_none() {
                    return TxEffect::Skip;
                }
                TxEffect::Patch(QueuePatch {
                    locked: Some(locked),
                    updated_at: Some(now_ms()),
                    ..QueuePatch::default()
                })
            })
            .await?;
        Ok(())
    }

    /// Start a new session: overwrite the whole document with a freshly
    /// seeded state. A blind write by design — it wins over concurrent
    /// transactions and succeeds even while locked, as the designated escape
    /// hatch.
    ///
    /// # Errors
    ///
    /// Returns a store error if the write fails.
    pub async fn reset(&self) -> Result<(), QueueError> {
        let state = QueueState::seeded(roster::initial_roster(&self.queue_id), now_ms());
        info!(queue_id = %self.queue_id, total = state.students.len(), "queue reset to a fresh session");
        self.store.set(&self.queue_id, state).await?;
        Ok(())
    }
}

// =============================================================================
// HELPERS
// =============================================================================

/// The shared advance computation: presenter status upsert, history append,
/// next-pointer scan. `None` when a precondition elides the advance (locked
/// queue, empty roster).
fn advance_patch(state: &QueueState, status: PresentationStatus, now: i64) -> Option<QueuePatch> {
    if state.locked {
        return None;
    }
    let presenter = presenter_index(state.current_index, state.students.len())?;
    let presenter_id = &state.students[presenter].id;

    let mut statuses = if state.statuses.is_empty() {
        default_statuses(&state.students)
    } else {
        state.statuses.clone()
    };
    upsert_status(&mut statuses, presenter_id, status);

    let mut history = state.history.clone();
    history.push(HistoryEntry { student_id: presenter_id.clone(), status, timestamp: now });

    let next = next_unpresented_index(&state.students, &statuses, presenter);

    Some(QueuePatch {
        current_index: Some(as_index(next)),
        updated_at: Some(now),
        statuses: Some(statuses),
        history: Some(history),
        ..QueuePatch::default()
    })
}

fn as_index(slot: usize) -> i64 {
    i64::try_from(slot).unwrap_or(i64::MAX)
}

#[cfg(test)]
#[path = "service_test.rs"]
mod tests;
