//! View projection — read-only snapshot data for display collaborators.
//!
//! DESIGN
//! ======
//! `QueueView` is recomputed from every committed snapshot and holds no
//! state of its own. Display pages, the voice announcer and the export
//! surface all consume this shape; none of them read the raw document.
//! `loading` is true only until the first snapshot (or its absence) has been
//! observed.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

use crate::position::{observers_for_presenter, presenter_index};
use crate::queue::{HistoryEntry, QueueState, Student, StudentStatus, floored_mod};
use crate::store::QueueStore;

// =============================================================================
// TYPES
// =============================================================================

/// A student reference as shown on display pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: String,
    pub name: String,
}

impl Participant {
    fn of(student: &Student) -> Self {
        Self { id: student.id.clone(), name: student.name.clone() }
    }
}

/// Roster row for tables and export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterRow {
    pub id: String,
    pub name: String,
    pub order: u32,
}

/// Read-only projection of one queue snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueView {
    pub presenter: Option<Participant>,
    /// The cyclically next roster entry, shown as "up next".
    pub next_presenter: Option<Participant>,
    pub observers: Vec<Participant>,
    pub next_observers: Vec<Participant>,
    pub total: usize,
    pub current_index: i64,
    pub loading: bool,
    pub locked: bool,
    pub history: Vec<HistoryEntry>,
    pub statuses: Vec<StudentStatus>,
    pub students: Vec<RosterRow>,
}

impl QueueView {
    /// The placeholder view held before the first snapshot arrives.
    #[must_use]
    pub fn pending() -> Self {
        Self {
            presenter: None,
            next_presenter: None,
            observers: Vec::new(),
            next_observers: Vec::new(),
            total: 0,
            current_index: 0,
            loading: true,
            locked: false,
            history: Vec::new(),
            statuses: Vec::new(),
            students: Vec::new(),
        }
    }

    /// Project a committed snapshot. An absent document or an empty roster
    /// yields a fully blank, non-loading view.
    #[must_use]
    pub fn project(snapshot: Option<&QueueState>) -> Self {
        let Some(state) = snapshot.filter(|s| !s.students.is_empty()) else {
            return Self { loading: false, ..Self::pending() };
        };

        let total = state.students.len();
        let presenter_slot = presenter_index(state.current_index, total);
        let presenter = presenter_slot.and_then(|i| state.students.get(i));

        let next_slot = floored_mod(state.current_index + 1, total);
        let next = state.students.get(next_slot);

        Self {
            presenter: presenter.map(Participant::of),
            next_presenter: next.map(Participant::of),
            observers: observer_refs(&state.students, presenter),
            next_observers: observer_refs(&state.students, next),
            total,
            current_index: state.current_index,
            loading: false,
            locked: state.locked,
            history: state.history.clone(),
            statuses: state.statuses.clone(),
            students: state
                .students
                .iter()
                .map(|s| RosterRow { id: s.id.clone(), name: s.name.clone(), order: s.order })
                .collect(),
        }
    }
}

fn observer_refs(students: &[Student], presenter: Option<&Student>) -> Vec<Participant> {
    presenter
        .map(|p| observers_for_presenter(students, p).into_iter().map(Participant::of).collect())
        .unwrap_or_default()
}

// =============================================================================
// SUBSCRIPTION
// =============================================================================

/// Subscribe to projected views of a queue. The returned receiver starts at
/// [`QueueView::pending`] and then tracks every committed snapshot (fast
/// sequences may coalesce; each observed view is internally consistent).
pub async fn watch_view(store: Arc<dyn QueueStore>, queue_id: &str) -> watch::Receiver<QueueView> {
    let mut snapshots = store.subscribe(queue_id).await;
    let (tx, rx) = watch::channel(QueueView::pending());
    let queue_id = queue_id.to_owned();

    tokio::spawn(async move {
        // The subscription's current value counts as the first snapshot,
        // including "document does not exist yet".
        loop {
            let view = {
                let snapshot = snapshots.borrow_and_update();
                QueueView::project(snapshot.as_ref())
            };
            if tx.send(view).is_err() {
                debug!(%queue_id, "view subscribers dropped, stopping projection");
                return;
            }
            if snapshots.changed().await.is_err() {
                return;
            }
        }
    });

    rx
}

#[cfg(test)]
#[path = "view_test.rs"]
mod tests;
