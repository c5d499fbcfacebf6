//! Queue data model — the canonical shared document shape.
//!
//! DESIGN
//! ======
//! One `QueueState` document exists per queue id and is the only shared
//! mutable entity in the system. It is read and written exclusively through
//! the store boundary (`crate::store`), never cached as a local source of
//! truth. The document shape is serde-compatible with the legacy documents
//! already in production (camelCase keys; `statuses`, `history` and `locked`
//! may be absent on old documents and default on read).
//!
//! Index arithmetic note: `current_index` is a *logical* pointer and may be
//! negative or past the roster length; consumers normalize it with floored
//! modulo (`floored_mod`) so negative values wrap correctly.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

// =============================================================================
// QUEUE IDS
// =============================================================================

/// Queue used when a caller does not specify one.
pub const DEFAULT_QUEUE_ID: &str = "x-rpl";

/// The fixed set of configured queue identifiers (one per class).
pub const ALL_QUEUE_IDS: [&str; 6] = ["x-rpl", "xi-rpl", "x-tkj", "xi-tkj", "x-dkv", "xi-dkv"];

// =============================================================================
// TYPES
// =============================================================================

/// A roster entry. Static configuration data, immutable at runtime.
///
/// `order` is a 1-based display label; index arithmetic always uses the
/// entry's array position, never `order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// Roster-assigned identifier (institutional number), unique per queue.
    pub id: String,
    /// Display name.
    pub name: String,
    /// 1-based roster sequence label.
    pub order: u32,
    /// Explicit first-observer assignment, overriding the positional default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observer1_name: Option<String>,
    /// Explicit second-observer assignment, overriding the positional default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observer2_name: Option<String>,
}

/// Resolution of one student's turn within the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentationStatus {
    /// Has not presented yet; still in rotation.
    NotYet,
    /// Presented successfully.
    Done,
    /// Was absent or skipped; can be recalled later via jump-to.
    AbsentSkipped,
}

/// Current resolution for one student. One entry per student is expected,
/// but readers must tolerate missing entries (default [`PresentationStatus::NotYet`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentStatus {
    pub student_id: String,
    pub status: PresentationStatus,
}

/// One resolution event. Appended by advance/skip, cleared by reset,
/// never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub student_id: String,
    pub status: PresentationStatus,
    /// Milliseconds since Unix epoch.
    pub timestamp: i64,
}

/// The canonical shared queue document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueState {
    /// Roster snapshot seeded at initialization/reset. Not re-derived from
    /// static configuration afterward, so a reset re-seeds it.
    pub students: Vec<Student>,
    /// Logical presenter pointer; normalize before indexing.
    pub current_index: i64,
    /// Wall-clock milliseconds, refreshed on every mutation. Used as a cheap
    /// change signal independent of status content.
    pub updated_at: i64,
    /// Per-student resolution. May be absent/partial on legacy documents.
    #[serde(default)]
    pub statuses: Vec<StudentStatus>,
    /// Append-only resolution log for audit/export.
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    /// When true, all turn-changing operations are no-ops; reset and
    /// lock-toggle remain effective.
    #[serde(default)]
    pub locked: bool,
}

impl QueueState {
    /// Fresh session state: pointer at the first student, every status
    /// [`PresentationStatus::NotYet`], empty history, unlocked.
    #[must_use]
    pub fn seeded(students: Vec<Student>, now: i64) -> Self {
        let statuses = students
            .iter()
            .map(|s| StudentStatus { student_id: s.id.clone(), status: PresentationStatus::NotYet })
            .collect();
        Self { students, current_index: 0, updated_at: now, statuses, history: Vec::new(), locked: false }
    }

    /// Roster position of the student with the given id.
    #[must_use]
    pub fn position_of(&self, student_id: &str) -> Option<usize> {
        self.students.iter().position(|s| s.id == student_id)
    }
}

// =============================================================================
// HELPERS
// =============================================================================

/// Current wall-clock time in milliseconds since the Unix epoch.
#[must_use]
pub fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}

/// Floored modulo into `[0, modulus)`. Unlike truncating `%`, negative values
/// wrap correctly (`floored_mod(-1, 5) == 4`).
///
/// # Panics
///
/// Panics if `modulus` is zero; callers must handle the empty roster first.
#[must_use]
pub fn floored_mod(value: i64, modulus: usize) -> usize {
    assert!(modulus > 0, "floored_mod requires a non-zero modulus");
    let m = i64::try_from(modulus).unwrap_or(i64::MAX);
    usize::try_from(((value % m) + m) % m).unwrap_or(0)
}

#[cfg(test)]
#[path = "queue_test.rs"]
mod tests;
