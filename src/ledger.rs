//! Status/history ledger — read access over per-student resolutions.
//!
//! DESIGN
//! ======
//! The ledger itself is written only as a byproduct of advance/skip (append
//! and status upsert) and reset (clear); this module provides the read side
//! used by admin tables, the recall-a-skipped-student flow, and export.
//! Missing status entries default to `NotYet` and entries for unknown
//! student ids are ignored, so partially-populated legacy documents resolve
//! without error.

use crate::queue::{PresentationStatus, Student, StudentStatus};

/// Current resolution for a student; [`PresentationStatus::NotYet`] when the
/// ledger has no entry for the id.
#[must_use]
pub fn status_of(statuses: &[StudentStatus], student_id: &str) -> PresentationStatus {
    statuses
        .iter()
        .find(|entry| entry.student_id == student_id)
        .map_or(PresentationStatus::NotYet, |entry| entry.status)
}

/// One `NotYet` entry per student, the seed ledger for a fresh session.
#[must_use]
pub fn default_statuses(students: &[Student]) -> Vec<StudentStatus> {
    students
        .iter()
        .map(|s| StudentStatus { student_id: s.id.clone(), status: PresentationStatus::NotYet })
        .collect()
}

/// Set a student's resolution, inserting the entry if the ledger does not
/// carry one yet (legacy documents).
pub fn upsert_status(statuses: &mut Vec<StudentStatus>, student_id: &str, status: PresentationStatus) {
    if let Some(entry) = statuses.iter_mut().find(|entry| entry.student_id == student_id) {
        entry.status = status;
    } else {
        statuses.push(StudentStatus { student_id: student_id.to_owned(), status });
    }
}

/// Roster entries currently holding the given resolution, in `order` sort.
#[must_use]
pub fn students_with_status<'a>(
    students: &'a [Student],
    statuses: &[StudentStatus],
    status: PresentationStatus,
) -> Vec<&'a Student> {
    let mut matches: Vec<&Student> =
        students.iter().filter(|s| status_of(statuses, &s.id) == status).collect();
    matches.sort_by_key(|s| s.order);
    matches
}

/// Students skipped as absent, candidates for the jump-to recall flow.
#[must_use]
pub fn skipped_students<'a>(students: &'a [Student], statuses: &[StudentStatus]) -> Vec<&'a Student> {
    students_with_status(students, statuses, PresentationStatus::AbsentSkipped)
}

/// Per-status counts for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub done: usize,
    pub absent_skipped: usize,
    pub not_yet: usize,
}

/// Count resolutions across the roster. Extra ledger entries for ids outside
/// the roster are ignored.
#[must_use]
pub fn summarize(students: &[Student], statuses: &[StudentStatus]) -> SessionSummary {
    let mut summary = SessionSummary::default();
    for student in students {
        match status_of(statuses, &student.id) {
            PresentationStatus::Done => summary.done += 1,
            PresentationStatus::AbsentSkipped => summary.absent_skipped += 1,
            PresentationStatus::NotYet => summary.not_yet += 1,
        }
    }
    summary
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
