//! Position resolver — pure rotation arithmetic.
//!
//! DESIGN
//! ======
//! Everything here is side-effect-free and operates on a logical pointer plus
//! a roster length. All wraparound uses floored modulo so negative pointers
//! (from `prev` or legacy data) resolve to a valid roster slot. "No
//! presenter" exists only for an empty roster; there is no numeric sentinel.

use crate::ledger::status_of;
use crate::queue::{PresentationStatus, Student, StudentStatus, floored_mod};

/// Roster slot of the current presenter, normalized into `[0, total)`.
/// `None` iff the roster is empty.
#[must_use]
pub fn presenter_index(current_index: i64, total: usize) -> Option<usize> {
    if total == 0 {
        return None;
    }
    Some(floored_mod(current_index, total))
}

/// Roster slots of the positional observers: the one (roster of two) or two
/// (roster of three or more) entries immediately following the presenter,
/// cyclically. Empty when the roster has fewer than two students.
#[must_use]
pub fn observer_indexes(current_index: i64, total: usize) -> Vec<usize> {
    let Some(presenter) = presenter_index(current_index, total) else {
        return Vec::new();
    };
    match total {
        0 | 1 => Vec::new(),
        2 => vec![(presenter + 1) % total],
        _ => vec![(presenter + 1) % total, (presenter + 2) % total],
    }
}

/// Observers for a specific presenter, two-tier:
///
/// 1. If the presenter carries explicit `observer1_name`/`observer2_name`
///    assignments, resolve each by case-insensitive name match against the
///    roster. Names with no match are skipped; a duplicate match is returned
///    once.
/// 2. If neither name is set, fall back to [`observer_indexes`] over the
///    presenter's roster position.
#[must_use]
pub fn observers_for_presenter<'a>(students: &'a [Student], presenter: &Student) -> Vec<&'a Student> {
    if presenter.observer1_name.is_none() && presenter.observer2_name.is_none() {
        let Some(pos) = students.iter().position(|s| s.id == presenter.id) else {
            return Vec::new();
        };
        let pos = i64::try_from(pos).unwrap_or(0);
        return observer_indexes(pos, students.len()).into_iter().filter_map(|i| students.get(i)).collect();
    }

    let mut observers: Vec<&Student> = Vec::with_capacity(2);
    for name in [&presenter.observer1_name, &presenter.observer2_name].into_iter().flatten() {
        let Some(found) = students.iter().find(|s| s.name.eq_ignore_ascii_case(name)) else {
            continue;
        };
        if !observers.iter().any(|o| o.id == found.id) {
            observers.push(found);
        }
    }
    observers
}

/// Next roster slot after an advance: scan forward cyclically from the
/// presenter and return the first slot whose student is still
/// [`PresentationStatus::NotYet`]. When no student remains unresolved after a
/// full cycle the pointer parks on the presenter's own slot.
///
/// # Panics
///
/// Panics if `students` is empty or `presenter` is out of range; callers
/// resolve the presenter slot first.
#[must_use]
pub fn next_unpresented_index(students: &[Student], statuses: &[StudentStatus], presenter: usize) -> usize {
    assert!(presenter < students.len(), "presenter slot out of range");
    let total = students.len();
    for step in 1..=total {
        let candidate = (presenter + step) % total;
        if status_of(statuses, &students[candidate].id) == PresentationStatus::NotYet {
            return candidate;
        }
    }
    presenter
}

#[cfg(test)]
#[path = "position_test.rs"]
mod tests;
