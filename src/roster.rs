//! Static roster configuration.
//!
//! DESIGN
//! ======
//! Rosters are fixed per school day and are not edited through this system,
//! so they ship as embedded YAML parsed once at first use. Lookup never
//! fails: unknown queue ids get a generated placeholder roster so display
//! pages degrade gracefully instead of erroring.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::Deserialize;

use crate::queue::Student;

/// Number of students in the generated placeholder roster.
const PLACEHOLDER_ROSTER_LEN: u32 = 10;

/// Display metadata for a configured queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueMeta {
    /// Short class label shown on display pages (e.g. `"X1"`).
    pub label: String,
    /// Room name announced alongside the presenter.
    pub room: String,
}

#[derive(Debug, Deserialize)]
struct QueueConfig {
    label: String,
    room: String,
    students: Vec<Student>,
}

static ROSTERS: LazyLock<HashMap<String, QueueConfig>> = LazyLock::new(|| {
    serde_yaml::from_str(include_str!("rosters.yaml")).expect("embedded roster configuration must parse")
});

/// The initial roster for a queue. Case-insensitive on the id; unknown ids
/// fall back to a generated placeholder roster. Never empty, never fails.
#[must_use]
pub fn initial_roster(queue_id: &str) -> Vec<Student> {
    let key = queue_id.to_ascii_lowercase();
    ROSTERS.get(&key).map_or_else(placeholder_roster, |cfg| cfg.students.clone())
}

/// Display metadata for a configured queue id, if known.
#[must_use]
pub fn queue_meta(queue_id: &str) -> Option<QueueMeta> {
    let key = queue_id.to_ascii_lowercase();
    ROSTERS.get(&key).map(|cfg| QueueMeta { label: cfg.label.clone(), room: cfg.room.clone() })
}

/// Generic roster used for queue ids outside the configured set.
fn placeholder_roster() -> Vec<Student> {
    (1..=PLACEHOLDER_ROSTER_LEN)
        .map(|order| Student {
            id: format!("general-{order}"),
            name: format!("General Student {order}"),
            order,
            observer1_name: None,
            observer2_name: None,
        })
        .collect()
}

#[cfg(test)]
#[path = "roster_test.rs"]
mod tests;
