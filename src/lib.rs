//! Classroom presentation turn-tracker core.
//!
//! Several independent queues (one per class) each hold an ordered roster, a
//! shared rotation pointer, per-student presentation status, and an
//! append-only resolution history. Admin devices advance, skip, recall, jump
//! or reset a queue; display pages subscribe to committed snapshots and show
//! the current and next presenter with their observers. All mutation goes
//! through optimistic transactions against a keyed document store, so
//! concurrent admin actions from multiple devices can never consume the same
//! turn.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`queue`] | Canonical document shape and shared helpers |
//! | [`roster`] | Static per-class roster configuration |
//! | [`position`] | Pure rotation/observer index arithmetic |
//! | [`store`] | Transactional document store boundary |
//! | [`memory`] | In-process reference store implementation |
//! | [`service`] | Turn-changing operations (advance/skip/recall/...) |
//! | [`ledger`] | Status/history read access |
//! | [`view`] | Snapshot projection for display collaborators |
//! | [`export`] | History CSV export |

pub mod export;
pub mod ledger;
pub mod memory;
pub mod position;
pub mod queue;
pub mod roster;
pub mod service;
pub mod store;
pub mod view;

pub use memory::MemoryStore;
pub use queue::{
    ALL_QUEUE_IDS, DEFAULT_QUEUE_ID, HistoryEntry, PresentationStatus, QueueState, Student, StudentStatus,
};
pub use service::{AdvanceOutcome, QueueError, QueueService};
pub use store::{QueuePatch, QueueStore, Snapshot, StoreError, TxEffect};
pub use view::{Participant, QueueView, watch_view};
