use super::*;
use crate::queue::ALL_QUEUE_IDS;

#[test]
fn every_configured_queue_has_a_non_empty_roster() {
    for queue_id in ALL_QUEUE_IDS {
        let roster = initial_roster(queue_id);
        assert!(!roster.is_empty(), "roster for {queue_id} must not be empty");
    }
}

#[test]
fn roster_orders_are_unique_and_one_based() {
    for queue_id in ALL_QUEUE_IDS {
        let roster = initial_roster(queue_id);
        let mut orders: Vec<u32> = roster.iter().map(|s| s.order).collect();
        orders.sort_unstable();
        orders.dedup();
        assert_eq!(orders.len(), roster.len(), "duplicate order in {queue_id}");
        assert_eq!(orders.first(), Some(&1), "orders in {queue_id} must start at 1");
    }
}

#[test]
fn roster_ids_are_unique_per_queue() {
    for queue_id in ALL_QUEUE_IDS {
        let roster = initial_roster(queue_id);
        let mut ids: Vec<&str> = roster.iter().map(|s| s.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), roster.len(), "duplicate student id in {queue_id}");
    }
}

#[test]
fn lookup_is_case_insensitive() {
    assert_eq!(initial_roster("X-RPL"), initial_roster("x-rpl"));
    assert_eq!(queue_meta("Xi-Dkv"), queue_meta("xi-dkv"));
}

#[test]
fn unknown_queue_falls_back_to_placeholder_roster() {
    let roster = initial_roster("xii-unknown");
    assert_eq!(roster.len(), 10);
    assert_eq!(roster[0].id, "general-1");
    assert_eq!(roster[0].order, 1);
}

#[test]
fn queue_meta_known_and_unknown() {
    let meta = queue_meta("x-rpl").expect("x-rpl is configured");
    assert_eq!(meta.label, "X1");
    assert_eq!(meta.room, "Ruang X1");
    assert!(queue_meta("xii-unknown").is_none());
}
