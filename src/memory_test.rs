use super::*;
use crate::queue::{QueueState, Student};
use crate::store::{QueuePatch, TxEffect};

fn student(id: &str, name: &str, order: u32) -> Student {
    Student { id: id.into(), name: name.into(), order, observer1_name: None, observer2_name: None }
}

fn base_state() -> QueueState {
    QueueState::seeded(vec![student("s1", "Alpha", 1), student("s2", "Beta", 2)], 100)
}

#[tokio::test]
async fn get_absent_document_is_none() {
    let store = MemoryStore::new();
    assert!(store.get("nowhere").await.unwrap().is_none());
}

#[tokio::test]
async fn set_then_get_round_trips() {
    let store = MemoryStore::new();
    let state = base_state();
    store.set("q", state.clone()).await.unwrap();
    assert_eq!(store.get("q").await.unwrap(), Some(state));
}

#[tokio::test]
async fn set_overwrites_blindly() {
    let store = MemoryStore::new();
    let mut first = base_state();
    first.locked = true;
    store.set("q", first).await.unwrap();
    store.set("q", base_state()).await.unwrap();
    assert!(!store.get("q").await.unwrap().unwrap().locked);
}

#[tokio::test]
async fn update_absent_document_fails_with_missing() {
    let store = MemoryStore::new();
    let err = store.update("ghost", QueuePatch::default()).await.unwrap_err();
    assert!(matches!(err, StoreError::Missing(ref id) if id == "ghost"));
}

#[tokio::test]
async fn update_applies_patch_to_existing_document() {
    let store = MemoryStore::new();
    store.set("q", base_state()).await.unwrap();
    store
        .update("q", QueuePatch { locked: Some(true), updated_at: Some(200), ..QueuePatch::default() })
        .await
        .unwrap();
    let state = store.get("q").await.unwrap().unwrap();
    assert!(state.locked);
    assert_eq!(state.updated_at, 200);
}

#[tokio::test]
async fn transaction_set_creates_document() {
    let store = MemoryStore::new();
    store.run_transaction("q", &|current| {
        assert!(current.is_none());
        TxEffect::Set(base_state())
    })
    .await
    .unwrap();
    assert!(store.get("q").await.unwrap().is_some());
}

#[tokio::test]
async fn transaction_skip_commits_nothing() {
    let store = MemoryStore::new();
    store.set("q", base_state()).await.unwrap();
    let mut rx = store.subscribe("q").await;
    rx.borrow_and_update();

    store.run_transaction("q", &|_| TxEffect::Skip).await.unwrap();

    assert!(!rx.has_changed().unwrap(), "skip must not publish a snapshot");
    assert_eq!(store.get("q").await.unwrap(), Some(base_state()));
}

#[tokio::test]
async fn transaction_patch_on_absent_document_fails() {
    let store = MemoryStore::new();
    let err = store
        .run_transaction("ghost", &|_| TxEffect::Patch(QueuePatch::default()))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Missing(_)));
}

#[tokio::test]
async fn subscribers_see_committed_states_in_order() {
    let store = MemoryStore::new();
    let mut rx = store.subscribe("q").await;
    assert!(rx.borrow_and_update().is_none());

    store.set("q", base_state()).await.unwrap();
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().as_ref().map(|s| s.current_index), Some(0));

    store
        .update("q", QueuePatch { current_index: Some(1), ..QueuePatch::default() })
        .await
        .unwrap();
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().as_ref().map(|s| s.current_index), Some(1));
}

#[tokio::test]
async fn slow_subscriber_coalesces_to_latest_state() {
    let store = MemoryStore::new();
    let mut rx = store.subscribe("q").await;
    rx.borrow_and_update();

    for index in 0..5_i64 {
        store
            .run_transaction("q", &|current| match current {
                None => TxEffect::Set(base_state()),
                Some(_) => TxEffect::Patch(QueuePatch { current_index: Some(index), ..QueuePatch::default() }),
            })
            .await
            .unwrap();
    }

    rx.changed().await.unwrap();
    // Intermediate states may be skipped; the final one must be consistent.
    assert_eq!(rx.borrow_and_update().as_ref().map(|s| s.current_index), Some(4));
}
