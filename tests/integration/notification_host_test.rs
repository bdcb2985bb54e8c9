//! Integration tests for the notification host: feed, live channel, and
//! branch scope working together.

mod helpers;

use serde_json::json;

use dinehub_core::types::id::{BranchId, NotificationId};
use dinehub_entity::branch::BranchScope;
use dinehub_service::notification::FetchRequest;

use helpers::{FakeNotifications, Harness, eventually, manager, record, waiter};

#[tokio::test]
async fn test_no_identity_loads_nothing() {
    let h = Harness::new(FakeNotifications::serving(vec![record(1, None, false)]));

    h.host.sync_identity(None).await;

    assert_eq!(h.notifications.fetch_count(), 0);
    assert!(h.transport.connections().is_empty());
    assert!(!h.host.channel().is_open());
    assert!(h.host.feed().records().is_empty());
}

#[tokio::test]
async fn test_identity_loads_snapshot_and_joins() {
    let h = Harness::new(FakeNotifications::serving(vec![
        record(2, Some(1), false),
        record(1, Some(2), true),
    ]));

    h.host.sync_identity(Some(&manager())).await;

    let state = h.host.feed().snapshot();
    assert_eq!(state.records.len(), 2);
    assert_eq!(state.unread_count, 1);
    assert_eq!(
        h.notifications.last_request(),
        Some(FetchRequest {
            limit: 50,
            branch_id: None,
        })
    );

    let connection = h.transport.latest().unwrap();
    assert_eq!(connection.endpoint(), helpers::ENDPOINT);
    assert_eq!(connection.emitted(), vec![("join".to_string(), json!(3))]);

    // Same identity again: nothing new.
    h.host.sync_identity(Some(&manager())).await;
    assert_eq!(h.notifications.fetch_count(), 1);
    assert_eq!(h.transport.connections().len(), 1);
}

#[tokio::test]
async fn test_push_in_scope_lands_first() {
    let h = Harness::new(FakeNotifications::serving(vec![record(1, Some(2), false)]));
    h.host.sync_identity(Some(&manager())).await;

    h.push(json!({"id": 10, "branchId": 2, "title": "Table 4", "type": "order"}));

    let state = h.host.feed().snapshot();
    assert_eq!(state.records[0].id, NotificationId(10));
    assert_eq!(state.records[0].title, "Table 4");
    assert_eq!(state.unread_count, 2);
}

#[tokio::test]
async fn test_push_outside_scope_is_suppressed() {
    let h = Harness::new(FakeNotifications::serving(vec![record(1, Some(2), false)]));
    h.host.sync_identity(Some(&manager())).await;
    h.host
        .select_branch(BranchScope::Branch(BranchId(2)))
        .await
        .unwrap();

    h.push(json!({"id": 11, "branchId": 1}));

    let state = h.host.feed().snapshot();
    assert_eq!(state.records.len(), 1);
    assert_eq!(state.unread_count, 1);
}

#[tokio::test]
async fn test_scope_change_applies_without_reconnect() {
    let h = Harness::new(FakeNotifications::serving(Vec::new()));
    h.host.sync_identity(Some(&manager())).await;

    h.push(json!({"id": 20, "branchId": 1}));
    h.host
        .select_branch(BranchScope::Branch(BranchId(2)))
        .await
        .unwrap();
    h.push(json!({"id": 21, "branchId": 1}));
    h.push(json!({"id": 22, "branchId": 2}));

    assert_eq!(h.transport.connections().len(), 1);
    assert_eq!(h.transport.open_count(), 1);
    assert_eq!(*h.branches.selections.lock().unwrap(), vec![BranchId(2)]);
    assert_eq!(
        h.notifications.last_request().unwrap().branch_id,
        Some(BranchId(2))
    );

    // The reload replaced the feed; only the in-scope push after it remains.
    let ids: Vec<i64> = h.host.feed().records().iter().map(|r| r.id.get()).collect();
    assert_eq!(ids, vec![22]);
}

#[tokio::test]
async fn test_rejected_branch_keeps_scope() {
    let h = Harness::new(FakeNotifications::serving(Vec::new()));
    h.host.sync_identity(Some(&manager())).await;
    h.branches
        .reject_selection
        .store(true, std::sync::atomic::Ordering::SeqCst);

    let err = h
        .host
        .select_branch(BranchScope::Branch(BranchId(1)))
        .await
        .unwrap_err();

    assert_eq!(err.kind, dinehub_core::error::ErrorKind::Authorization);
    assert_eq!(h.host.scope(), BranchScope::All);
    assert_eq!(h.notifications.fetch_count(), 1);
}

#[tokio::test]
async fn test_init_branches_adopts_server_current() {
    let h = Harness::new(FakeNotifications::serving(Vec::new()));
    *h.branches.current.lock().unwrap() = Some(BranchId(1));

    let options = h.host.init_branches().await.unwrap();

    assert_eq!(options.options.len(), 2);
    assert_eq!(h.host.scope(), BranchScope::Branch(BranchId(1)));
    // No identity yet, so no fetch.
    assert_eq!(h.notifications.fetch_count(), 0);

    h.host.sync_identity(Some(&manager())).await;
    assert_eq!(
        h.notifications.last_request().unwrap().branch_id,
        Some(BranchId(1))
    );
}

#[tokio::test]
async fn test_snapshot_failure_leaves_empty_feed() {
    let h = Harness::new(FakeNotifications::failing());

    h.host.sync_identity(Some(&manager())).await;

    let state = h.host.feed().snapshot();
    assert!(state.records.is_empty());
    assert_eq!(state.unread_count, 0);
    assert!(h.host.channel().is_open());
}

#[tokio::test]
async fn test_logout_closes_channel_and_ignores_pushes() {
    let h = Harness::new(FakeNotifications::serving(vec![record(1, None, false)]));
    h.host.sync_identity(Some(&manager())).await;
    let connection = h.transport.latest().unwrap();

    h.host.sync_identity(None).await;

    assert!(!connection.is_connected());
    assert!(!h.host.channel().is_open());
    assert_eq!(h.host.current_user().await, None);
    assert_eq!(h.push(json!({"id": 30})), 0);
    assert!(!connection.deliver("new_notification", json!({"id": 31})));
    assert!(h.host.feed().records().is_empty());
    assert_eq!(h.host.feed().unread_count(), 0);
}

#[tokio::test]
async fn test_identity_switch_reconnects() {
    let h = Harness::new(FakeNotifications::serving(Vec::new()));
    h.host.sync_identity(Some(&manager())).await;
    h.host.sync_identity(Some(&waiter())).await;

    let connections = h.transport.connections();
    assert_eq!(connections.len(), 2);
    assert!(!connections[0].is_connected());
    assert!(connections[1].is_connected());
    assert_eq!(connections[1].emitted(), vec![("join".to_string(), json!(4))]);
    assert_eq!(h.notifications.fetch_count(), 2);
}

#[tokio::test]
async fn test_identity_switch_drops_previous_channel_before_loading() {
    let h = Harness::new(FakeNotifications::serving(Vec::new()));
    h.host.sync_identity(Some(&manager())).await;
    let hold = h.notifications.hold_fetches();

    let switching = tokio::spawn({
        let host = h.host.clone();
        async move { host.sync_identity(Some(&waiter())).await }
    });
    assert!(eventually(|| h.notifications.fetch_count() == 2).await);

    // The new snapshot is still loading and the old connection is gone.
    let connections = h.transport.connections();
    assert_eq!(connections.len(), 1);
    assert!(!connections[0].is_connected());
    assert_eq!(h.push(json!({"id": 90, "title": "For Mara"})), 0);

    hold.notify_one();
    switching.await.unwrap();
    assert!(h.host.feed().records().is_empty());
    assert_eq!(h.transport.open_count(), 1);
    assert_eq!(
        h.transport.latest().unwrap().emitted(),
        vec![("join".to_string(), json!(4))]
    );
}

#[tokio::test]
async fn test_mutations_through_host_feed() {
    let h = Harness::new(FakeNotifications::serving(vec![
        record(1, None, false),
        record(2, None, false),
    ]));
    h.host.sync_identity(Some(&manager())).await;
    let feed = h.host.feed();

    feed.mark_read(NotificationId(1)).await;
    let state = feed.snapshot();
    assert!(state.records[0].read);
    assert!(!state.records[1].read);
    assert_eq!(state.unread_count, 1);

    feed.mark_all_read().await;
    feed.mark_all_read().await;
    assert_eq!(feed.unread_count(), 0);
    assert!(feed.records().iter().all(|r| r.read));

    feed.clear_all().await;
    assert!(feed.records().is_empty());
    assert_eq!(
        h.notifications.mutations(),
        vec!["read:1", "read-all", "read-all", "clear"]
    );
}

#[tokio::test]
async fn test_shutdown_closes_channel() {
    let h = Harness::new(FakeNotifications::serving(Vec::new()));
    h.host.sync_identity(Some(&manager())).await;

    h.host.shutdown().await;

    assert_eq!(h.transport.open_count(), 0);
    assert_eq!(h.host.current_user().await, None);
}
