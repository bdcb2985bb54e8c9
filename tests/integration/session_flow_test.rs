//! Integration tests for the session provider driving the notification host.

mod helpers;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use serde_json::json;

use dinehub_auth::session::{LoginRequest, SessionProvider, SessionState};
use dinehub_core::types::id::UserId;

use helpers::{FakeAuth, FakeNotifications, Harness, eventually, manager, record};

fn login(username: &str) -> LoginRequest {
    LoginRequest {
        username: username.to_string(),
        password: "pw".to_string(),
    }
}

#[tokio::test]
async fn test_anonymous_start_then_login() {
    let auth = Arc::new(FakeAuth::default());
    let session = Arc::new(SessionProvider::new(auth.clone()));
    let h = Harness::new(FakeNotifications::serving(vec![record(1, None, false)]));

    assert_eq!(session.resolve().await, SessionState::Anonymous);

    let runner = h.host.clone();
    let rx = session.subscribe();
    let task = tokio::spawn(async move { runner.run(rx).await });

    tokio::task::yield_now().await;
    assert_eq!(h.notifications.fetch_count(), 0);
    assert!(h.transport.connections().is_empty());

    let identity = session.login(login("mara")).await.unwrap();
    assert_eq!(identity, manager());

    assert!(eventually(|| h.transport.open_count() == 1).await);
    assert!(eventually(|| h.host.feed().records().len() == 1).await);
    assert_eq!(h.notifications.fetch_count(), 1);

    task.abort();
}

#[tokio::test]
async fn test_resumed_session_starts_notifications() {
    let auth = Arc::new(FakeAuth::with_session(manager()));
    auth.stored.store(true, Ordering::SeqCst);
    let session = Arc::new(SessionProvider::new(auth.clone()));
    let h = Harness::new(FakeNotifications::serving(Vec::new()));

    session.resolve().await;
    let runner = h.host.clone();
    let rx = session.subscribe();
    let task = tokio::spawn(async move { runner.run(rx).await });

    assert!(eventually(|| h.transport.open_count() == 1).await);
    let connection = h.transport.latest().unwrap();
    assert_eq!(connection.options().access_token, None);
    assert_eq!(connection.emitted(), vec![("join".to_string(), json!(3))]);

    task.abort();
}

#[tokio::test]
async fn test_logout_stops_notifications() {
    let auth = Arc::new(FakeAuth::with_session(manager()));
    let session = Arc::new(SessionProvider::new(auth.clone()));
    let h = Harness::new(FakeNotifications::serving(vec![record(1, None, false)]));
    session.resolve().await;

    let runner = h.host.clone();
    let rx = session.subscribe();
    let task = tokio::spawn(async move { runner.run(rx).await });
    assert!(eventually(|| h.transport.open_count() == 1).await);

    session.logout().await;

    assert!(eventually(|| h.transport.open_count() == 0).await);
    assert!(eventually(|| h.host.feed().records().is_empty()).await);
    assert_eq!(session.identity(), None);
    assert_eq!(auth.logout_calls.load(Ordering::SeqCst), 1);

    assert_eq!(h.push(json!({"id": 50})), 0);
    assert!(h.host.feed().records().is_empty());
    assert_eq!(h.host.current_user().await, None);

    task.abort();
}

#[tokio::test]
async fn test_switching_users_rejoins() {
    let auth = Arc::new(FakeAuth::default());
    let session = Arc::new(SessionProvider::new(auth.clone()));
    let h = Harness::new(FakeNotifications::serving(Vec::new()));
    session.resolve().await;

    let runner = h.host.clone();
    let rx = session.subscribe();
    let task = tokio::spawn(async move { runner.run(rx).await });

    session.login(login("mara")).await.unwrap();
    assert!(eventually(|| h.transport.connections().len() == 1).await);
    session.login(login("wes")).await.unwrap();
    assert!(eventually(|| h.transport.connections().len() == 2).await);

    assert!(eventually(|| h.transport.open_count() == 1).await);
    assert!(
        eventually(|| {
            h.transport
                .latest()
                .is_some_and(|c| c.emitted() == vec![("join".to_string(), json!(4))])
        })
        .await
    );
    assert!(session.login(login("nobody")).await.is_err());
    assert_eq!(session.identity().map(|i| i.id), Some(UserId(4)));

    task.abort();
}

#[tokio::test]
async fn test_host_stops_when_provider_dropped() {
    let auth = Arc::new(FakeAuth::with_session(manager()));
    let session = SessionProvider::new(auth);
    let h = Harness::new(FakeNotifications::serving(Vec::new()));
    session.resolve().await;

    let runner = h.host.clone();
    let rx = session.subscribe();
    let task = tokio::spawn(async move { runner.run(rx).await });
    assert!(eventually(|| h.transport.open_count() == 1).await);

    drop(session);
    task.await.unwrap();

    assert_eq!(h.transport.open_count(), 0);
}
