//! Shared fakes for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::Notify;

use dinehub_auth::session::{AuthApi, LoginRequest};
use dinehub_core::AppResult;
use dinehub_core::config::{NotificationsConfig, RealtimeConfig};
use dinehub_core::error::AppError;
use dinehub_core::types::id::{BranchId, NotificationId, UserId};
use dinehub_entity::branch::{BranchOption, BranchOptions};
use dinehub_entity::notification::{NotificationCategory, NotificationPage, NotificationRecord};
use dinehub_entity::user::{Identity, RoleLevel};
use dinehub_realtime::NotificationHost;
use dinehub_realtime::transport::MemoryTransport;
use dinehub_service::branch::BranchApi;
use dinehub_service::notification::{FetchRequest, NotificationApi};

/// Endpoint used by every test host.
pub const ENDPOINT: &str = "mem://live";

pub fn manager() -> Identity {
    Identity::new(UserId(3), RoleLevel::Manager, "Mara")
}

pub fn waiter() -> Identity {
    Identity::new(UserId(4), RoleLevel::Waiter, "Wes")
}

pub fn record(id: i64, branch: Option<i64>, read: bool) -> NotificationRecord {
    NotificationRecord {
        id: NotificationId(id),
        user_id: Some(UserId(3)),
        branch_id: branch.map(BranchId),
        title: format!("Notification {id}"),
        message: String::new(),
        category: NotificationCategory::Order,
        link: None,
        read,
        created_at: Utc.with_ymd_and_hms(2026, 6, 1, 9, 0, 0).unwrap(),
    }
}

/// Auth service with a scripted outcome.
#[derive(Default)]
pub struct FakeAuth {
    pub stored: AtomicBool,
    pub session: Mutex<Option<Identity>>,
    pub logout_calls: AtomicUsize,
}

impl FakeAuth {
    pub fn with_session(identity: Identity) -> Self {
        Self {
            session: Mutex::new(Some(identity)),
            ..Default::default()
        }
    }
}

#[async_trait]
impl AuthApi for FakeAuth {
    async fn check_session(&self) -> AppResult<Identity> {
        self.session
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| AppError::authentication("no session"))
    }

    async fn get_identity(&self) -> AppResult<Identity> {
        self.check_session().await
    }

    fn has_stored_credential(&self) -> bool {
        self.stored.load(Ordering::SeqCst)
    }

    async fn login(&self, request: LoginRequest) -> AppResult<Identity> {
        let identity = match request.username.as_str() {
            "mara" => manager(),
            "wes" => waiter(),
            _ => return Err(AppError::authentication("bad credentials")),
        };
        self.stored.store(true, Ordering::SeqCst);
        *self.session.lock().unwrap() = Some(identity.clone());
        Ok(identity)
    }

    async fn logout(&self) -> AppResult<()> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        self.stored.store(false, Ordering::SeqCst);
        *self.session.lock().unwrap() = None;
        Ok(())
    }

    fn access_token(&self) -> Option<String> {
        self.has_stored_credential().then(|| "token-1".to_string())
    }
}

/// Notification service serving a fixed page.
#[derive(Default)]
pub struct FakeNotifications {
    /// `None` makes fetch fail.
    pub page: Mutex<Option<NotificationPage>>,
    pub requests: Mutex<Vec<FetchRequest>>,
    pub mutations: Mutex<Vec<String>>,
    /// When set, fetches wait for a notification before answering.
    pub hold: Mutex<Option<Arc<Notify>>>,
}

impl FakeNotifications {
    pub fn serving(records: Vec<NotificationRecord>) -> Self {
        let unread = records.iter().filter(|r| !r.read).count() as u32;
        Self {
            page: Mutex::new(Some(NotificationPage {
                notifications: records,
                unread_count: unread,
            })),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn fetch_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<FetchRequest> {
        self.requests.lock().unwrap().last().copied()
    }

    /// Make later fetches wait on the returned handle.
    pub fn hold_fetches(&self) -> Arc<Notify> {
        let hold = Arc::new(Notify::new());
        *self.hold.lock().unwrap() = Some(hold.clone());
        hold
    }

    pub fn mutations(&self) -> Vec<String> {
        self.mutations.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationApi for FakeNotifications {
    async fn fetch(&self, request: FetchRequest) -> AppResult<NotificationPage> {
        self.requests.lock().unwrap().push(request);
        let hold = self.hold.lock().unwrap().clone();
        if let Some(hold) = hold {
            hold.notified().await;
        }
        self.page
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| AppError::transport("notifications unavailable"))
    }

    async fn mark_read(&self, id: NotificationId) -> AppResult<()> {
        self.mutations.lock().unwrap().push(format!("read:{id}"));
        Ok(())
    }

    async fn mark_all_read(&self) -> AppResult<()> {
        self.mutations.lock().unwrap().push("read-all".into());
        Ok(())
    }

    async fn clear_all(&self) -> AppResult<()> {
        self.mutations.lock().unwrap().push("clear".into());
        Ok(())
    }
}

/// Branch service with two branches.
#[derive(Default)]
pub struct FakeBranches {
    pub current: Mutex<Option<BranchId>>,
    pub reject_selection: AtomicBool,
    pub selections: Mutex<Vec<BranchId>>,
}

#[async_trait]
impl BranchApi for FakeBranches {
    async fn list_branch_options(&self) -> AppResult<BranchOptions> {
        Ok(BranchOptions {
            options: vec![
                BranchOption {
                    id: BranchId(1),
                    name: "Harbor".into(),
                },
                BranchOption {
                    id: BranchId(2),
                    name: "Old Town".into(),
                },
            ],
            current: *self.current.lock().unwrap(),
        })
    }

    async fn set_current_branch(&self, id: BranchId) -> AppResult<()> {
        if self.reject_selection.load(Ordering::SeqCst) {
            return Err(AppError::authorization("branch not assigned"));
        }
        self.selections.lock().unwrap().push(id);
        *self.current.lock().unwrap() = Some(id);
        Ok(())
    }
}

/// A host over fakes plus handles on each fake.
pub struct Harness {
    pub host: Arc<NotificationHost>,
    pub notifications: Arc<FakeNotifications>,
    pub branches: Arc<FakeBranches>,
    pub transport: MemoryTransport,
}

impl Harness {
    pub fn new(notifications: FakeNotifications) -> Self {
        let notifications = Arc::new(notifications);
        let branches = Arc::new(FakeBranches::default());
        let transport = MemoryTransport::new();
        let realtime = RealtimeConfig {
            endpoint: ENDPOINT.to_string(),
            ..RealtimeConfig::default()
        };
        let host = NotificationHost::new(
            notifications.clone(),
            branches.clone(),
            Arc::new(transport.clone()),
            &realtime,
            &NotificationsConfig::default(),
        );
        Self {
            host: Arc::new(host),
            notifications,
            branches,
            transport,
        }
    }

    /// Deliver a `new_notification` push to every open connection.
    pub fn push(&self, payload: serde_json::Value) -> usize {
        self.transport.push("new_notification", payload)
    }
}

/// Poll `condition` until it holds or a second passes.
pub async fn eventually(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..100 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
