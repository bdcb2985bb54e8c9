//! The authoritative in-memory notification list.
//!
//! The feed merges two sources: snapshot loads from the notification service
//! and records pushed over the live channel. State lives in a `watch` sender
//! so observers see every change; all mutation happens inside short
//! synchronous closures and never across an `.await`.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use dinehub_core::types::id::NotificationId;
use dinehub_entity::branch::BranchScope;
use dinehub_entity::notification::NotificationRecord;
use dinehub_service::notification::{FetchRequest, NotificationApi};

use crate::scope::ScopeCell;

/// Observable feed state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedState {
    /// Records, newest first.
    pub records: Vec<NotificationRecord>,
    /// Unread counter. Never negative.
    pub unread_count: u32,
    /// Whether a snapshot load is in flight.
    pub loading: bool,
}

/// Notification feed controller.
pub struct NotificationFeed {
    api: Arc<dyn NotificationApi>,
    page_size: u32,
    scope: ScopeCell,
    state: watch::Sender<FeedState>,
    /// Bumped by `reset` and `set_scope`; loads started under an older
    /// epoch are discarded.
    epoch: AtomicU64,
    in_flight: AtomicUsize,
}

impl std::fmt::Debug for NotificationFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("NotificationFeed")
            .field("records", &state.records.len())
            .field("unread_count", &state.unread_count)
            .field("scope", &self.scope.load())
            .finish_non_exhaustive()
    }
}

impl NotificationFeed {
    /// Create an empty feed.
    pub fn new(api: Arc<dyn NotificationApi>, page_size: u32, scope: ScopeCell) -> Self {
        let (state, _) = watch::channel(FeedState::default());
        Self {
            api,
            page_size: page_size.max(1),
            scope,
            state,
            epoch: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Replace local state with a fresh page for `scope`.
    ///
    /// A failed fetch empties the feed. A result that lands after `reset` or
    /// `set_scope` is thrown away.
    pub async fn load_snapshot(&self, scope: BranchScope) {
        let epoch = self.epoch.load(Ordering::SeqCst);
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        self.state.send_if_modified(|state| !std::mem::replace(&mut state.loading, true));

        let request = FetchRequest {
            limit: self.page_size,
            branch_id: scope.branch_id(),
        };
        let result = self.api.fetch(request).await;

        let still_loading = self.in_flight.fetch_sub(1, Ordering::SeqCst) > 1;
        if self.epoch.load(Ordering::SeqCst) != epoch {
            debug!(scope = %scope, "Discarding stale notification snapshot");
            self.state.send_modify(|state| state.loading = still_loading);
            return;
        }

        match result {
            Ok(page) => {
                info!(
                    scope = %scope,
                    count = page.notifications.len(),
                    unread = page.unread_count,
                    "Notification snapshot loaded"
                );
                self.state.send_replace(FeedState {
                    records: page.notifications,
                    unread_count: page.unread_count,
                    loading: still_loading,
                });
            }
            Err(e) => {
                warn!(scope = %scope, "Failed to load notifications: {}", e);
                self.state.send_replace(FeedState {
                    loading: still_loading,
                    ..FeedState::default()
                });
            }
        }
    }

    /// Reload the snapshot for the scope currently in the cell.
    pub async fn reload(&self) {
        self.load_snapshot(self.scope.load()).await;
    }

    /// Merge a pushed record. Returns whether it was added.
    pub fn on_live_push(&self, record: NotificationRecord, scope: BranchScope) -> bool {
        if !scope.admits(record.branch_id) {
            debug!(
                id = %record.id,
                scope = %scope,
                "Live notification outside current branch scope"
            );
            return false;
        }

        let id = record.id;
        let added = self.state.send_if_modified(|state| {
            if state.records.iter().any(|existing| existing.id == record.id) {
                return false;
            }
            if record.is_unread() {
                state.unread_count += 1;
            }
            state.records.insert(0, record);
            true
        });
        if added {
            debug!(id = %id, "Live notification added");
        } else {
            debug!(id = %id, "Duplicate live notification ignored");
        }
        added
    }

    /// Mark one record read locally, then tell the backend.
    pub async fn mark_read(&self, id: NotificationId) {
        self.state.send_if_modified(|state| {
            let Some(record) = state.records.iter_mut().find(|record| record.id == id) else {
                return false;
            };
            if !record.mark_read() {
                return false;
            }
            state.unread_count = state.unread_count.saturating_sub(1);
            true
        });

        if id.is_local() {
            return;
        }
        if let Err(e) = self.api.mark_read(id).await {
            warn!(id = %id, "Failed to mark notification read: {}", e);
        }
    }

    /// Mark everything read locally, then tell the backend.
    pub async fn mark_all_read(&self) {
        self.state.send_modify(|state| {
            for record in state.records.iter_mut() {
                record.mark_read();
            }
            state.unread_count = 0;
        });

        if let Err(e) = self.api.mark_all_read().await {
            warn!("Failed to mark all notifications read: {}", e);
        }
    }

    /// Empty the feed locally, then tell the backend.
    pub async fn clear_all(&self) {
        self.state.send_modify(|state| {
            state.records.clear();
            state.unread_count = 0;
        });

        if let Err(e) = self.api.clear_all().await {
            warn!("Failed to clear notifications: {}", e);
        }
    }

    /// Drop all local state and invalidate loads in flight.
    pub fn reset(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        let loading = self.in_flight.load(Ordering::SeqCst) > 0;
        self.state.send_replace(FeedState {
            loading,
            ..FeedState::default()
        });
    }

    /// Change the branch scope. Loads in flight for the old scope are
    /// invalidated; the caller reloads.
    pub fn set_scope(&self, scope: BranchScope) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        let previous = self.scope.store(scope);
        if previous != scope {
            info!(from = %previous, to = %scope, "Branch scope changed");
        }
    }

    /// The shared scope cell.
    pub fn scope(&self) -> &ScopeCell {
        &self.scope
    }

    /// Snapshot of the current state.
    pub fn snapshot(&self) -> FeedState {
        self.state.borrow().clone()
    }

    /// The current records, newest first.
    pub fn records(&self) -> Vec<NotificationRecord> {
        self.state.borrow().records.clone()
    }

    /// The current unread counter.
    pub fn unread_count(&self) -> u32 {
        self.state.borrow().unread_count
    }

    /// Whether a snapshot load is in flight.
    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    /// Receive every state change.
    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.state.subscribe()
    }
}
