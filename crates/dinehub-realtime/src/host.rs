//! Notification host: ties the feed and the live channel to the session.
//!
//! The host follows the session provider's identity. A new identity resets
//! the feed, loads a snapshot and opens the channel. No identity closes the
//! channel and clears the feed. It also owns branch selection, which changes
//! the scope cell the push handler reads without reconnecting.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

use dinehub_auth::session::SessionState;
use dinehub_core::AppResult;
use dinehub_core::config::{NotificationsConfig, RealtimeConfig};
use dinehub_core::types::id::UserId;
use dinehub_entity::branch::{BranchOptions, BranchScope};
use dinehub_entity::user::Identity;
use dinehub_service::branch::BranchApi;
use dinehub_service::notification::NotificationApi;

use crate::channel::{LiveChannel, TokenSource};
use crate::notification::NotificationFeed;
use crate::scope::ScopeCell;
use crate::transport::LiveTransport;

/// Owns the notification feed, the live channel and the branch scope.
pub struct NotificationHost {
    feed: Arc<NotificationFeed>,
    channel: LiveChannel,
    branches: Arc<dyn BranchApi>,
    endpoint: String,
    /// Identity the feed and channel currently belong to.
    current: Mutex<Option<UserId>>,
}

impl std::fmt::Debug for NotificationHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationHost")
            .field("endpoint", &self.endpoint)
            .field("feed", &self.feed)
            .field("channel", &self.channel)
            .finish_non_exhaustive()
    }
}

impl NotificationHost {
    /// Build a host with an empty feed scoped to all branches.
    pub fn new(
        notifications: Arc<dyn NotificationApi>,
        branches: Arc<dyn BranchApi>,
        transport: Arc<dyn LiveTransport>,
        realtime: &RealtimeConfig,
        feed_config: &NotificationsConfig,
    ) -> Self {
        let feed = Arc::new(NotificationFeed::new(
            notifications,
            feed_config.page_size,
            ScopeCell::default(),
        ));
        let channel = LiveChannel::new(transport, realtime.clone(), feed.clone());
        Self {
            feed,
            channel,
            branches,
            endpoint: realtime.endpoint.clone(),
            current: Mutex::new(None),
        }
    }

    /// Supply the bearer credential for live connections.
    pub fn with_token_source(mut self, source: TokenSource) -> Self {
        self.channel.set_token_source(source);
        self
    }

    /// Follow an identity change. Repeating the current identity is a no-op.
    pub async fn sync_identity(&self, identity: Option<&Identity>) {
        let mut current = self.current.lock().await;
        let next = identity.map(|identity| identity.id);
        if *current == next {
            return;
        }
        let previous = std::mem::replace(&mut *current, next);

        match identity {
            Some(identity) => {
                info!(user_id = %identity.id, "Starting notifications for identity");
                // Pushes for the previous user must not reach the new feed.
                if previous.is_some() {
                    self.channel.close();
                }
                self.feed.reset();
                self.feed.reload().await;
                if let Err(e) = self.channel.open(identity.id, &self.endpoint).await {
                    warn!(user_id = %identity.id, "Live channel unavailable: {}", e);
                }
            }
            None => {
                info!("Identity cleared, stopping notifications");
                self.channel.close();
                self.feed.reset();
            }
        }
    }

    /// Drive [`sync_identity`](Self::sync_identity) from session transitions
    /// until the session provider goes away.
    pub async fn run(&self, mut session: watch::Receiver<SessionState>) {
        loop {
            let identity = session.borrow_and_update().identity().cloned();
            self.sync_identity(identity.as_ref()).await;
            if session.changed().await.is_err() {
                break;
            }
        }
        debug!("Session provider dropped");
        self.shutdown().await;
    }

    /// Fetch branch options and adopt the server's current branch as scope.
    pub async fn init_branches(&self) -> AppResult<BranchOptions> {
        let options = self.branches.list_branch_options().await?;
        let scope = BranchScope::from(options.current);
        if scope != self.scope() {
            self.feed.set_scope(scope);
            if self.current_user().await.is_some() {
                self.feed.reload().await;
            }
        }
        Ok(options)
    }

    /// Switch the branch scope.
    ///
    /// A concrete branch is confirmed with the branch service first; if that
    /// fails the scope is left alone. The open channel is kept.
    pub async fn select_branch(&self, scope: BranchScope) -> AppResult<()> {
        if let BranchScope::Branch(id) = scope {
            self.branches.set_current_branch(id).await?;
        }
        self.feed.set_scope(scope);
        if self.current_user().await.is_some() {
            self.feed.reload().await;
        }
        Ok(())
    }

    /// Close the live channel and forget the identity.
    pub async fn shutdown(&self) {
        *self.current.lock().await = None;
        self.channel.close();
    }

    /// The notification feed.
    pub fn feed(&self) -> &Arc<NotificationFeed> {
        &self.feed
    }

    /// The live channel.
    pub fn channel(&self) -> &LiveChannel {
        &self.channel
    }

    /// The current branch scope.
    pub fn scope(&self) -> BranchScope {
        self.feed.scope().load()
    }

    /// Identity the host is serving, if any.
    pub async fn current_user(&self) -> Option<UserId> {
        *self.current.lock().await
    }
}
