//! One live connection per authenticated identity.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::json;
use tracing::{debug, info, warn};

use dinehub_core::AppResult;
use dinehub_core::config::RealtimeConfig;
use dinehub_core::types::id::UserId;

use crate::message::{LocalIdSequence, normalize_push};
use crate::notification::NotificationFeed;
use crate::transport::{ConnectOptions, EventCallback, LiveConnection, LiveTransport};

/// Supplies the bearer credential at connect time.
pub type TokenSource = Arc<dyn Fn() -> Option<String> + Send + Sync>;

struct ActiveConnection {
    user_id: UserId,
    endpoint: String,
    connection: Box<dyn LiveConnection>,
}

/// The live event channel.
///
/// Pushes are normalized and merged into the feed. The branch scope is read
/// from the feed's scope cell when each push arrives.
pub struct LiveChannel {
    transport: Arc<dyn LiveTransport>,
    config: RealtimeConfig,
    feed: Arc<NotificationFeed>,
    token_source: Option<TokenSource>,
    local_ids: Arc<LocalIdSequence>,
    active: Mutex<Option<ActiveConnection>>,
    /// Serializes `open` so two connects never race.
    open_lock: tokio::sync::Mutex<()>,
    /// Bumped by every `close`; handlers and pending connects from an
    /// older generation are inert.
    generation: Arc<AtomicU64>,
}

impl std::fmt::Debug for LiveChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveChannel")
            .field("user", &self.current_user())
            .field("push_event", &self.config.push_event)
            .finish_non_exhaustive()
    }
}

impl LiveChannel {
    /// Create a closed channel that feeds `feed`.
    pub fn new(
        transport: Arc<dyn LiveTransport>,
        config: RealtimeConfig,
        feed: Arc<NotificationFeed>,
    ) -> Self {
        Self {
            transport,
            config,
            feed,
            token_source: None,
            local_ids: Arc::new(LocalIdSequence::new()),
            active: Mutex::new(None),
            open_lock: tokio::sync::Mutex::new(()),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Set where the bearer credential comes from.
    pub fn set_token_source(&mut self, source: TokenSource) {
        self.token_source = Some(source);
    }

    /// Open the connection for `user_id`.
    ///
    /// No-op when already open for the same user and endpoint. Any other
    /// open connection is torn down first.
    pub async fn open(&self, user_id: UserId, endpoint: &str) -> AppResult<()> {
        let _guard = self.open_lock.lock().await;
        if self.is_open_for(user_id, endpoint) {
            debug!(user_id = %user_id, "Live channel already open");
            return Ok(());
        }
        self.close();

        let generation = self.generation.load(Ordering::SeqCst);
        let options = ConnectOptions {
            with_credentials: self.config.with_credentials,
            access_token: if self.config.with_credentials {
                self.token_source.as_ref().and_then(|source| source())
            } else {
                None
            },
        };
        let connection = self.transport.connect(endpoint, options).await?;

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(user_id = %user_id, "Channel closed while connecting, dropping connection");
            connection.disconnect();
            return Ok(());
        }

        connection.on(&self.config.push_event, self.push_handler(generation));
        if let Err(e) = connection.emit(&self.config.join_event, json!(user_id)) {
            warn!(user_id = %user_id, "Failed to send join event: {}", e);
        }
        info!(user_id = %user_id, endpoint = %endpoint, "Live channel opened");

        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        *active = Some(ActiveConnection {
            user_id,
            endpoint: endpoint.to_string(),
            connection,
        });
        Ok(())
    }

    /// Deregister the push listener and disconnect. Safe to call when closed.
    pub fn close(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let previous = self
            .active
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(active) = previous {
            active.connection.off(&self.config.push_event);
            active.connection.disconnect();
            info!(user_id = %active.user_id, "Live channel closed");
        }
    }

    /// Whether a connection is held.
    pub fn is_open(&self) -> bool {
        self.current_user().is_some()
    }

    /// The user the open connection belongs to.
    pub fn current_user(&self) -> Option<UserId> {
        self.active
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|active| active.user_id)
    }

    fn is_open_for(&self, user_id: UserId, endpoint: &str) -> bool {
        self.active
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .is_some_and(|active| {
                active.user_id == user_id
                    && active.endpoint == endpoint
                    && active.connection.is_connected()
            })
    }

    fn push_handler(&self, generation: u64) -> EventCallback {
        let feed = self.feed.clone();
        let scope = feed.scope().clone();
        let local_ids = self.local_ids.clone();
        let current = self.generation.clone();

        Arc::new(move |payload| {
            if current.load(Ordering::SeqCst) != generation {
                return;
            }
            match normalize_push(&payload, &local_ids) {
                Ok(record) => {
                    feed.on_live_push(record, scope.load());
                }
                Err(e) => warn!("Skipping live push: {}", e),
            }
        })
    }
}

impl Drop for LiveChannel {
    fn drop(&mut self) {
        self.close();
    }
}
