//! Live transport contract.
//!
//! A transport opens one bidirectional, event-named connection. The channel
//! layer only ever speaks to [`LiveConnection`], so the WebSocket client and
//! the in-memory transport are interchangeable.

pub mod memory;
pub mod websocket;

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::Value;

use dinehub_core::AppResult;

pub use memory::{MemoryConnection, MemoryTransport};
pub use websocket::WsTransport;

/// Listener invoked with the payload of each inbound event.
pub type EventCallback = Arc<dyn Fn(Value) + Send + Sync>;

/// Options applied when connecting.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Send the client's credential along with the connection request.
    pub with_credentials: bool,
    /// Bearer credential to attach when `with_credentials` is set.
    pub access_token: Option<String>,
}

impl std::fmt::Debug for ConnectOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectOptions")
            .field("with_credentials", &self.with_credentials)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Opens live connections.
#[async_trait]
pub trait LiveTransport: Send + Sync {
    /// Connect to `endpoint`.
    async fn connect(
        &self,
        endpoint: &str,
        options: ConnectOptions,
    ) -> AppResult<Box<dyn LiveConnection>>;
}

/// One open live connection.
pub trait LiveConnection: Send + Sync {
    /// Queue an outbound event.
    fn emit(&self, event: &str, payload: Value) -> AppResult<()>;

    /// Register the listener for `event`, replacing any previous one.
    fn on(&self, event: &str, callback: EventCallback);

    /// Remove the listener for `event`.
    fn off(&self, event: &str);

    /// Close the connection. Idempotent.
    fn disconnect(&self);

    /// Whether the connection is still usable.
    fn is_connected(&self) -> bool;
}

/// Event name → listener table shared by the transports.
#[derive(Default)]
pub(crate) struct ListenerTable {
    listeners: RwLock<HashMap<String, EventCallback>>,
}

impl ListenerTable {
    pub(crate) fn insert(&self, event: &str, callback: EventCallback) {
        if let Ok(mut listeners) = self.listeners.write() {
            listeners.insert(event.to_string(), callback);
        }
    }

    pub(crate) fn remove(&self, event: &str) {
        if let Ok(mut listeners) = self.listeners.write() {
            listeners.remove(event);
        }
    }

    pub(crate) fn clear(&self) {
        if let Ok(mut listeners) = self.listeners.write() {
            listeners.clear();
        }
    }

    pub(crate) fn contains(&self, event: &str) -> bool {
        self.listeners
            .read()
            .map(|listeners| listeners.contains_key(event))
            .unwrap_or(false)
    }

    /// Invoke the listener for `event`. The table lock is released before
    /// the callback runs. Returns whether a listener was found.
    pub(crate) fn dispatch(&self, event: &str, payload: Value) -> bool {
        let callback = self
            .listeners
            .read()
            .ok()
            .and_then(|listeners| listeners.get(event).cloned());
        match callback {
            Some(callback) => {
                callback(payload);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_listener_table_dispatch() {
        let table = ListenerTable::default();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        table.insert(
            "ping",
            Arc::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        assert!(table.dispatch("ping", Value::Null));
        assert!(!table.dispatch("other", Value::Null));
        table.remove("ping");
        assert!(!table.dispatch("ping", Value::Null));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_connect_options_redact_token() {
        let options = ConnectOptions {
            with_credentials: true,
            access_token: Some("secret-token".into()),
        };
        let debug = format!("{options:?}");
        assert!(!debug.contains("secret-token"));
    }
}
