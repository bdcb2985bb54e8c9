//! In-process transport for tests and offline runs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use dinehub_core::AppResult;
use dinehub_core::error::AppError;

use super::{ConnectOptions, EventCallback, ListenerTable, LiveConnection, LiveTransport};

/// Transport whose "server" is the test itself.
///
/// Every connection opened through it is kept so the caller can inspect what
/// the client emitted and inject server pushes.
#[derive(Clone, Default)]
pub struct MemoryTransport {
    connections: Arc<Mutex<Vec<Arc<MemoryConnection>>>>,
    refuse: Arc<AtomicBool>,
}

impl std::fmt::Debug for MemoryTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryTransport")
            .field("connections", &self.connections().len())
            .finish()
    }
}

impl MemoryTransport {
    /// Create an empty transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent connects fail with a transport error.
    pub fn refuse_connections(&self, refuse: bool) {
        self.refuse.store(refuse, Ordering::SeqCst);
    }

    /// Every connection opened so far, oldest first.
    pub fn connections(&self) -> Vec<Arc<MemoryConnection>> {
        self.connections
            .lock()
            .map(|connections| connections.clone())
            .unwrap_or_default()
    }

    /// The most recently opened connection.
    pub fn latest(&self) -> Option<Arc<MemoryConnection>> {
        self.connections().last().cloned()
    }

    /// Number of connections still open.
    pub fn open_count(&self) -> usize {
        self.connections()
            .iter()
            .filter(|connection| connection.is_connected())
            .count()
    }

    /// Deliver a server event to every open connection. Returns how many
    /// listeners received it.
    pub fn push(&self, event: &str, payload: Value) -> usize {
        self.connections()
            .iter()
            .filter(|connection| connection.deliver(event, payload.clone()))
            .count()
    }
}

#[async_trait]
impl LiveTransport for MemoryTransport {
    async fn connect(
        &self,
        endpoint: &str,
        options: ConnectOptions,
    ) -> AppResult<Box<dyn LiveConnection>> {
        if self.refuse.load(Ordering::SeqCst) {
            return Err(AppError::transport(format!("Connection to {endpoint} refused")));
        }
        let connection = Arc::new(MemoryConnection {
            endpoint: endpoint.to_string(),
            options,
            listeners: ListenerTable::default(),
            emitted: Mutex::new(Vec::new()),
            open: AtomicBool::new(true),
        });
        if let Ok(mut connections) = self.connections.lock() {
            connections.push(connection.clone());
        }
        Ok(Box::new(MemoryHandle(connection)))
    }
}

/// One in-memory connection.
pub struct MemoryConnection {
    endpoint: String,
    options: ConnectOptions,
    listeners: ListenerTable,
    emitted: Mutex<Vec<(String, Value)>>,
    open: AtomicBool,
}

impl MemoryConnection {
    /// Endpoint the client connected to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Options the client connected with.
    pub fn options(&self) -> &ConnectOptions {
        &self.options
    }

    /// Events the client emitted, in order.
    pub fn emitted(&self) -> Vec<(String, Value)> {
        self.emitted
            .lock()
            .map(|emitted| emitted.clone())
            .unwrap_or_default()
    }

    /// Whether a listener is registered for `event`.
    pub fn has_listener(&self, event: &str) -> bool {
        self.listeners.contains(event)
    }

    /// Whether the client has not disconnected yet.
    pub fn is_connected(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    /// Deliver a server event. Closed connections drop it.
    pub fn deliver(&self, event: &str, payload: Value) -> bool {
        self.is_connected() && self.listeners.dispatch(event, payload)
    }
}

/// The client side's handle on a [`MemoryConnection`].
struct MemoryHandle(Arc<MemoryConnection>);

impl LiveConnection for MemoryHandle {
    fn emit(&self, event: &str, payload: Value) -> AppResult<()> {
        if !self.0.is_connected() {
            return Err(AppError::transport("Live connection is closed"));
        }
        if let Ok(mut emitted) = self.0.emitted.lock() {
            emitted.push((event.to_string(), payload));
        }
        Ok(())
    }

    fn on(&self, event: &str, callback: EventCallback) {
        self.0.listeners.insert(event, callback);
    }

    fn off(&self, event: &str) {
        self.0.listeners.remove(event);
    }

    fn disconnect(&self) {
        self.0.open.store(false, Ordering::SeqCst);
    }

    fn is_connected(&self) -> bool {
        self.0.is_connected()
    }
}
