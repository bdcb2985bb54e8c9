//! WebSocket transport over `tokio-tungstenite`.
//!
//! Each connection runs two tasks: a reader that decodes [`Envelope`] frames
//! and dispatches them to listeners, and a writer that drains the outbound
//! queue into the socket.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::http::header::AUTHORIZATION;
use tracing::{debug, info, trace, warn};

use dinehub_core::AppResult;
use dinehub_core::error::{AppError, ErrorKind};

use crate::message::Envelope;

use super::{ConnectOptions, EventCallback, ListenerTable, LiveConnection, LiveTransport};

/// Connects to the live server over WebSocket.
#[derive(Debug, Clone)]
pub struct WsTransport {
    /// Outbound frame queue size per connection.
    buffer_size: usize,
}

impl WsTransport {
    /// Create a transport with the given outbound queue size.
    pub fn new(buffer_size: usize) -> Self {
        Self {
            buffer_size: buffer_size.max(1),
        }
    }
}

fn ws_error(err: tokio_tungstenite::tungstenite::Error) -> AppError {
    AppError::with_source(ErrorKind::Transport, format!("WebSocket error: {err}"), err)
}

#[async_trait]
impl LiveTransport for WsTransport {
    async fn connect(
        &self,
        endpoint: &str,
        options: ConnectOptions,
    ) -> AppResult<Box<dyn LiveConnection>> {
        let mut request = endpoint.into_client_request().map_err(ws_error)?;
        if options.with_credentials {
            if let Some(token) = options.access_token.as_deref() {
                let value = HeaderValue::from_str(&format!("Bearer {token}"))
                    .map_err(|e| AppError::validation(format!("Invalid credential header: {e}")))?;
                request.headers_mut().insert(AUTHORIZATION, value);
            }
        }

        let (stream, _response) = tokio_tungstenite::connect_async(request)
            .await
            .map_err(ws_error)?;
        info!(endpoint = %endpoint, "Live connection established");

        let (mut sink, mut source) = stream.split();
        let (tx, mut rx) = mpsc::channel::<Message>(self.buffer_size);
        let listeners = Arc::new(ListenerTable::default());
        let open = Arc::new(AtomicBool::new(true));

        let writer_open = open.clone();
        let writer = tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                let closing = matches!(message, Message::Close(_));
                if let Err(e) = sink.send(message).await {
                    warn!("Live connection write failed: {}", e);
                    break;
                }
                if closing {
                    break;
                }
            }
            writer_open.store(false, Ordering::SeqCst);
            let _ = sink.close().await;
        });

        let reader_listeners = listeners.clone();
        let reader_open = open.clone();
        let reader = tokio::spawn(async move {
            while let Some(frame) = source.next().await {
                match frame {
                    Ok(Message::Text(text)) => match Envelope::from_text(text.as_str()) {
                        Ok(envelope) => {
                            if !reader_listeners.dispatch(&envelope.event, envelope.data) {
                                trace!(event = %envelope.event, "No listener for live event");
                            }
                        }
                        Err(e) => warn!("Ignoring undecodable live frame: {}", e),
                    },
                    Ok(Message::Close(_)) => {
                        debug!("Live server closed the connection");
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!("Live connection read failed: {}", e);
                        break;
                    }
                }
            }
            reader_open.store(false, Ordering::SeqCst);
        });

        Ok(Box::new(WsConnection {
            outbound: tx,
            listeners,
            open,
            reader,
            writer,
        }))
    }
}

/// An open WebSocket connection.
struct WsConnection {
    outbound: mpsc::Sender<Message>,
    listeners: Arc<ListenerTable>,
    open: Arc<AtomicBool>,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

impl LiveConnection for WsConnection {
    fn emit(&self, event: &str, payload: Value) -> AppResult<()> {
        if !self.is_connected() {
            return Err(AppError::transport("Live connection is closed"));
        }
        let text = Envelope::new(event, payload).to_text()?;
        self.outbound
            .try_send(Message::text(text))
            .map_err(|e| AppError::transport(format!("Failed to queue live event '{event}': {e}")))
    }

    fn on(&self, event: &str, callback: EventCallback) {
        self.listeners.insert(event, callback);
    }

    fn off(&self, event: &str) {
        self.listeners.remove(event);
    }

    fn disconnect(&self) {
        if !self.open.swap(false, Ordering::SeqCst) {
            return;
        }
        self.listeners.clear();
        self.reader.abort();
        if self.outbound.try_send(Message::Close(None)).is_err() {
            self.writer.abort();
        }
        debug!("Live connection closed");
    }

    fn is_connected(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }
}

impl Drop for WsConnection {
    fn drop(&mut self) {
        self.disconnect();
    }
}
