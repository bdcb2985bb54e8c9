//! Live event channel and notification feed configuration.

use serde::{Deserialize, Serialize};

/// Live event channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// WebSocket endpoint of the live event server.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Whether to attach the stored credential to the upgrade request.
    #[serde(default = "default_true")]
    pub with_credentials: bool,
    /// Event emitted right after connecting to register interest.
    #[serde(default = "default_join_event")]
    pub join_event: String,
    /// Event carrying newly created notifications.
    #[serde(default = "default_push_event")]
    pub push_event: String,
    /// Outbound frame buffer size per connection.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            with_credentials: true,
            join_event: default_join_event(),
            push_event: default_push_event(),
            channel_buffer_size: default_channel_buffer(),
        }
    }
}

/// Notification feed settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Maximum records fetched per snapshot load.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

fn default_endpoint() -> String {
    "ws://localhost:3000/ws".to_string()
}

fn default_true() -> bool {
    true
}

fn default_join_event() -> String {
    "join".to_string()
}

fn default_push_event() -> String {
    "new_notification".to_string()
}

fn default_channel_buffer() -> usize {
    64
}

fn default_page_size() -> u32 {
    50
}
