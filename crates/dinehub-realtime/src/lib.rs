//! # dinehub-realtime
//!
//! Live notification delivery for the DineHub admin client. Provides:
//!
//! - The live transport contract with WebSocket and in-memory implementations
//! - The live event channel (one connection per identity)
//! - Push payload normalization
//! - The notification feed controller (snapshot + live merge + optimistic mutations)
//! - The shared branch scope cell
//! - The notification host that ties all of it to the session identity

pub mod channel;
pub mod host;
pub mod message;
pub mod notification;
pub mod scope;
pub mod transport;

pub use channel::LiveChannel;
pub use host::NotificationHost;
pub use notification::{FeedState, NotificationFeed};
pub use scope::ScopeCell;
pub use transport::{ConnectOptions, LiveConnection, LiveTransport};
