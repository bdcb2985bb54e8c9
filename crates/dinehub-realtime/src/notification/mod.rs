//! Notification feed controller.

pub mod feed;

pub use feed::{FeedState, NotificationFeed};
