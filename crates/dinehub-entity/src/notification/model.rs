//! Notification record model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dinehub_core::types::id::{BranchId, NotificationId, UserId};

use super::category::NotificationCategory;

/// A notification as held in the client feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    /// Server-assigned identifier, unique within the feed.
    pub id: NotificationId,
    /// The recipient user.
    #[serde(default, alias = "user_id")]
    pub user_id: Option<UserId>,
    /// Branch the notification belongs to; `None` means global.
    #[serde(default, alias = "branch_id")]
    pub branch_id: Option<BranchId>,
    /// Notification title.
    #[serde(default)]
    pub title: String,
    /// Notification body text.
    #[serde(default)]
    pub message: String,
    /// Notification category.
    #[serde(default, rename = "type", alias = "category")]
    pub category: NotificationCategory,
    /// Deep link into the dashboard, if any.
    #[serde(default)]
    pub link: Option<String>,
    /// Whether the user has read this notification. Only ever goes false → true.
    #[serde(default, alias = "isRead", alias = "is_read")]
    pub read: bool,
    /// When the notification was created.
    #[serde(alias = "created_at")]
    pub created_at: DateTime<Utc>,
}

impl NotificationRecord {
    /// Check if the notification is still unread.
    pub fn is_unread(&self) -> bool {
        !self.read
    }

    /// Mark the notification read. Returns `true` if it was unread before.
    pub fn mark_read(&mut self) -> bool {
        let was_unread = !self.read;
        self.read = true;
        was_unread
    }
}

/// One page of notifications plus the authoritative unread count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPage {
    /// Records, newest first.
    #[serde(default)]
    pub notifications: Vec<NotificationRecord>,
    /// Unread count across all of the user's notifications in scope.
    #[serde(default, alias = "unread_count")]
    pub unread_count: u32,
}
