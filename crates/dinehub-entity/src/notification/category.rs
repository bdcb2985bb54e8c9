//! Notification category.

use serde::{Deserialize, Serialize};

/// Category of a notification.
///
/// The backend only distinguishes order notifications from generic ones,
/// but any other string is kept verbatim rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum NotificationCategory {
    /// Order lifecycle notifications.
    Order,
    /// Generic informational notifications.
    #[default]
    Info,
    /// Any category this client does not know about.
    Other(String),
}

impl NotificationCategory {
    /// Return the category as a string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Order => "order",
            Self::Info => "info",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for NotificationCategory {
    fn from(s: String) -> Self {
        match s.as_str() {
            "order" => Self::Order,
            "info" | "" => Self::Info,
            _ => Self::Other(s),
        }
    }
}

impl From<NotificationCategory> for String {
    fn from(category: NotificationCategory) -> String {
        category.as_str().to_string()
    }
}

impl std::fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
