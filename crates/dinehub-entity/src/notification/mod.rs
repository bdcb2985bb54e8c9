//! Notification entities.

pub mod category;
pub mod model;

pub use category::NotificationCategory;
pub use model::{NotificationPage, NotificationRecord};
