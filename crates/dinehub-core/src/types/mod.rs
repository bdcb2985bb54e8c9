//! Shared value types used across DineHub crates.

pub mod id;

pub use id::{BranchId, NotificationId, UserId};
