//! # dinehub-service
//!
//! Contracts for the backend services the client core consumes, and their
//! REST implementations. The adapters carry no business logic: they map
//! routes to calls and HTTP failures to [`dinehub_core::AppError`] kinds.

pub mod auth;
pub mod branch;
pub mod client;
pub mod notification;

pub use auth::HttpAuthService;
pub use branch::{BranchApi, HttpBranchService};
pub use client::ApiClient;
pub use notification::{FetchRequest, HttpNotificationService, NotificationApi};
