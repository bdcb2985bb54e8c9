//! Notification service contract and its REST implementation.

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use dinehub_core::AppResult;
use dinehub_core::types::id::{BranchId, NotificationId};
use dinehub_entity::notification::NotificationPage;

use crate::client::ApiClient;

const NOTIFICATIONS_PATH: &str = "/notifications";
const READ_ALL_PATH: &str = "/notifications/read-all";

/// Parameters of a snapshot fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    /// Maximum records returned.
    pub limit: u32,
    /// Restrict to one branch; `None` fetches every branch.
    pub branch_id: Option<BranchId>,
}

impl FetchRequest {
    /// Route with query string for this request.
    pub fn path(&self) -> String {
        match self.branch_id {
            Some(branch) => format!("{NOTIFICATIONS_PATH}?limit={}&branchId={branch}", self.limit),
            None => format!("{NOTIFICATIONS_PATH}?limit={}", self.limit),
        }
    }
}

/// The notification backend as seen by the feed controller.
#[async_trait]
pub trait NotificationApi: Send + Sync {
    /// One page of the current user's notifications plus the unread count.
    async fn fetch(&self, request: FetchRequest) -> AppResult<NotificationPage>;

    /// Mark one notification read.
    async fn mark_read(&self, id: NotificationId) -> AppResult<()>;

    /// Mark every notification read.
    async fn mark_all_read(&self) -> AppResult<()>;

    /// Delete every notification of the current user.
    async fn clear_all(&self) -> AppResult<()>;
}

/// Notification service backed by the REST API.
#[derive(Debug, Clone)]
pub struct HttpNotificationService {
    client: ApiClient,
}

impl HttpNotificationService {
    /// Creates the service over a shared API client.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NotificationApi for HttpNotificationService {
    async fn fetch(&self, request: FetchRequest) -> AppResult<NotificationPage> {
        let builder = self.client.request(Method::GET, &request.path());
        self.client.execute_json(builder).await
    }

    async fn mark_read(&self, id: NotificationId) -> AppResult<()> {
        let path = format!("{NOTIFICATIONS_PATH}/{id}/read");
        self.client
            .execute(self.client.request(Method::PATCH, &path))
            .await
            .map(|_| ())
    }

    async fn mark_all_read(&self) -> AppResult<()> {
        self.client
            .execute(self.client.request(Method::PATCH, READ_ALL_PATH))
            .await
            .map(|_| ())
    }

    async fn clear_all(&self) -> AppResult<()> {
        self.client
            .execute(self.client.request(Method::DELETE, NOTIFICATIONS_PATH))
            .await
            .map(|_| ())
    }
}
