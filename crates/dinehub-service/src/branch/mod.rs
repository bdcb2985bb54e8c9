//! Branch service contract and its REST implementation.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;

use dinehub_core::AppResult;
use dinehub_core::types::id::BranchId;
use dinehub_entity::branch::BranchOptions;

use crate::client::ApiClient;

const OPTIONS_PATH: &str = "/branches/options";
const CURRENT_PATH: &str = "/branches/current";

/// The branch backend as seen by the branch switcher.
#[async_trait]
pub trait BranchApi: Send + Sync {
    /// Selectable branches plus the server's current one.
    async fn list_branch_options(&self) -> AppResult<BranchOptions>;

    /// Make `id` the server-side current branch.
    async fn set_current_branch(&self, id: BranchId) -> AppResult<()>;
}

/// Branch service backed by the REST API.
#[derive(Debug, Clone)]
pub struct HttpBranchService {
    client: ApiClient,
}

impl HttpBranchService {
    /// Creates the service over a shared API client.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BranchApi for HttpBranchService {
    async fn list_branch_options(&self) -> AppResult<BranchOptions> {
        let request = self.client.request(Method::GET, OPTIONS_PATH);
        self.client.execute_json(request).await
    }

    async fn set_current_branch(&self, id: BranchId) -> AppResult<()> {
        let request = self
            .client
            .request(Method::PUT, CURRENT_PATH)
            .json(&json!({ "branchId": id }));
        self.client.execute(request).await?;
        tracing::debug!(branch_id = %id, "Current branch updated");
        Ok(())
    }
}
