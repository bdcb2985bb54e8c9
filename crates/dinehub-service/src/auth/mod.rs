//! REST implementation of the auth service contract.

use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use dinehub_auth::session::{AuthApi, LoginRequest};
use dinehub_core::AppResult;
use dinehub_core::error::{AppError, ErrorKind};
use dinehub_entity::user::Identity;

use crate::client::ApiClient;

const SESSION_PATH: &str = "/auth/session";
const ME_PATH: &str = "/auth/me";
const LOGIN_PATH: &str = "/auth/login";
const LOGOUT_PATH: &str = "/auth/logout";

/// Body of a successful login.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    /// Access credential; absent when the backend only sets a cookie.
    #[serde(default, alias = "accessToken", alias = "access_token")]
    token: Option<String>,
    /// The logged-in identity.
    user: Identity,
}

/// Auth service backed by the REST API.
#[derive(Debug, Clone)]
pub struct HttpAuthService {
    client: ApiClient,
}

impl HttpAuthService {
    /// Creates the service over a shared API client.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn discard_credential(&self) {
        if let Err(e) = self.client.credentials().clear() {
            warn!("Failed to discard stored credential: {}", e);
        }
    }
}

#[async_trait]
impl AuthApi for HttpAuthService {
    async fn check_session(&self) -> AppResult<Identity> {
        let request = self.client.request_anonymous(Method::GET, SESSION_PATH);
        self.client.execute_json(request).await
    }

    async fn get_identity(&self) -> AppResult<Identity> {
        if self.client.credentials().load().is_none() {
            return Err(AppError::authentication("No stored credential"));
        }
        let request = self.client.request(Method::GET, ME_PATH);
        match self.client.execute_json::<Identity>(request).await {
            Ok(identity) => Ok(identity),
            Err(e) if matches!(e.kind, ErrorKind::Authentication | ErrorKind::Authorization) => {
                debug!("Stored credential rejected, discarding it");
                self.discard_credential();
                Err(AppError::authentication(e.message))
            }
            Err(e) => Err(e),
        }
    }

    fn has_stored_credential(&self) -> bool {
        self.client.credentials().load().is_some()
    }

    async fn login(&self, request: LoginRequest) -> AppResult<Identity> {
        let builder = self
            .client
            .request_anonymous(Method::POST, LOGIN_PATH)
            .json(&json!({
                "username": request.username,
                "password": request.password,
            }));
        let response: LoginResponse = self.client.execute_json(builder).await?;
        if let Some(token) = response.token.as_deref() {
            self.client.credentials().save(token)?;
        }
        Ok(response.user)
    }

    async fn logout(&self) -> AppResult<()> {
        let request = self.client.request(Method::POST, LOGOUT_PATH);
        let result = self.client.execute(request).await.map(|_| ());
        self.discard_credential();
        result
    }

    fn access_token(&self) -> Option<String> {
        self.client.credentials().load()
    }
}
