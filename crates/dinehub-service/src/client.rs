//! Shared HTTP client for the backend REST API.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use dinehub_auth::session::CredentialStore;
use dinehub_core::config::ApiConfig;
use dinehub_core::error::{AppError, ErrorKind};
use dinehub_core::AppResult;

/// Thin wrapper over `reqwest` that knows the base URL and the credential.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialStore>,
}

impl ApiClient {
    /// Builds a client. The cookie store backs the session-cookie fallback.
    pub fn new(config: &ApiConfig, credentials: Arc<dyn CredentialStore>) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .cookie_store(true)
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    format!("Failed to build HTTP client: {e}"),
                    e,
                )
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// The credential store requests are authorized from.
    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    /// Full URL for a route.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Starts a request, attaching the stored bearer credential if present.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match self.credentials.load() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Starts a request without the bearer credential (cookie only).
    pub fn request_anonymous(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    /// Sends a request and maps non-2xx statuses to error kinds.
    pub async fn execute(&self, builder: RequestBuilder) -> AppResult<Response> {
        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().path().to_string();
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status = %status, url = %url, "Backend returned an error");
        Err(status_error(status, &url, &body))
    }

    /// Sends a request and decodes the JSON body.
    pub async fn execute_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> AppResult<T> {
        let response = self.execute(builder).await?;
        response.json::<T>().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("Failed to decode response: {e}"),
                e,
            )
        })
    }
}

/// Maps a `reqwest` failure that never produced a status.
pub fn transport_error(err: reqwest::Error) -> AppError {
    AppError::with_source(ErrorKind::Transport, format!("Request failed: {err}"), err)
}

/// Maps an HTTP error status to an error kind.
pub fn status_error(status: StatusCode, path: &str, body: &str) -> AppError {
    let message = if body.is_empty() {
        format!("{path} returned {status}")
    } else {
        format!("{path} returned {status}: {body}")
    };
    match status {
        StatusCode::UNAUTHORIZED => AppError::authentication(message),
        StatusCode::FORBIDDEN => AppError::authorization(message),
        StatusCode::NOT_FOUND => AppError::not_found(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => AppError::validation(message),
        _ => AppError::transport(message),
    }
}
