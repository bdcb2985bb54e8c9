//! Contract of the external auth service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use dinehub_core::AppResult;
use dinehub_entity::user::Identity;

/// Credentials submitted by the login form.
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Login name.
    pub username: String,
    /// Plain-text password, only ever sent to the backend.
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The auth backend as seen by the session provider.
///
/// Implementations own credential persistence: a rejected stored credential
/// is discarded by the implementation, not by its caller.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Resolve the identity from a cookie-based session.
    async fn check_session(&self) -> AppResult<Identity>;

    /// Resolve the identity from the stored access credential.
    async fn get_identity(&self) -> AppResult<Identity>;

    /// Whether an access credential is persisted.
    fn has_stored_credential(&self) -> bool;

    /// Exchange credentials for an identity, persisting the new credential.
    async fn login(&self, request: LoginRequest) -> AppResult<Identity>;

    /// End the server session and drop the stored credential.
    async fn logout(&self) -> AppResult<()>;

    /// The stored access credential, for transports that forward it.
    fn access_token(&self) -> Option<String> {
        None
    }
}
