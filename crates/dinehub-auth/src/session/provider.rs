//! Session provider: resolves who is using the client and publishes it.

use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use dinehub_core::AppResult;
use dinehub_entity::user::Identity;

use super::api::{AuthApi, LoginRequest};

/// Lifecycle of the client's identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Startup, nothing attempted yet.
    Unresolved,
    /// Startup resolution in flight; the shell shows a loading indicator.
    Resolving,
    /// A user is logged in.
    Authenticated(Identity),
    /// Nobody is logged in; the shell shows the login view.
    Anonymous,
}

impl SessionState {
    /// The identity, if authenticated.
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }

    /// Whether the state is not yet settled.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Unresolved | Self::Resolving)
    }
}

/// Owns the single identity of a client session.
pub struct SessionProvider {
    auth: Arc<dyn AuthApi>,
    state: watch::Sender<SessionState>,
    /// Serializes startup resolution so it runs once.
    resolve_lock: Mutex<()>,
}

impl std::fmt::Debug for SessionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionProvider")
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl SessionProvider {
    /// Creates a provider in the `Unresolved` state.
    pub fn new(auth: Arc<dyn AuthApi>) -> Self {
        let (state, _) = watch::channel(SessionState::Unresolved);
        Self {
            auth,
            state,
            resolve_lock: Mutex::new(()),
        }
    }

    /// Resolve the startup identity.
    ///
    /// Only the first call talks to the backend; later calls return the
    /// state they find. The outcome only settles a state that is still
    /// `Resolving` when the backend answers.
    pub async fn resolve(&self) -> SessionState {
        let _guard = self.resolve_lock.lock().await;
        if *self.state.borrow() != SessionState::Unresolved {
            return self.state();
        }
        self.state.send_replace(SessionState::Resolving);

        let outcome = if self.auth.has_stored_credential() {
            debug!("Resolving identity from stored credential");
            self.auth.get_identity().await
        } else {
            debug!("No stored credential, checking cookie session");
            self.auth.check_session().await
        };

        let resolved = match outcome {
            Ok(identity) => {
                info!(user_id = %identity.id, role = %identity.role, "Session resolved");
                SessionState::Authenticated(identity)
            }
            Err(e) => {
                debug!("No session: {}", e);
                SessionState::Anonymous
            }
        };
        // A login or logout made while resolving wins over the outcome.
        let settled = self.state.send_if_modified(|state| {
            if matches!(state, SessionState::Resolving) {
                *state = resolved;
                true
            } else {
                false
            }
        });
        if !settled {
            debug!("Session changed while resolving, discarding outcome");
        }
        self.state()
    }

    /// Log in with credentials. The login response is the identity; no
    /// follow-up fetch is made. On failure the state is left unchanged.
    pub async fn login(&self, request: LoginRequest) -> AppResult<Identity> {
        let identity = self.auth.login(request).await?;
        info!(user_id = %identity.id, role = %identity.role, "Logged in");
        self.state
            .send_replace(SessionState::Authenticated(identity.clone()));
        Ok(identity)
    }

    /// Log out from any state. Backend failures are logged, never returned.
    pub async fn logout(&self) {
        if let Err(e) = self.auth.logout().await {
            warn!("Logout request failed, clearing local session anyway: {}", e);
        }
        let previous = self.state.send_replace(SessionState::Anonymous);
        if let Some(identity) = previous.identity() {
            info!(user_id = %identity.id, "Logged out");
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// The current identity, if any.
    pub fn identity(&self) -> Option<Identity> {
        self.state.borrow().identity().cloned()
    }

    /// Whether resolution has not settled yet.
    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    /// Receive every state transition.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// The auth service this provider talks to.
    pub fn auth(&self) -> &Arc<dyn AuthApi> {
        &self.auth
    }
}
