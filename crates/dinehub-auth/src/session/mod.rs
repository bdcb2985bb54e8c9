//! Session identity: the auth service contract, credential persistence,
//! and the provider state machine.

pub mod api;
pub mod provider;
pub mod store;

pub use api::{AuthApi, LoginRequest};
pub use provider::{SessionProvider, SessionState};
pub use store::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
