//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Credential persistence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// File holding the persisted access token between runs.
    #[serde(default = "default_credential_file")]
    pub credential_file: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            credential_file: default_credential_file(),
        }
    }
}

fn default_credential_file() -> String {
    "data/credential".to_string()
}
