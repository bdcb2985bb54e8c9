//! Login, logout, and identity commands.

use clap::Args;
use serde::Serialize;

use dinehub_auth::session::LoginRequest;
use dinehub_core::error::AppError;
use dinehub_entity::user::Identity;

use super::Context;
use crate::output::{self, OutputFormat};

/// Arguments for login
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Username (will prompt if not provided)
    #[arg(short, long)]
    pub username: Option<String>,
    /// Password (will prompt if not provided)
    #[arg(short, long)]
    pub password: Option<String>,
}

/// Identity display
#[derive(Debug, Serialize)]
struct IdentityView {
    id: i64,
    name: String,
    role: String,
    level: u8,
}

impl From<&Identity> for IdentityView {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id.get(),
            name: identity.name.clone(),
            role: identity.role.as_str().to_string(),
            level: identity.role.level(),
        }
    }
}

/// Log in with a username and password.
pub async fn login(ctx: &Context, args: &LoginArgs, format: OutputFormat) -> Result<(), AppError> {
    let username = match &args.username {
        Some(u) => u.clone(),
        None => dialoguer::Input::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(|e| AppError::internal(format!("Input error: {}", e)))?,
    };

    let password = match &args.password {
        Some(p) => p.clone(),
        None => dialoguer::Password::new()
            .with_prompt("Password")
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {}", e)))?,
    };

    let identity = ctx
        .session
        .login(LoginRequest { username, password })
        .await?;

    if !ctx.session.auth().has_stored_credential() {
        output::print_warning("Backend issued no access token; this login will not persist");
    }
    output::print_success(&format!("Logged in as '{}'", identity.name));
    output::print_item(&IdentityView::from(&identity), format);
    Ok(())
}

/// Log out. Always clears the local credential.
pub async fn logout(ctx: &Context) -> Result<(), AppError> {
    ctx.session.logout().await;
    output::print_success("Logged out");
    Ok(())
}

/// Show who is logged in.
pub async fn whoami(ctx: &Context, format: OutputFormat) -> Result<(), AppError> {
    let identity = ctx.identity().await?;
    output::print_item(&IdentityView::from(&identity), format);
    Ok(())
}
