//! CLI command definitions and dispatch.

pub mod branch;
pub mod notification;
pub mod permission;
pub mod session;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use dinehub_auth::session::{CredentialStore, FileCredentialStore, SessionProvider};
use dinehub_core::config::AppConfig;
use dinehub_core::error::AppError;
use dinehub_entity::user::Identity;
use dinehub_service::{ApiClient, HttpAuthService, HttpBranchService, HttpNotificationService};

use crate::output::OutputFormat;

/// DineHub restaurant management admin client
#[derive(Debug, Parser)]
#[command(name = "dinehub", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Log in and store the access credential
    Login(session::LoginArgs),
    /// Log out and discard the stored credential
    Logout,
    /// Show the current identity
    Whoami,
    /// Check a single capability
    Can(permission::CanArgs),
    /// List every capability and whether it is granted
    Capabilities(permission::CapabilitiesArgs),
    /// Notification feed
    Notifications(notification::NotificationArgs),
    /// Branch selection
    Branches(branch::BranchArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let ctx = Context::load(&self.config)?;
        match &self.command {
            Commands::Login(args) => session::login(&ctx, args, self.format).await,
            Commands::Logout => session::logout(&ctx).await,
            Commands::Whoami => session::whoami(&ctx, self.format).await,
            Commands::Can(args) => permission::can(&ctx, args).await,
            Commands::Capabilities(args) => {
                permission::capabilities(&ctx, args, self.format).await
            }
            Commands::Notifications(args) => notification::execute(&ctx, args, self.format).await,
            Commands::Branches(args) => branch::execute(&ctx, args, self.format).await,
        }
    }
}

/// Services shared by every command.
pub struct Context {
    /// Loaded configuration.
    pub config: AppConfig,
    /// REST client carrying the stored credential.
    pub client: ApiClient,
    /// Session state for this invocation.
    pub session: SessionProvider,
}

impl Context {
    /// Build the context from a configuration file.
    pub fn load(config_path: &str) -> Result<Self, AppError> {
        let config = AppConfig::load_file(config_path)?;
        let credentials: Arc<dyn CredentialStore> =
            Arc::new(FileCredentialStore::new(&config.auth.credential_file));
        let client = ApiClient::new(&config.api, credentials)?;
        let session = SessionProvider::new(Arc::new(HttpAuthService::new(client.clone())));
        Ok(Self {
            config,
            client,
            session,
        })
    }

    /// Resolve the session, failing when nobody is logged in.
    pub async fn identity(&self) -> Result<Identity, AppError> {
        self.session
            .resolve()
            .await
            .identity()
            .cloned()
            .ok_or_else(|| AppError::authentication("Not logged in. Run `dinehub login` first."))
    }

    /// Notification service over the shared client.
    pub fn notifications(&self) -> HttpNotificationService {
        HttpNotificationService::new(self.client.clone())
    }

    /// Branch service over the shared client.
    pub fn branches(&self) -> HttpBranchService {
        HttpBranchService::new(self.client.clone())
    }
}
