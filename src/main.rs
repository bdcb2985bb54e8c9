//! DineHub Console: headless admin shell
//!
//! Main entry point that wires the client crates together: resolves the
//! session, follows it with the notification host, and logs the feed until
//! shutdown.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use dinehub_auth::gate::{ProtectedRegion, RouteGuard};
use dinehub_auth::rbac::Capability;
use dinehub_auth::session::{AuthApi, CredentialStore, FileCredentialStore, SessionProvider};
use dinehub_core::config::AppConfig;
use dinehub_core::error::AppError;
use dinehub_entity::user::Identity;
use dinehub_realtime::NotificationHost;
use dinehub_realtime::notification::FeedState;
use dinehub_realtime::transport::WsTransport;
use dinehub_service::{ApiClient, HttpAuthService, HttpBranchService, HttpNotificationService};

/// Shell sections and the capability each one is guarded by.
const SECTIONS: [(&str, Capability); 10] = [
    ("dashboard", Capability::ViewDashboard),
    ("orders", Capability::ViewOrders),
    ("order-entry", Capability::ManageOrders),
    ("kitchen", Capability::ViewKitchenOrders),
    ("billing", Capability::ViewBilling),
    ("menu", Capability::ManageMenu),
    ("inventory", Capability::ManageInventory),
    ("staff", Capability::ManageStaff),
    ("users", Capability::ManageUsers),
    ("branches", Capability::ManageBranches),
];

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Console error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    match std::env::var("DINEHUB_CONFIG") {
        Ok(path) => AppConfig::load_file(&path),
        Err(_) => {
            let env = std::env::var("DINEHUB_ENV").unwrap_or_else(|_| "development".to_string());
            AppConfig::load(&env)
        }
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main console run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting DineHub console v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Backend adapters ─────────────────────────────────
    let credentials: Arc<dyn CredentialStore> =
        Arc::new(FileCredentialStore::new(&config.auth.credential_file));
    let client = ApiClient::new(&config.api, credentials)?;
    let auth: Arc<dyn AuthApi> = Arc::new(HttpAuthService::new(client.clone()));
    let notifications = Arc::new(HttpNotificationService::new(client.clone()));
    let branches = Arc::new(HttpBranchService::new(client));

    // ── Step 2: Session ──────────────────────────────────────────
    let session = Arc::new(SessionProvider::new(Arc::clone(&auth)));
    let state = session.resolve().await;
    let Some(identity) = state.identity() else {
        tracing::warn!("No active session. Run `dinehub login` first.");
        return Ok(());
    };
    log_sections(identity);

    // ── Step 3: Notification host ────────────────────────────────
    let transport = Arc::new(WsTransport::new(config.realtime.channel_buffer_size));
    let token_auth = Arc::clone(&auth);
    let host = Arc::new(
        NotificationHost::new(
            notifications,
            branches,
            transport,
            &config.realtime,
            &config.notifications,
        )
        .with_token_source(Arc::new(move || token_auth.access_token())),
    );

    match host.init_branches().await {
        Ok(options) => tracing::info!(
            branches = options.options.len(),
            scope = %host.scope(),
            "Branch options loaded"
        ),
        Err(e) => tracing::warn!("Failed to load branch options: {}", e),
    }

    let runner = Arc::clone(&host);
    let session_rx = session.subscribe();
    let host_handle = tokio::spawn(async move {
        runner.run(session_rx).await;
    });

    let mut feed_rx = host.feed().subscribe();
    let feed_handle = tokio::spawn(async move {
        let mut previous = FeedState::default();
        while feed_rx.changed().await.is_ok() {
            let current = feed_rx.borrow_and_update().clone();
            log_feed_change(&previous, &current);
            previous = current;
        }
    });

    // ── Step 4: Wait for shutdown ────────────────────────────────
    shutdown_signal().await;
    tracing::info!("Shutdown signal received");

    host.shutdown().await;
    host_handle.abort();
    feed_handle.abort();

    tracing::info!("DineHub console shut down");
    Ok(())
}

/// Log which shell sections the identity may open.
fn log_sections(identity: &Identity) {
    let guard = RouteGuard::new();
    let visible: Vec<&str> = SECTIONS
        .iter()
        .filter_map(|(name, capability)| {
            guard.guard(
                Some(identity),
                &ProtectedRegion::requiring(*capability),
                || *name,
            )
        })
        .collect();

    tracing::info!(
        user_id = %identity.id,
        name = %identity.name,
        role = %identity.role,
        sections = ?visible,
        "Session ready"
    );
}

fn log_feed_change(previous: &FeedState, current: &FeedState) {
    if current.loading != previous.loading && current.loading {
        tracing::debug!("Loading notifications");
        return;
    }
    let grew = current.records.len() > previous.records.len();
    let newest = current.records.first();
    if grew && newest.map(|r| r.id) != previous.records.first().map(|r| r.id) {
        if let Some(record) = newest {
            tracing::info!(
                id = %record.id,
                category = %record.category,
                branch = ?record.branch_id,
                "{}: {}",
                record.title,
                record.message
            );
        }
    }
    if current.unread_count != previous.unread_count {
        tracing::info!(unread = current.unread_count, "Unread notifications");
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
