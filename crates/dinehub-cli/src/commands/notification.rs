//! Notification commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use dinehub_core::error::AppError;
use dinehub_core::types::id::NotificationId;
use dinehub_entity::branch::BranchScope;
use dinehub_service::notification::{FetchRequest, NotificationApi};

use super::Context;
use crate::output::{self, OutputFormat};

/// Arguments for notification commands
#[derive(Debug, Args)]
pub struct NotificationArgs {
    /// Notification subcommand
    #[command(subcommand)]
    pub command: NotificationCommand,
}

/// Notification subcommands
#[derive(Debug, Subcommand)]
pub enum NotificationCommand {
    /// List the newest notifications
    List {
        /// Branch id, or `all`
        #[arg(short, long, default_value = "all")]
        branch: BranchScope,
        /// Maximum records (defaults to the configured page size)
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Mark one notification read
    Read {
        /// Notification id
        id: NotificationId,
    },
    /// Mark every notification read
    ReadAll,
    /// Delete every notification
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Notification display row
#[derive(Debug, Serialize, Tabled)]
struct NotificationRow {
    /// Notification id
    id: i64,
    /// Branch
    branch: String,
    /// Category
    category: String,
    /// Title
    title: String,
    /// Read flag
    read: bool,
    /// Created at
    created_at: String,
}

/// Execute notification commands
pub async fn execute(
    ctx: &Context,
    args: &NotificationArgs,
    format: OutputFormat,
) -> Result<(), AppError> {
    ctx.identity().await?;
    let service = ctx.notifications();

    match &args.command {
        NotificationCommand::List { branch, limit } => {
            let page = service
                .fetch(FetchRequest {
                    limit: limit.unwrap_or(ctx.config.notifications.page_size),
                    branch_id: branch.branch_id(),
                })
                .await?;

            let rows: Vec<NotificationRow> = page
                .notifications
                .iter()
                .map(|n| NotificationRow {
                    id: n.id.get(),
                    branch: n
                        .branch_id
                        .map(|b| b.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    category: n.category.to_string(),
                    title: n.title.clone(),
                    read: n.read,
                    created_at: n.created_at.format("%Y-%m-%d %H:%M").to_string(),
                })
                .collect();

            output::print_list(&rows, format);
            if format == OutputFormat::Table {
                output::print_kv("Unread", &page.unread_count.to_string());
            }
        }
        NotificationCommand::Read { id } => {
            service.mark_read(*id).await?;
            output::print_success(&format!("Notification {} marked read", id));
        }
        NotificationCommand::ReadAll => {
            service.mark_all_read().await?;
            output::print_success("All notifications marked read");
        }
        NotificationCommand::Clear { yes } => {
            let confirmed = *yes
                || dialoguer::Confirm::new()
                    .with_prompt("Delete every notification?")
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {}", e)))?;
            if !confirmed {
                output::print_warning("Aborted");
                return Ok(());
            }
            service.clear_all().await?;
            output::print_success("Notifications cleared");
        }
    }

    Ok(())
}
