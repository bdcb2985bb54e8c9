//! Branch commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use dinehub_core::error::AppError;
use dinehub_core::types::id::BranchId;
use dinehub_service::branch::BranchApi;

use super::Context;
use crate::output::{self, OutputFormat};

/// Arguments for branch commands
#[derive(Debug, Args)]
pub struct BranchArgs {
    /// Branch subcommand
    #[command(subcommand)]
    pub command: BranchCommand,
}

/// Branch subcommands
#[derive(Debug, Subcommand)]
pub enum BranchCommand {
    /// List selectable branches
    List,
    /// Make a branch the current one
    Select {
        /// Branch id
        id: BranchId,
    },
}

/// Branch display row
#[derive(Debug, Serialize, Tabled)]
struct BranchRow {
    /// Branch id
    id: i64,
    /// Name
    name: String,
    /// Current marker
    current: bool,
}

/// Execute branch commands
pub async fn execute(ctx: &Context, args: &BranchArgs, format: OutputFormat) -> Result<(), AppError> {
    ctx.identity().await?;
    let service = ctx.branches();

    match &args.command {
        BranchCommand::List => {
            let options = service.list_branch_options().await?;
            let rows: Vec<BranchRow> = options
                .options
                .iter()
                .map(|b| BranchRow {
                    id: b.id.get(),
                    name: b.name.clone(),
                    current: options.current == Some(b.id),
                })
                .collect();
            output::print_list(&rows, format);
        }
        BranchCommand::Select { id } => {
            service.set_current_branch(*id).await?;
            output::print_success(&format!("Current branch set to {}", id));
        }
    }

    Ok(())
}
