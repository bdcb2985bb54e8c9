//! Capability inspection commands.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use dinehub_auth::rbac::{Capability, PermissionEnforcer};
use dinehub_core::error::AppError;
use dinehub_entity::user::RoleLevel;

use super::Context;
use crate::output::{self, OutputFormat};

/// Arguments for a single capability check
#[derive(Debug, Args)]
pub struct CanArgs {
    /// Capability, e.g. `manage-menu` or `view_orders`
    pub capability: String,
    /// Evaluate for a role (name or level) instead of the logged-in user
    #[arg(short, long)]
    pub role: Option<String>,
}

/// Arguments for the capability listing
#[derive(Debug, Args)]
pub struct CapabilitiesArgs {
    /// Evaluate for a role (name or level) instead of the logged-in user
    #[arg(short, long)]
    pub role: Option<String>,
}

/// Capability display row
#[derive(Debug, Serialize, Tabled)]
struct CapabilityRow {
    /// Capability tag
    capability: String,
    /// Whether it is granted
    granted: bool,
}

async fn role_for(ctx: &Context, role: Option<&str>) -> Result<RoleLevel, AppError> {
    match role {
        Some(role) => role.parse(),
        None => Ok(ctx.identity().await?.role),
    }
}

/// Check one capability. Exits with an error when it is not granted.
pub async fn can(ctx: &Context, args: &CanArgs) -> Result<(), AppError> {
    let capability: Capability = args.capability.parse()?;
    let role = role_for(ctx, args.role.as_deref()).await?;

    PermissionEnforcer::new().require(Some(role), capability)?;
    output::print_success(&format!("{} may {}", role, capability));
    Ok(())
}

/// List the capability table for a role.
pub async fn capabilities(
    ctx: &Context,
    args: &CapabilitiesArgs,
    format: OutputFormat,
) -> Result<(), AppError> {
    let role = role_for(ctx, args.role.as_deref()).await?;
    let enforcer = PermissionEnforcer::new();

    let rows: Vec<CapabilityRow> = Capability::ALL
        .into_iter()
        .map(|capability| CapabilityRow {
            capability: capability.to_string(),
            granted: enforcer.has_capability(Some(role), capability),
        })
        .collect();

    output::print_kv("Role", &format!("{} ({})", role, role.level()));
    output::print_list(&rows, format);
    Ok(())
}
