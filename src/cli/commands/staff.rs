//! cli::commands::staff
//!
//! Staff grant/revoke/list. Mutations are root-only; the engine gates.

use anyhow::{Context, Result};

use super::{emit_notices, CommandContext};
use crate::cli::args::StaffAction;
use crate::core::types::CallerId;
use crate::ui::output;

pub fn run(action: StaffAction, ctx: &CommandContext) -> Result<()> {
    match action {
        StaffAction::Add { id } => {
            let member = CallerId::new(id.clone())
                .with_context(|| format!("invalid staff identity {id:?}"))?;
            let outcome = ctx.registry.staff_add(&ctx.caller, &member)?;
            emit_notices(&outcome.notices, ctx.verbosity);
            output::print(format!("granted staff access to {member}"), ctx.verbosity);
        }
        StaffAction::Remove { id } => {
            let member = CallerId::new(id.clone())
                .with_context(|| format!("invalid staff identity {id:?}"))?;
            let outcome = ctx.registry.staff_remove(&ctx.caller, &member)?;
            emit_notices(&outcome.notices, ctx.verbosity);
            output::print(format!("revoked staff access from {member}"), ctx.verbosity);
        }
        StaffAction::List => {
            let outcome = ctx.registry.list_staff(&ctx.caller)?;
            emit_notices(&outcome.notices, ctx.verbosity);
            if outcome.value.is_empty() {
                output::print("no staff", ctx.verbosity);
            }
            for member in outcome.value {
                output::print(member, ctx.verbosity);
            }
        }
    }
    Ok(())
}
