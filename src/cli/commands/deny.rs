//! cli::commands::deny
//!
//! Global blacklist add/remove/list.

use anyhow::Result;

use super::{emit_notices, CommandContext};
use crate::cli::args::DenyAction;
use crate::core::types::ExternalId;
use crate::ui::output;

pub fn run(action: DenyAction, ctx: &CommandContext) -> Result<()> {
    match action {
        DenyAction::Add { id } => {
            let rt = tokio::runtime::Runtime::new()?;
            let outcome =
                rt.block_on(ctx.registry.blacklist_add(&ctx.caller, ExternalId::new(id)))?;
            emit_notices(&outcome.notices, ctx.verbosity);
            output::print(format!("blacklisted {id}"), ctx.verbosity);
        }
        DenyAction::Remove { id } => {
            let outcome = ctx
                .registry
                .blacklist_remove(&ctx.caller, ExternalId::new(id))?;
            emit_notices(&outcome.notices, ctx.verbosity);
            output::print(format!("unblacklisted {id}"), ctx.verbosity);
        }
        DenyAction::List => {
            let outcome = ctx.registry.list_blacklist(&ctx.caller)?;
            emit_notices(&outcome.notices, ctx.verbosity);
            if outcome.value.is_empty() {
                output::print("blacklist is empty", ctx.verbosity);
            }
            for id in outcome.value {
                output::print(id, ctx.verbosity);
            }
        }
    }
    Ok(())
}
