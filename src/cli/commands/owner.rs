//! cli::commands::owner
//!
//! Owner assignment, removal, and listing.

use anyhow::{Context, Result};

use super::{emit_notices, CommandContext};
use crate::cli::args::OwnerAction;
use crate::core::types::CallerId;
use crate::ui::output;

pub fn run(action: OwnerAction, ctx: &CommandContext) -> Result<()> {
    match action {
        OwnerAction::Set { store, owner } => {
            let owner = CallerId::new(owner.clone())
                .with_context(|| format!("invalid owner identity {owner:?}"))?;
            let outcome = ctx.registry.assign_owner(&ctx.caller, &store, &owner)?;
            emit_notices(&outcome.notices, ctx.verbosity);
            output::print(
                format!("assigned {owner} as owner of '{store}'"),
                ctx.verbosity,
            );
        }
        OwnerAction::Remove { store } => {
            let outcome = ctx.registry.remove_owner(&ctx.caller, &store)?;
            emit_notices(&outcome.notices, ctx.verbosity);
            output::print(format!("removed owner of '{store}'"), ctx.verbosity);
        }
        OwnerAction::List => {
            let outcome = ctx.registry.list_owners(&ctx.caller)?;
            emit_notices(&outcome.notices, ctx.verbosity);
            if outcome.value.is_empty() {
                output::print("no owners", ctx.verbosity);
            }
            for (caller, store) in outcome.value {
                output::print(format!("{caller} -> {store}"), ctx.verbosity);
            }
        }
    }
    Ok(())
}
