//! cli::commands::allow
//!
//! Whitelist add/remove/list for a product.
//!
//! `allow add` consults the external identity check, so it runs on a
//! Tokio runtime via `block_on`; the other actions are synchronous.

use anyhow::Result;

use super::{emit_notices, CommandContext};
use crate::cli::args::AllowAction;
use crate::core::types::ExternalId;
use crate::ui::output;

pub fn run(action: AllowAction, ctx: &CommandContext) -> Result<()> {
    match action {
        AllowAction::Add { store, product, id } => {
            let rt = tokio::runtime::Runtime::new()?;
            let outcome = rt.block_on(ctx.registry.whitelist_add(
                &ctx.caller,
                &store,
                &product,
                ExternalId::new(id),
            ))?;
            emit_notices(&outcome.notices, ctx.verbosity);
            output::print(
                format!("whitelisted {id} for '{store}/{product}'"),
                ctx.verbosity,
            );
        }
        AllowAction::Remove { store, product, id } => {
            let outcome = ctx.registry.whitelist_remove(
                &ctx.caller,
                &store,
                &product,
                ExternalId::new(id),
            )?;
            emit_notices(&outcome.notices, ctx.verbosity);
            output::print(
                format!("unwhitelisted {id} from '{store}/{product}'"),
                ctx.verbosity,
            );
        }
        AllowAction::List { store, product } => {
            let outcome = ctx.registry.list_whitelist(&ctx.caller, &store, &product)?;
            emit_notices(&outcome.notices, ctx.verbosity);
            if outcome.value.is_empty() {
                output::print("whitelist is empty", ctx.verbosity);
            }
            for id in outcome.value {
                output::print(id, ctx.verbosity);
            }
        }
    }
    Ok(())
}
