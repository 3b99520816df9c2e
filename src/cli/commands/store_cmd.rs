//! cli::commands::store_cmd
//!
//! Store create/delete/list.

use anyhow::Result;

use super::{emit_notices, CommandContext};
use crate::cli::args::StoreAction;
use crate::ui::output;

pub fn run(action: StoreAction, ctx: &CommandContext) -> Result<()> {
    match action {
        StoreAction::Create { name } => {
            let outcome = ctx.registry.create_store(&ctx.caller, &name)?;
            emit_notices(&outcome.notices, ctx.verbosity);
            output::print(
                format!("created store '{}'", outcome.value),
                ctx.verbosity,
            );
        }
        StoreAction::Delete { name } => {
            let outcome = ctx.registry.delete_store(&ctx.caller, &name)?;
            emit_notices(&outcome.notices, ctx.verbosity);
            output::print(
                format!("deleted store '{}'", outcome.value),
                ctx.verbosity,
            );
        }
        StoreAction::List => {
            let outcome = ctx.registry.list_stores(&ctx.caller)?;
            emit_notices(&outcome.notices, ctx.verbosity);
            if outcome.value.is_empty() {
                output::print("no stores", ctx.verbosity);
            }
            for store in outcome.value {
                let owner = store
                    .owner_id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "unowned".to_string());
                output::print(
                    format!(
                        "{} (owner: {}, products: {})",
                        store.name, owner, store.product_count
                    ),
                    ctx.verbosity,
                );
            }
        }
    }
    Ok(())
}
