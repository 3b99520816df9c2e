//! cli::commands::product
//!
//! Product create/delete/list within a store.

use anyhow::Result;

use super::{emit_notices, CommandContext};
use crate::cli::args::ProductAction;
use crate::ui::output;

pub fn run(action: ProductAction, ctx: &CommandContext) -> Result<()> {
    match action {
        ProductAction::Create { store, name } => {
            let outcome = ctx.registry.create_product(&ctx.caller, &store, &name)?;
            emit_notices(&outcome.notices, ctx.verbosity);
            output::print(
                format!("created product '{}' in '{}'", outcome.value, store),
                ctx.verbosity,
            );
        }
        ProductAction::Delete { store, name } => {
            let outcome = ctx.registry.delete_product(&ctx.caller, &store, &name)?;
            emit_notices(&outcome.notices, ctx.verbosity);
            output::print(
                format!("deleted product '{}' from '{}'", outcome.value, store),
                ctx.verbosity,
            );
        }
        ProductAction::List { store } => {
            let outcome = ctx.registry.list_products(&ctx.caller, &store)?;
            emit_notices(&outcome.notices, ctx.verbosity);
            if outcome.value.is_empty() {
                output::print("no products", ctx.verbosity);
            }
            for product in outcome.value {
                output::print(
                    format!("{} ({} whitelisted)", product.name, product.whitelist_len),
                    ctx.verbosity,
                );
            }
        }
    }
    Ok(())
}
