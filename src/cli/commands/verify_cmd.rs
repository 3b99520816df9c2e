//! cli::commands::verify_cmd
//!
//! Referential-integrity check over the persisted registry.

use anyhow::{bail, Result};

use super::{emit_notices, CommandContext};
use crate::ui::output;

pub fn run(ctx: &CommandContext) -> Result<()> {
    let outcome = ctx.registry.verify(&ctx.caller)?;
    emit_notices(&outcome.notices, ctx.verbosity);

    let result = outcome.value;
    for warning in &result.warnings {
        output::warn(&warning.message, ctx.verbosity);
    }

    if result.ok {
        output::print("registry is consistent", ctx.verbosity);
        Ok(())
    } else {
        for error in &result.errors {
            output::error(error);
        }
        bail!("registry failed verification with {} error(s)", result.errors.len());
    }
}
