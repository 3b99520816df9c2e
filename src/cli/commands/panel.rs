//! cli::commands::panel
//!
//! Role display: `panel` shows the caller's role and the actions it
//! grants; `whoami` resolves a display label through the directory.

use anyhow::Result;

use super::{emit_notices, CommandContext};
use crate::ui::output;

pub fn run_panel(ctx: &CommandContext) -> Result<()> {
    let outcome = ctx.registry.panel(&ctx.caller)?;
    emit_notices(&outcome.notices, ctx.verbosity);

    let panel = outcome.value;
    output::print(format!("role: {}", panel.role), ctx.verbosity);
    if panel.actions.is_empty() {
        output::print("no actions available", ctx.verbosity);
    } else {
        output::print("available actions:", ctx.verbosity);
        for action in panel.actions {
            output::print(format!("  {}", action.label()), ctx.verbosity);
        }
    }
    Ok(())
}

pub fn run_whoami(ctx: &CommandContext) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    let label = rt.block_on(ctx.directory.display(&ctx.caller));

    let outcome = ctx.registry.role_of(&ctx.caller)?;
    emit_notices(&outcome.notices, ctx.verbosity);
    output::print(format!("{label}: {}", outcome.value), ctx.verbosity);
    Ok(())
}
