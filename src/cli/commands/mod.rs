//! cli::commands
//!
//! Command handlers. Each handler calls into the engine, surfaces any
//! store notices as warnings, and formats the result for display.

mod allow;
mod deny;
mod owner;
mod panel;
mod product;
mod staff;
mod store_cmd;
mod verify_cmd;

use std::sync::Arc;

use anyhow::Result;

use super::args::Command;
use crate::core::types::CallerId;
use crate::engine::Registry;
use crate::remote::CallerDirectory;
use crate::store::StoreNotice;
use crate::ui::output::{self, Verbosity};

/// Everything a command handler needs.
pub struct CommandContext {
    /// The engine.
    pub registry: Registry,
    /// Caller display lookup (presentation only).
    pub directory: Arc<dyn CallerDirectory>,
    /// The identity performing the action.
    pub caller: CallerId,
    /// Output verbosity.
    pub verbosity: Verbosity,
}

/// Dispatch a parsed command to its handler.
pub fn dispatch(command: Command, ctx: &CommandContext) -> Result<()> {
    match command {
        Command::Store { action } => store_cmd::run(action, ctx),
        Command::Owner { action } => owner::run(action, ctx),
        Command::Product { action } => product::run(action, ctx),
        Command::Allow { action } => allow::run(action, ctx),
        Command::Deny { action } => deny::run(action, ctx),
        Command::Staff { action } => staff::run(action, ctx),
        Command::Panel => panel::run_panel(ctx),
        Command::Whoami => panel::run_whoami(ctx),
        Command::Verify => verify_cmd::run(ctx),
    }
}

/// Surface store self-healing notices as warnings.
pub(crate) fn emit_notices(notices: &[StoreNotice], verbosity: Verbosity) {
    for notice in notices {
        output::warn(notice, verbosity);
    }
}
