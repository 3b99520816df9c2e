//! cli
//!
//! Command-line interface layer.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Resolve configuration and construct the engine
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap, builds a
//! [`crate::engine::Registry`] from configuration, and dispatches to a
//! command handler. All registry state changes flow through the
//! engine's gated critical sections.

pub mod args;
pub mod commands;

pub use args::Cli;

use anyhow::{Context, Result};

use crate::core::config::Config;
use crate::core::types::CallerId;
use crate::engine::Registry;
use crate::remote::{create_directory, create_validator};
use crate::store::FileStore;
use crate::ui::output::{self, Verbosity};

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let verbosity = Verbosity::from_flags(cli.quiet, cli.debug);

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(path) = cli.data_file.clone() {
        config.data_file = path;
    }
    if let Some(path) = config.loaded_from() {
        output::debug(format!("config loaded from {}", path.display()), verbosity);
    }
    output::debug(
        format!("data file: {}", config.data_file.display()),
        verbosity,
    );

    // The root identity is configuration, threaded in explicitly;
    // nothing works without it.
    let root = config
        .root_id
        .clone()
        .context("root_id is not configured; set it in the config file")?;

    let caller = match &cli.caller {
        Some(raw) => CallerId::new(raw.clone())
            .with_context(|| format!("invalid --caller value {raw:?}"))?,
        None => root.clone(),
    };

    let validator = create_validator(&config)?;
    let directory = create_directory(&config)?;
    let registry = Registry::new(FileStore::new(config.data_file.clone()), root, validator);

    let ctx = commands::CommandContext {
        registry,
        directory,
        caller,
        verbosity,
    };

    commands::dispatch(cli.command, &ctx)
}
