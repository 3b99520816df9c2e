//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! Available on all commands:
//! - `--caller <id>`: identity performing the action (defaults to the
//!   configured root identity)
//! - `--config <path>`: explicit config file
//! - `--data-file <path>`: override the persisted state file
//! - `--debug`: enable debug output
//! - `--quiet` / `-q`: minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Turnstile - permission-gated allow-list registry
#[derive(Parser, Debug)]
#[command(name = "tsl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Caller identity performing the action (numeric ID)
    #[arg(long, global = true)]
    pub caller: Option<String>,

    /// Path to the config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the persisted state file
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage stores
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },

    /// Manage store ownership
    Owner {
        #[command(subcommand)]
        action: OwnerAction,
    },

    /// Manage products within a store
    Product {
        #[command(subcommand)]
        action: ProductAction,
    },

    /// Manage a product's whitelist
    Allow {
        #[command(subcommand)]
        action: AllowAction,
    },

    /// Manage the global blacklist
    Deny {
        #[command(subcommand)]
        action: DenyAction,
    },

    /// Manage staff access (root only)
    Staff {
        #[command(subcommand)]
        action: StaffAction,
    },

    /// Show the caller's role and available actions
    Panel,

    /// Show the caller's identity and display name
    Whoami,

    /// Check referential integrity of the registry
    Verify,
}

/// Store subcommands.
#[derive(Subcommand, Debug)]
pub enum StoreAction {
    /// Create a store (the name is sanitized into a key)
    Create { name: String },
    /// Delete a store and its products
    Delete { name: String },
    /// List all stores
    List,
}

/// Owner subcommands.
#[derive(Subcommand, Debug)]
pub enum OwnerAction {
    /// Assign (or transfer) a store's owner
    Set { store: String, owner: String },
    /// Remove a store's owner
    Remove { store: String },
    /// List owner assignments
    List,
}

/// Product subcommands.
#[derive(Subcommand, Debug)]
pub enum ProductAction {
    /// Create a product within a store
    Create { store: String, name: String },
    /// Delete a product and its whitelist
    Delete { store: String, name: String },
    /// List a store's products
    List { store: String },
}

/// Whitelist subcommands.
#[derive(Subcommand, Debug)]
pub enum AllowAction {
    /// Whitelist an identifier for a product
    Add {
        store: String,
        product: String,
        id: u64,
    },
    /// Remove an identifier from a product's whitelist
    Remove {
        store: String,
        product: String,
        id: u64,
    },
    /// List a product's whitelist
    List { store: String, product: String },
}

/// Blacklist subcommands.
#[derive(Subcommand, Debug)]
pub enum DenyAction {
    /// Add an identifier to the global blacklist
    Add { id: u64 },
    /// Remove an identifier from the global blacklist
    Remove { id: u64 },
    /// List the global blacklist
    List,
}

/// Staff subcommands.
#[derive(Subcommand, Debug)]
pub enum StaffAction {
    /// Grant staff access to an identity
    Add { id: String },
    /// Revoke staff access from an identity
    Remove { id: String },
    /// List staff identities
    List,
}
