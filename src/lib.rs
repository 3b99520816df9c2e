//! # Turnstile
//!
//! A permission-gated allow-list registry: stores contain products,
//! products carry whitelists of numeric external identifiers, and a
//! global blacklist vetoes new additions. Every mutation passes a
//! role gate (root, staff, or store owner) before it touches state.
//!
//! ## Architecture
//!
//! The crate is layered:
//!
//! - [`core`] - pure domain logic: validated types, the persisted
//!   schema, aggregate transforms, policy, and verification
//! - [`store`] - single-file JSON persistence with locking, atomic
//!   writes, and self-healing recovery
//! - [`remote`] - external identity checks behind trait seams
//! - [`engine`] - the [`engine::Registry`], which orchestrates
//!   authorize -> transform -> persist as one critical section
//! - [`cli`] - the `tsl` command-line binary
//! - [`ui`] - output formatting
//!
//! Dependencies flow downward only; `core` knows nothing about
//! persistence or the network.

pub mod cli;
pub mod core;
pub mod engine;
pub mod remote;
pub mod store;
pub mod ui;
