//! remote
//!
//! External identity collaborators.
//!
//! # Architecture
//!
//! Two thin HTTP collaborators sit outside the core:
//!
//! - [`IdentityValidator`] answers "does this external identifier
//!   denote a real account?". Consumed by the engine before whitelist
//!   and blacklist additions. Fails closed: transport errors,
//!   non-success statuses, and timeouts all mean "invalid".
//! - [`CallerDirectory`] resolves a caller identity to a human label,
//!   falling back to an "unknown" label containing the raw identity.
//!   Presentation only; no invariant depends on it.
//!
//! Remote failures never compromise local correctness: a failed check
//! rejects the single operation that needed it and nothing else.
//!
//! # Modules
//!
//! - `traits`: the two async traits and [`RemoteError`]
//! - [`http`]: reqwest implementations with a fixed request timeout
//! - [`mock`]: deterministic implementations for tests
//! - `factory`: construction from configuration

mod factory;
pub mod http;
pub mod mock;
mod traits;

pub use factory::{create_directory, create_validator, AllowValidator, FallbackDirectory};
pub use traits::*;
