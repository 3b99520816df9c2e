//! remote::traits
//!
//! Trait definitions for the external identity collaborators.
//!
//! # Design
//!
//! Both traits are async because the real implementations involve
//! network I/O. Their contracts deliberately hide failure detail:
//! `is_valid` returns a bare `bool` because the policy is fail-closed,
//! and `display` always produces a usable label. [`RemoteError`] only
//! surfaces from construction.

use async_trait::async_trait;
use thiserror::Error;

use crate::core::types::{CallerId, ExternalId};

/// Errors from building remote collaborators.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    BuildFailed(String),
}

/// External identity-validity check.
///
/// Must fail closed: any transport error, unexpected status, or
/// exceeding the bounded wait is reported as `false`.
#[async_trait]
pub trait IdentityValidator: Send + Sync {
    /// Whether the identifier denotes a real external account.
    async fn is_valid(&self, id: ExternalId) -> bool;
}

/// Caller display lookup.
#[async_trait]
pub trait CallerDirectory: Send + Sync {
    /// A human label for the caller, or an "unknown" fallback
    /// containing the raw identity.
    async fn display(&self, caller: &CallerId) -> String;
}

/// The fallback label used when no better display name is available.
pub fn unknown_label(caller: &CallerId) -> String {
    format!("Unknown User ({caller})")
}
