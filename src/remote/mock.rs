//! remote::mock
//!
//! Deterministic identity collaborators for tests.
//!
//! # Example
//!
//! ```
//! use turnstile::remote::mock::MockValidator;
//! use turnstile::remote::IdentityValidator;
//! use turnstile::core::types::ExternalId;
//!
//! # tokio_test::block_on(async {
//! let validator = MockValidator::new();
//! validator.allow(ExternalId::new(123));
//!
//! assert!(validator.is_valid(ExternalId::new(123)).await);
//! assert!(!validator.is_valid(ExternalId::new(999)).await);
//! assert_eq!(validator.calls(), vec![ExternalId::new(123), ExternalId::new(999)]);
//! # });
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::traits::{unknown_label, CallerDirectory, IdentityValidator};
use crate::core::types::{CallerId, ExternalId};

/// Mock validator for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share
/// state.
#[derive(Debug, Clone, Default)]
pub struct MockValidator {
    inner: Arc<Mutex<MockValidatorInner>>,
}

#[derive(Debug, Default)]
struct MockValidatorInner {
    /// Identifiers the validator accepts.
    valid: HashSet<ExternalId>,
    /// Simulate a transport failure: every check reports invalid.
    failing: bool,
    /// Recorded checks for verification.
    calls: Vec<ExternalId>,
}

impl MockValidator {
    /// Create a validator that rejects everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an identifier as valid.
    pub fn allow(&self, id: ExternalId) {
        self.lock().valid.insert(id);
    }

    /// Simulate a transport failure; all checks report invalid.
    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    /// The identifiers checked so far, in order.
    pub fn calls(&self) -> Vec<ExternalId> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockValidatorInner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl IdentityValidator for MockValidator {
    async fn is_valid(&self, id: ExternalId) -> bool {
        let mut inner = self.lock();
        inner.calls.push(id);
        !inner.failing && inner.valid.contains(&id)
    }
}

/// Mock directory for testing.
#[derive(Debug, Clone, Default)]
pub struct MockDirectory {
    labels: Arc<Mutex<HashMap<CallerId, String>>>,
}

impl MockDirectory {
    /// Create a directory with no known callers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a display name for a caller.
    pub fn insert(&self, caller: CallerId, name: impl Into<String>) {
        let mut labels = match self.labels.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        labels.insert(caller, name.into());
    }
}

#[async_trait]
impl CallerDirectory for MockDirectory {
    async fn display(&self, caller: &CallerId) -> String {
        let labels = match self.labels.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match labels.get(caller) {
            Some(name) => format!("{name} ({caller})"),
            None => unknown_label(caller),
        }
    }
}
