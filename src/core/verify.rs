//! core::verify
//!
//! Referential-integrity verification of an aggregate.
//!
//! # Checks
//!
//! Errors (a reachable aggregate must never exhibit these):
//! - Every value in `owners` names an existing store
//! - A store's `owner_id` and the `owners` map agree in both directions
//!
//! Warnings (legal but notable):
//! - An identifier present in both a product's whitelist and the
//!   global blacklist. This state arises legitimately when an
//!   identifier is blacklisted after being whitelisted; existing
//!   entries are not purged.
//!
//! # Invariants
//!
//! - Never mutates the aggregate
//! - Deterministic

use thiserror::Error;

use super::schema::Aggregate;

/// Errors from verification.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error("owner {caller} references missing store {store:?}")]
    OwnerStoreMissing { caller: String, store: String },

    #[error("owner {caller} maps to {store:?} but that store's owner is {actual:?}")]
    OwnerMismatch {
        caller: String,
        store: String,
        actual: Option<String>,
    },

    #[error("store {store:?} lists owner {caller} who has no owners entry for it")]
    OwnerEntryMissing { store: String, caller: String },
}

/// Notable-but-legal conditions.
#[derive(Debug, PartialEq, Eq)]
pub struct VerifyWarning {
    /// Human-readable description.
    pub message: String,
}

/// Result of verification.
#[derive(Debug)]
pub struct VerifyResult {
    /// Whether all integrity checks passed.
    pub ok: bool,
    /// Integrity violations found.
    pub errors: Vec<VerifyError>,
    /// Legal but notable conditions.
    pub warnings: Vec<VerifyWarning>,
}

/// Verify referential integrity of an aggregate.
pub fn verify(agg: &Aggregate) -> VerifyResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for (caller, store_name) in &agg.owners {
        match agg.stores.get(store_name) {
            None => errors.push(VerifyError::OwnerStoreMissing {
                caller: caller.to_string(),
                store: store_name.as_str().to_string(),
            }),
            Some(record) => {
                if record.owner_id.as_ref() != Some(caller) {
                    errors.push(VerifyError::OwnerMismatch {
                        caller: caller.to_string(),
                        store: store_name.as_str().to_string(),
                        actual: record.owner_id.as_ref().map(|c| c.to_string()),
                    });
                }
            }
        }
    }

    for (store_name, record) in &agg.stores {
        if let Some(owner) = &record.owner_id {
            if agg.owners.get(owner) != Some(store_name) {
                errors.push(VerifyError::OwnerEntryMissing {
                    store: store_name.as_str().to_string(),
                    caller: owner.to_string(),
                });
            }
        }

        for (product_name, product) in &record.products {
            for id in product.whitelist.intersection(&agg.blacklist) {
                warnings.push(VerifyWarning {
                    message: format!(
                        "identifier {} in whitelist of {}/{} is globally blacklisted",
                        id,
                        store_name.as_str(),
                        product_name.as_str()
                    ),
                });
            }
        }
    }

    VerifyResult {
        ok: errors.is_empty(),
        errors,
        warnings,
    }
}
