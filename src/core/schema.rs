//! core::schema
//!
//! The canonical shape of persisted state.
//!
//! # Format
//!
//! The aggregate persists as a UTF-8 JSON object with exactly four
//! top-level fields: `owners`, `stores`, `staff`, `blacklist`. Ordered
//! maps and sets keep serialization deterministic. Files written by
//! older versions may omit fields; every field carries
//! `#[serde(default)]` so deserialization fills empty defaults, and
//! the store persists the upgraded shape immediately after load.
//!
//! # Invariants
//!
//! - Every value in `owners` names an existing store, and that store's
//!   `owner_id` equals the owning key (bidirectional consistency).
//! - An identifier is never *added* to a whitelist while present in
//!   `blacklist`. Blacklisting does not retroactively purge existing
//!   whitelist entries (documented policy).
//! - The root identity is configuration, never part of the aggregate.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::types::{CallerId, ExternalId, ProductName, StoreName};

/// The four required top-level fields, in canonical order.
pub const TOP_LEVEL_FIELDS: [&str; 4] = ["owners", "stores", "staff", "blacklist"];

/// The full persisted state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregate {
    /// Caller identity to the single store it owns.
    #[serde(default)]
    pub owners: BTreeMap<CallerId, StoreName>,

    /// Store key to store record.
    #[serde(default)]
    pub stores: BTreeMap<StoreName, StoreRecord>,

    /// Caller identities granted elevated, non-root access.
    #[serde(default)]
    pub staff: BTreeSet<CallerId>,

    /// External identifiers globally barred from new whitelist entries.
    #[serde(default)]
    pub blacklist: BTreeSet<ExternalId>,
}

impl Aggregate {
    /// The empty aggregate written on first run.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// A single store: optional owner plus its products.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreRecord {
    /// The owning caller identity, if any.
    #[serde(default)]
    pub owner_id: Option<CallerId>,

    /// Product key to product record.
    #[serde(default)]
    pub products: BTreeMap<ProductName, ProductRecord>,
}

/// A single product: its allow-list of external identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// External identifiers allowed for this product.
    #[serde(default)]
    pub whitelist: BTreeSet<ExternalId>,
}
