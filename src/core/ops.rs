//! core::ops
//!
//! The registry mutation contract.
//!
//! # Design
//!
//! Every operation is a pure transform over a mutable [`Aggregate`]
//! snapshot: it validates its preconditions first and mutates only
//! after all checks pass, so a failed call leaves the aggregate
//! untouched. Persistence is a separate, explicit step owned by the
//! engine; nothing here touches disk or network.
//!
//! External identity validation is the caller's responsibility: by the
//! time [`whitelist_add`] or [`blacklist_add`] runs, the identifier is
//! already known to denote a real external account.
//!
//! # Invariants
//!
//! - Referential integrity between `owners` and `stores` is preserved
//!   by every transform (see [`crate::core::verify`]).
//! - `whitelist_add` never admits an identifier present in the global
//!   blacklist. Blacklisting after the fact does not purge existing
//!   entries.

use thiserror::Error;

use super::schema::{Aggregate, ProductRecord, StoreRecord};
use super::types::{CallerId, ExternalId, ProductName, StoreName};

/// Errors from registry operations.
///
/// All failures are local and non-fatal; they are reported to the
/// caller as structured results, never raised as process faults.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OpError {
    /// A name sanitized to nothing.
    #[error("invalid name: {0:?} has no usable characters")]
    InvalidName(String),

    /// An identifier is syntactically malformed or failed the external
    /// validity check.
    #[error("invalid external identifier: {0}")]
    InvalidId(String),

    /// A store or product key already exists.
    #[error("duplicate name: {0:?} already exists")]
    DuplicateName(String),

    /// The entry being added is already present.
    #[error("{0} is already present")]
    AlreadyPresent(String),

    /// The named store, product, or entry does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// The store has no owner to remove.
    #[error("store {0:?} has no owner")]
    NotOwned(String),

    /// The identity already owns a store (each identity owns at most
    /// one).
    #[error("caller {caller} already owns store {store:?}")]
    AlreadyOwnsStore { caller: String, store: String },

    /// The identifier is globally blacklisted.
    #[error("identifier {0} is globally blacklisted")]
    Blacklisted(ExternalId),
}

fn store<'a>(agg: &'a Aggregate, name: &StoreName) -> Result<&'a StoreRecord, OpError> {
    agg.stores
        .get(name)
        .ok_or_else(|| OpError::NotFound(format!("store {:?}", name.as_str())))
}

fn store_mut<'a>(agg: &'a mut Aggregate, name: &StoreName) -> Result<&'a mut StoreRecord, OpError> {
    agg.stores
        .get_mut(name)
        .ok_or_else(|| OpError::NotFound(format!("store {:?}", name.as_str())))
}

fn product<'a>(
    agg: &'a Aggregate,
    store_name: &StoreName,
    name: &ProductName,
) -> Result<&'a ProductRecord, OpError> {
    store(agg, store_name)?
        .products
        .get(name)
        .ok_or_else(|| OpError::NotFound(format!("product {:?}", name.as_str())))
}

fn product_mut<'a>(
    agg: &'a mut Aggregate,
    store_name: &StoreName,
    name: &ProductName,
) -> Result<&'a mut ProductRecord, OpError> {
    store_mut(agg, store_name)?
        .products
        .get_mut(name)
        .ok_or_else(|| OpError::NotFound(format!("product {:?}", name.as_str())))
}

/// Create an empty, unowned store.
pub fn create_store(agg: &mut Aggregate, name: &StoreName) -> Result<(), OpError> {
    if agg.stores.contains_key(name) {
        return Err(OpError::DuplicateName(name.as_str().to_string()));
    }
    agg.stores.insert(name.clone(), StoreRecord::default());
    Ok(())
}

/// Delete a store, cascading the matching `owners` entry if owned.
pub fn delete_store(agg: &mut Aggregate, name: &StoreName) -> Result<(), OpError> {
    let record = agg
        .stores
        .remove(name)
        .ok_or_else(|| OpError::NotFound(format!("store {:?}", name.as_str())))?;
    if let Some(owner) = record.owner_id {
        agg.owners.remove(&owner);
    }
    Ok(())
}

/// Assign (or transfer) ownership of a store to a caller identity.
///
/// An identity may own at most one store. If the store already had a
/// different owner, that owner is displaced and their `owners` entry
/// removed.
pub fn assign_owner(
    agg: &mut Aggregate,
    store_name: &StoreName,
    caller: &CallerId,
) -> Result<(), OpError> {
    if !agg.stores.contains_key(store_name) {
        return Err(OpError::NotFound(format!(
            "store {:?}",
            store_name.as_str()
        )));
    }
    if let Some(owned) = agg.owners.get(caller) {
        return Err(OpError::AlreadyOwnsStore {
            caller: caller.to_string(),
            store: owned.as_str().to_string(),
        });
    }

    let record = store_mut(agg, store_name)?;
    let previous = record.owner_id.replace(caller.clone());
    if let Some(previous) = previous {
        agg.owners.remove(&previous);
    }
    agg.owners.insert(caller.clone(), store_name.clone());
    Ok(())
}

/// Remove the owner of a store, leaving it unowned.
pub fn remove_owner(agg: &mut Aggregate, store_name: &StoreName) -> Result<(), OpError> {
    let record = store_mut(agg, store_name)?;
    let owner = record
        .owner_id
        .take()
        .ok_or_else(|| OpError::NotOwned(store_name.as_str().to_string()))?;
    agg.owners.remove(&owner);
    Ok(())
}

/// Create an empty product within a store.
pub fn create_product(
    agg: &mut Aggregate,
    store_name: &StoreName,
    name: &ProductName,
) -> Result<(), OpError> {
    let record = store_mut(agg, store_name)?;
    if record.products.contains_key(name) {
        return Err(OpError::DuplicateName(name.as_str().to_string()));
    }
    record.products.insert(name.clone(), ProductRecord::default());
    Ok(())
}

/// Delete a product and its whitelist.
pub fn delete_product(
    agg: &mut Aggregate,
    store_name: &StoreName,
    name: &ProductName,
) -> Result<(), OpError> {
    let record = store_mut(agg, store_name)?;
    record
        .products
        .remove(name)
        .ok_or_else(|| OpError::NotFound(format!("product {:?}", name.as_str())))?;
    Ok(())
}

/// Add an identifier to a product's whitelist.
///
/// Rejects identifiers in the global blacklist and duplicates. The
/// external validity check happens before this transform is invoked.
pub fn whitelist_add(
    agg: &mut Aggregate,
    store_name: &StoreName,
    product_name: &ProductName,
    id: ExternalId,
) -> Result<(), OpError> {
    // Existence check first so a missing product reports NotFound
    // rather than Blacklisted.
    product(agg, store_name, product_name)?;
    if agg.blacklist.contains(&id) {
        return Err(OpError::Blacklisted(id));
    }
    let record = product_mut(agg, store_name, product_name)?;
    if !record.whitelist.insert(id) {
        return Err(OpError::AlreadyPresent(format!("identifier {id}")));
    }
    Ok(())
}

/// Remove an identifier from a product's whitelist.
pub fn whitelist_remove(
    agg: &mut Aggregate,
    store_name: &StoreName,
    product_name: &ProductName,
    id: ExternalId,
) -> Result<(), OpError> {
    let record = product_mut(agg, store_name, product_name)?;
    if !record.whitelist.remove(&id) {
        return Err(OpError::NotFound(format!("identifier {id}")));
    }
    Ok(())
}

/// Add an identifier to the global blacklist.
///
/// Succeeds even when the identifier is already whitelisted somewhere;
/// existing whitelist entries are not purged (documented policy).
pub fn blacklist_add(agg: &mut Aggregate, id: ExternalId) -> Result<(), OpError> {
    if !agg.blacklist.insert(id) {
        return Err(OpError::AlreadyPresent(format!("identifier {id}")));
    }
    Ok(())
}

/// Remove an identifier from the global blacklist.
pub fn blacklist_remove(agg: &mut Aggregate, id: ExternalId) -> Result<(), OpError> {
    if !agg.blacklist.remove(&id) {
        return Err(OpError::NotFound(format!("identifier {id}")));
    }
    Ok(())
}

/// Grant staff access to a caller identity. Root-only; the engine
/// gates before invoking.
pub fn staff_add(agg: &mut Aggregate, caller: &CallerId) -> Result<(), OpError> {
    if !agg.staff.insert(caller.clone()) {
        return Err(OpError::AlreadyPresent(format!("staff member {caller}")));
    }
    Ok(())
}

/// Revoke staff access from a caller identity.
pub fn staff_remove(agg: &mut Aggregate, caller: &CallerId) -> Result<(), OpError> {
    if !agg.staff.remove(caller) {
        return Err(OpError::NotFound(format!("staff member {caller}")));
    }
    Ok(())
}

/// Borrow a store record for display.
pub fn store_record<'a>(agg: &'a Aggregate, name: &StoreName) -> Result<&'a StoreRecord, OpError> {
    store(agg, name)
}

/// Borrow a product record for display.
pub fn product_record<'a>(
    agg: &'a Aggregate,
    store_name: &StoreName,
    name: &ProductName,
) -> Result<&'a ProductRecord, OpError> {
    product(agg, store_name, name)
}
