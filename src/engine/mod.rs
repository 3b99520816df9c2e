//! engine
//!
//! Orchestrates authorize -> transform -> persist for every registry
//! operation.
//!
//! # Architecture
//!
//! [`Registry`] is the single doorway for mutations. Each operation is
//! one unbroken critical section: lock, load, pure transform, save,
//! unlock. The in-process mutex guarantees a read-modify-write cycle
//! never interleaves with another's; the store's own lock file guards
//! the load/save pair at the OS level.
//!
//! External identity checks run between an authorization pass and the
//! critical section: the caller's role is confirmed before any network
//! I/O happens, and no network I/O happens while the lock is held. A
//! negative or failed check rejects the operation with `InvalidId`
//! (fail closed).
//!
//! # Invariants
//!
//! - No operation mutates the aggregate without passing the gate
//! - A failed transform never reaches `save`
//! - A failed save surfaces as [`EngineError::Persistence`] ("the
//!   change may not have been saved"); the previously-committed file
//!   is untouched
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use turnstile::core::types::CallerId;
//! use turnstile::engine::Registry;
//! use turnstile::remote::AllowValidator;
//! use turnstile::store::FileStore;
//!
//! let root = CallerId::new("1").unwrap();
//! let registry = Registry::new(
//!     FileStore::new("data.json"),
//!     root.clone(),
//!     Arc::new(AllowValidator),
//! );
//!
//! let outcome = registry.create_store(&root, "My Shop").unwrap();
//! assert_eq!(outcome.value.as_str(), "my_shop");
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;

use crate::core::ops::{self, OpError};
use crate::core::policy::{panel_for, resolve_role, Capability, PanelDescriptor, Role};
use crate::core::schema::Aggregate;
use crate::core::types::{CallerId, ExternalId, ProductName, StoreName, TypeError};
use crate::core::verify::{self, VerifyResult};
use crate::remote::IdentityValidator;
use crate::store::{FileStore, LoadResult, StoreError, StoreNotice};

/// Errors from engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The caller's role does not grant the required capability.
    #[error("permission denied: {role} may not {action}")]
    Denied {
        role: Role,
        action: &'static str,
    },

    /// The operation's own preconditions failed.
    #[error(transparent)]
    Op(#[from] OpError),

    /// The change may not have been saved.
    #[error("persistence failure (the change may not have been saved): {0}")]
    Persistence(#[from] StoreError),
}

impl EngineError {
    fn invalid_name(err: TypeError) -> Self {
        let raw = match err {
            TypeError::InvalidName(raw) => raw,
            other => other.to_string(),
        };
        EngineError::Op(OpError::InvalidName(raw))
    }
}

/// A successful operation result plus any self-healing notices the
/// store produced while loading.
#[derive(Debug)]
pub struct Outcome<T> {
    /// The operation's value.
    pub value: T,
    /// Store notices for the caller to surface as warnings.
    pub notices: Vec<StoreNotice>,
}

/// Row of a store listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSummary {
    pub name: StoreName,
    pub owner_id: Option<CallerId>,
    pub product_count: usize,
}

/// Row of a product listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSummary {
    pub name: ProductName,
    pub whitelist_len: usize,
}

/// The single doorway for registry operations.
pub struct Registry {
    store: FileStore,
    root: CallerId,
    validator: Arc<dyn IdentityValidator>,
    /// Serializes whole read-modify-write cycles.
    guard: Mutex<()>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("store", &self.store)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl Registry {
    /// Create a registry over a store, with the configured root
    /// identity and identity validator threaded in explicitly.
    pub fn new(
        store: FileStore,
        root: CallerId,
        validator: Arc<dyn IdentityValidator>,
    ) -> Self {
        Self {
            store,
            root,
            validator,
            guard: Mutex::new(()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        match self.guard.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// One unbroken critical section: lock, load, gate, transform,
    /// save.
    fn mutate<T>(
        &self,
        caller: &CallerId,
        cap: Capability,
        action: &'static str,
        transform: impl FnOnce(&mut Aggregate) -> Result<T, OpError>,
    ) -> Result<Outcome<T>, EngineError> {
        let _guard = self.lock();
        let LoadResult {
            mut aggregate,
            notices,
        } = self.store.load()?;

        let role = resolve_role(caller, &aggregate, &self.root);
        if !role.grants(&cap) {
            return Err(EngineError::Denied { role, action });
        }

        let value = transform(&mut aggregate)?;
        self.store.save(&aggregate)?;
        Ok(Outcome { value, notices })
    }

    /// Gated read: lock, load, gate, borrow.
    fn read<T>(
        &self,
        caller: &CallerId,
        cap: Capability,
        action: &'static str,
        view: impl FnOnce(&Aggregate) -> Result<T, OpError>,
    ) -> Result<Outcome<T>, EngineError> {
        let _guard = self.lock();
        let LoadResult { aggregate, notices } = self.store.load()?;

        let role = resolve_role(caller, &aggregate, &self.root);
        if !role.grants(&cap) {
            return Err(EngineError::Denied { role, action });
        }

        let value = view(&aggregate)?;
        Ok(Outcome { value, notices })
    }

    /// Authorization-only pass: lock, load, gate, unlock.
    ///
    /// Used by operations that must consult the network before
    /// mutating, so the external check never runs for a denied caller.
    /// The subsequent `mutate` re-checks the role inside its own
    /// critical section.
    fn authorize(
        &self,
        caller: &CallerId,
        cap: Capability,
        action: &'static str,
    ) -> Result<Vec<StoreNotice>, EngineError> {
        let _guard = self.lock();
        let LoadResult { aggregate, notices } = self.store.load()?;

        let role = resolve_role(caller, &aggregate, &self.root);
        if !role.grants(&cap) {
            return Err(EngineError::Denied { role, action });
        }
        Ok(notices)
    }

    fn store_key(raw: &str) -> Result<StoreName, EngineError> {
        StoreName::new(raw).map_err(EngineError::invalid_name)
    }

    fn product_key(raw: &str) -> Result<ProductName, EngineError> {
        ProductName::new(raw).map_err(EngineError::invalid_name)
    }

    async fn check_identity(&self, id: ExternalId) -> Result<(), EngineError> {
        if self.validator.is_valid(id).await {
            Ok(())
        } else {
            Err(EngineError::Op(OpError::InvalidId(id.to_string())))
        }
    }

    // --- Role and panel ----------------------------------------------

    /// Compute the caller's role. Available to every caller.
    pub fn role_of(&self, caller: &CallerId) -> Result<Outcome<Role>, EngineError> {
        let _guard = self.lock();
        let LoadResult { aggregate, notices } = self.store.load()?;
        let value = resolve_role(caller, &aggregate, &self.root);
        Ok(Outcome { value, notices })
    }

    /// Compute the caller's panel: role plus available actions.
    pub fn panel(&self, caller: &CallerId) -> Result<Outcome<PanelDescriptor>, EngineError> {
        let outcome = self.role_of(caller)?;
        Ok(Outcome {
            value: panel_for(&outcome.value),
            notices: outcome.notices,
        })
    }

    // --- Stores and owners -------------------------------------------

    /// Create a store. Administrators only.
    pub fn create_store(
        &self,
        caller: &CallerId,
        name: &str,
    ) -> Result<Outcome<StoreName>, EngineError> {
        let key = Self::store_key(name)?;
        self.mutate(caller, Capability::Administer, "create a store", |agg| {
            ops::create_store(agg, &key)?;
            Ok(key.clone())
        })
    }

    /// Delete a store, cascading its owner entry.
    pub fn delete_store(
        &self,
        caller: &CallerId,
        name: &str,
    ) -> Result<Outcome<StoreName>, EngineError> {
        let key = Self::store_key(name)?;
        self.mutate(caller, Capability::Administer, "delete a store", |agg| {
            ops::delete_store(agg, &key)?;
            Ok(key.clone())
        })
    }

    /// Assign (or transfer) ownership of a store.
    pub fn assign_owner(
        &self,
        caller: &CallerId,
        store: &str,
        new_owner: &CallerId,
    ) -> Result<Outcome<()>, EngineError> {
        let key = Self::store_key(store)?;
        self.mutate(caller, Capability::Administer, "assign a store owner", |agg| {
            ops::assign_owner(agg, &key, new_owner)
        })
    }

    /// Remove a store's owner.
    pub fn remove_owner(
        &self,
        caller: &CallerId,
        store: &str,
    ) -> Result<Outcome<()>, EngineError> {
        let key = Self::store_key(store)?;
        self.mutate(caller, Capability::Administer, "remove a store owner", |agg| {
            ops::remove_owner(agg, &key)
        })
    }

    /// List all stores. Administrators only.
    pub fn list_stores(
        &self,
        caller: &CallerId,
    ) -> Result<Outcome<Vec<StoreSummary>>, EngineError> {
        self.read(caller, Capability::Administer, "list stores", |agg| {
            Ok(agg
                .stores
                .iter()
                .map(|(name, record)| StoreSummary {
                    name: name.clone(),
                    owner_id: record.owner_id.clone(),
                    product_count: record.products.len(),
                })
                .collect())
        })
    }

    /// List owner assignments. Administrators only.
    pub fn list_owners(
        &self,
        caller: &CallerId,
    ) -> Result<Outcome<Vec<(CallerId, StoreName)>>, EngineError> {
        self.read(caller, Capability::Administer, "list owners", |agg| {
            Ok(agg
                .owners
                .iter()
                .map(|(caller, store)| (caller.clone(), store.clone()))
                .collect())
        })
    }

    // --- Products ----------------------------------------------------

    /// Create a product within a store.
    pub fn create_product(
        &self,
        caller: &CallerId,
        store: &str,
        product: &str,
    ) -> Result<Outcome<ProductName>, EngineError> {
        let store_key = Self::store_key(store)?;
        let product_key = Self::product_key(product)?;
        self.mutate(
            caller,
            Capability::ManageStore(store_key.clone()),
            "create a product",
            |agg| {
                ops::create_product(agg, &store_key, &product_key)?;
                Ok(product_key.clone())
            },
        )
    }

    /// Delete a product and its whitelist.
    pub fn delete_product(
        &self,
        caller: &CallerId,
        store: &str,
        product: &str,
    ) -> Result<Outcome<ProductName>, EngineError> {
        let store_key = Self::store_key(store)?;
        let product_key = Self::product_key(product)?;
        self.mutate(
            caller,
            Capability::ManageStore(store_key.clone()),
            "delete a product",
            |agg| {
                ops::delete_product(agg, &store_key, &product_key)?;
                Ok(product_key.clone())
            },
        )
    }

    /// List a store's products.
    pub fn list_products(
        &self,
        caller: &CallerId,
        store: &str,
    ) -> Result<Outcome<Vec<ProductSummary>>, EngineError> {
        let store_key = Self::store_key(store)?;
        self.read(
            caller,
            Capability::ManageStore(store_key.clone()),
            "list products",
            |agg| {
                let record = ops::store_record(agg, &store_key)?;
                Ok(record
                    .products
                    .iter()
                    .map(|(name, product)| ProductSummary {
                        name: name.clone(),
                        whitelist_len: product.whitelist.len(),
                    })
                    .collect())
            },
        )
    }

    // --- Whitelist ---------------------------------------------------

    /// Add an identifier to a product's whitelist.
    ///
    /// The caller's role is confirmed first; only then does the
    /// external validity check run (fail closed). The blacklist and
    /// duplicate checks run inside the critical section.
    pub async fn whitelist_add(
        &self,
        caller: &CallerId,
        store: &str,
        product: &str,
        id: ExternalId,
    ) -> Result<Outcome<()>, EngineError> {
        let store_key = Self::store_key(store)?;
        let product_key = Self::product_key(product)?;
        let cap = Capability::ManageStore(store_key.clone());
        let mut notices = self.authorize(caller, cap.clone(), "whitelist an identifier")?;
        self.check_identity(id).await?;
        let outcome = self.mutate(caller, cap, "whitelist an identifier", |agg| {
            ops::whitelist_add(agg, &store_key, &product_key, id)
        })?;
        notices.extend(outcome.notices);
        Ok(Outcome {
            value: outcome.value,
            notices,
        })
    }

    /// Remove an identifier from a product's whitelist.
    pub fn whitelist_remove(
        &self,
        caller: &CallerId,
        store: &str,
        product: &str,
        id: ExternalId,
    ) -> Result<Outcome<()>, EngineError> {
        let store_key = Self::store_key(store)?;
        let product_key = Self::product_key(product)?;
        self.mutate(
            caller,
            Capability::ManageStore(store_key.clone()),
            "unwhitelist an identifier",
            |agg| ops::whitelist_remove(agg, &store_key, &product_key, id),
        )
    }

    /// List a product's whitelist.
    pub fn list_whitelist(
        &self,
        caller: &CallerId,
        store: &str,
        product: &str,
    ) -> Result<Outcome<Vec<ExternalId>>, EngineError> {
        let store_key = Self::store_key(store)?;
        let product_key = Self::product_key(product)?;
        self.read(
            caller,
            Capability::ManageStore(store_key.clone()),
            "list a whitelist",
            |agg| {
                let record = ops::product_record(agg, &store_key, &product_key)?;
                Ok(record.whitelist.iter().copied().collect())
            },
        )
    }

    // --- Blacklist ---------------------------------------------------

    /// Add an identifier to the global blacklist.
    ///
    /// Gated like every mutation before the external validity check
    /// runs. Succeeds even when the identifier is whitelisted
    /// somewhere; existing whitelist entries are not purged.
    pub async fn blacklist_add(
        &self,
        caller: &CallerId,
        id: ExternalId,
    ) -> Result<Outcome<()>, EngineError> {
        let mut notices =
            self.authorize(caller, Capability::Administer, "blacklist an identifier")?;
        self.check_identity(id).await?;
        let outcome = self.mutate(
            caller,
            Capability::Administer,
            "blacklist an identifier",
            |agg| ops::blacklist_add(agg, id),
        )?;
        notices.extend(outcome.notices);
        Ok(Outcome {
            value: outcome.value,
            notices,
        })
    }

    /// Remove an identifier from the global blacklist.
    pub fn blacklist_remove(
        &self,
        caller: &CallerId,
        id: ExternalId,
    ) -> Result<Outcome<()>, EngineError> {
        self.mutate(
            caller,
            Capability::Administer,
            "unblacklist an identifier",
            |agg| ops::blacklist_remove(agg, id),
        )
    }

    /// List the global blacklist. Administrators only.
    pub fn list_blacklist(
        &self,
        caller: &CallerId,
    ) -> Result<Outcome<Vec<ExternalId>>, EngineError> {
        self.read(caller, Capability::Administer, "list the blacklist", |agg| {
            Ok(agg.blacklist.iter().copied().collect())
        })
    }

    // --- Staff -------------------------------------------------------

    /// Grant staff access. Root only.
    pub fn staff_add(
        &self,
        caller: &CallerId,
        member: &CallerId,
    ) -> Result<Outcome<()>, EngineError> {
        self.mutate(caller, Capability::ManageStaff, "add staff", |agg| {
            ops::staff_add(agg, member)
        })
    }

    /// Revoke staff access. Root only.
    pub fn staff_remove(
        &self,
        caller: &CallerId,
        member: &CallerId,
    ) -> Result<Outcome<()>, EngineError> {
        self.mutate(caller, Capability::ManageStaff, "remove staff", |agg| {
            ops::staff_remove(agg, member)
        })
    }

    /// List staff identities. Administrators only.
    pub fn list_staff(
        &self,
        caller: &CallerId,
    ) -> Result<Outcome<Vec<CallerId>>, EngineError> {
        self.read(caller, Capability::Administer, "list staff", |agg| {
            Ok(agg.staff.iter().cloned().collect())
        })
    }

    // --- Diagnostics -------------------------------------------------

    /// Run referential-integrity verification. Administrators only.
    pub fn verify(&self, caller: &CallerId) -> Result<Outcome<VerifyResult>, EngineError> {
        self.read(caller, Capability::Administer, "verify the registry", |agg| {
            Ok(verify::verify(agg))
        })
    }
}
