//! core::policy
//!
//! Role resolution and capability gating.
//!
//! # Architecture
//!
//! A caller's [`Role`] is a pure function of the caller identity, the
//! current aggregate, and the configured root identity. Commands never
//! inspect the aggregate's `staff` or `owners` maps directly; they ask
//! the role whether it grants a [`Capability`].
//!
//! # Precedence
//!
//! Root identity wins over staff membership, which wins over store
//! ownership. A caller matching none of the three is [`Role::None`].
//!
//! # Invariants
//!
//! - Role resolution is deterministic given the same aggregate
//! - Only `Root` grants [`Capability::ManageStaff`]
//! - `Owner(s)` grants exactly [`Capability::ManageStore`] for `s`
//!
//! # Example
//!
//! ```
//! use turnstile::core::policy::{resolve_role, Capability, Role};
//! use turnstile::core::schema::Aggregate;
//! use turnstile::core::types::CallerId;
//!
//! let agg = Aggregate::empty();
//! let root = CallerId::new("1").unwrap();
//!
//! let role = resolve_role(&root, &agg, &root);
//! assert_eq!(role, Role::Root);
//! assert!(role.grants(&Capability::ManageStaff));
//! ```

use super::schema::Aggregate;
use super::types::{CallerId, StoreName};

/// A caller's computed authorization level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    /// The configured root identity. Full capability, including staff
    /// management. Never stored in the aggregate.
    Root,

    /// Elevated, non-root access. Full administrative capability
    /// except mutating the staff set itself.
    Staff,

    /// Owner of exactly one store; may act only within it.
    Owner(StoreName),

    /// No recognized access.
    None,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Root => f.write_str("root"),
            Role::Staff => f.write_str("staff"),
            Role::Owner(store) => write!(f, "owner of {:?}", store.as_str()),
            Role::None => f.write_str("unprivileged"),
        }
    }
}

/// What an operation requires of the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability {
    /// Registry-wide administration: stores, owners, the blacklist.
    Administer,

    /// Mutating the staff set. Root-only.
    ManageStaff,

    /// Products and whitelist entries within one named store.
    ManageStore(StoreName),
}

impl Role {
    /// Check whether this role grants a capability.
    pub fn grants(&self, cap: &Capability) -> bool {
        match (self, cap) {
            (Role::Root, _) => true,
            (Role::Staff, Capability::ManageStaff) => false,
            (Role::Staff, _) => true,
            (Role::Owner(owned), Capability::ManageStore(store)) => owned == store,
            _ => false,
        }
    }
}

/// Compute a caller's role from the current aggregate.
///
/// Precedence: configured root, then staff membership, then store
/// ownership, then none.
pub fn resolve_role(caller: &CallerId, agg: &Aggregate, root: &CallerId) -> Role {
    if caller == root {
        Role::Root
    } else if agg.staff.contains(caller) {
        Role::Staff
    } else if let Some(store) = agg.owners.get(caller) {
        Role::Owner(store.clone())
    } else {
        Role::None
    }
}

/// An action exposed by the command surface.
///
/// Panels are declarative: the core names the actions a role may take
/// and the presentation layer renders them however it likes. No UI
/// widgets cross this boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateStore,
    DeleteStore,
    AssignOwner,
    RemoveOwner,
    CreateProduct,
    DeleteProduct,
    WhitelistAdd,
    WhitelistRemove,
    BlacklistAdd,
    BlacklistRemove,
    StaffAdd,
    StaffRemove,
    ListStores,
    ListProducts,
    ListWhitelist,
}

impl Action {
    /// Human label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Action::CreateStore => "create store",
            Action::DeleteStore => "delete store",
            Action::AssignOwner => "assign owner",
            Action::RemoveOwner => "remove owner",
            Action::CreateProduct => "create product",
            Action::DeleteProduct => "delete product",
            Action::WhitelistAdd => "whitelist identifier",
            Action::WhitelistRemove => "unwhitelist identifier",
            Action::BlacklistAdd => "blacklist identifier",
            Action::BlacklistRemove => "unblacklist identifier",
            Action::StaffAdd => "add staff",
            Action::StaffRemove => "remove staff",
            Action::ListStores => "list stores",
            Action::ListProducts => "list products",
            Action::ListWhitelist => "list whitelist",
        }
    }
}

/// Actions available to administrators (root and staff).
const ADMIN_ACTIONS: &[Action] = &[
    Action::CreateStore,
    Action::DeleteStore,
    Action::AssignOwner,
    Action::RemoveOwner,
    Action::CreateProduct,
    Action::DeleteProduct,
    Action::WhitelistAdd,
    Action::WhitelistRemove,
    Action::BlacklistAdd,
    Action::BlacklistRemove,
    Action::ListStores,
    Action::ListProducts,
    Action::ListWhitelist,
];

/// Additional actions reserved for root.
const ROOT_ONLY_ACTIONS: &[Action] = &[Action::StaffAdd, Action::StaffRemove];

/// Actions available to a store owner within their store.
const OWNER_ACTIONS: &[Action] = &[
    Action::CreateProduct,
    Action::DeleteProduct,
    Action::WhitelistAdd,
    Action::WhitelistRemove,
    Action::ListProducts,
    Action::ListWhitelist,
];

/// The set of actions available to a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelDescriptor {
    /// The role the panel was computed for.
    pub role: Role,
    /// Actions the role may take, in display order.
    pub actions: Vec<Action>,
}

/// Compute the declarative panel for a role.
pub fn panel_for(role: &Role) -> PanelDescriptor {
    let actions = match role {
        Role::Root => {
            let mut actions = ADMIN_ACTIONS.to_vec();
            actions.extend_from_slice(ROOT_ONLY_ACTIONS);
            actions
        }
        Role::Staff => ADMIN_ACTIONS.to_vec(),
        Role::Owner(_) => OWNER_ACTIONS.to_vec(),
        Role::None => Vec::new(),
    };
    PanelDescriptor {
        role: role.clone(),
        actions,
    }
}
