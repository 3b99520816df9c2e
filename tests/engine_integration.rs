//! End-to-end registry scenarios: the full store/product/whitelist
//! lifecycle, the permission matrix, and concurrent mutation safety.

use std::sync::Arc;
use std::thread;

use tempfile::TempDir;
use turnstile::core::ops::OpError;
use turnstile::core::policy::Role;
use turnstile::core::types::{CallerId, ExternalId};
use turnstile::engine::{EngineError, Registry};
use turnstile::remote::mock::MockValidator;
use turnstile::remote::AllowValidator;
use turnstile::store::FileStore;

fn caller(raw: &str) -> CallerId {
    CallerId::new(raw).unwrap()
}

struct Setup {
    _dir: TempDir,
    registry: Registry,
    validator: MockValidator,
    root: CallerId,
}

fn setup() -> Setup {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path().join("data.json"));
    let validator = MockValidator::new();
    let root = caller("1");
    let registry = Registry::new(store, root.clone(), Arc::new(validator.clone()));
    Setup {
        _dir: dir,
        registry,
        validator,
        root,
    }
}

#[test]
fn full_lifecycle() {
    let s = setup();
    let rt = tokio::runtime::Runtime::new().unwrap();

    // Root sets up a store with a product and an owner.
    let created = s.registry.create_store(&s.root, "My Shop").unwrap();
    assert_eq!(created.value.as_str(), "my_shop");

    s.registry
        .create_product(&s.root, "my_shop", "Epic Sword!")
        .unwrap();
    s.registry
        .assign_owner(&s.root, "my_shop", &caller("42"))
        .unwrap();

    // The owner whitelists a validated identifier.
    s.validator.allow(ExternalId::new(123));
    rt.block_on(
        s.registry
            .whitelist_add(&caller("42"), "my_shop", "epic_sword", ExternalId::new(123)),
    )
    .unwrap();

    let whitelist = s
        .registry
        .list_whitelist(&caller("42"), "my_shop", "epic_sword")
        .unwrap()
        .value;
    assert_eq!(whitelist, vec![ExternalId::new(123)]);

    // Listings reflect the state.
    let stores = s.registry.list_stores(&s.root).unwrap().value;
    assert_eq!(stores.len(), 1);
    assert_eq!(stores[0].owner_id, Some(caller("42")));
    assert_eq!(stores[0].product_count, 1);

    let products = s.registry.list_products(&s.root, "my_shop").unwrap().value;
    assert_eq!(products[0].whitelist_len, 1);

    // Deleting the store cascades products and the owner entry.
    s.registry.delete_store(&s.root, "my_shop").unwrap();
    assert!(s.registry.list_stores(&s.root).unwrap().value.is_empty());
    assert!(s.registry.list_owners(&s.root).unwrap().value.is_empty());
    assert_eq!(s.registry.role_of(&caller("42")).unwrap().value, Role::None);
}

#[test]
fn blacklisting_after_whitelisting_preserves_existing_entries() {
    let s = setup();
    let rt = tokio::runtime::Runtime::new().unwrap();

    s.registry.create_store(&s.root, "s").unwrap();
    s.registry.create_product(&s.root, "s", "p").unwrap();

    s.validator.allow(ExternalId::new(123));
    rt.block_on(s.registry.whitelist_add(&s.root, "s", "p", ExternalId::new(123)))
        .unwrap();
    rt.block_on(s.registry.blacklist_add(&s.root, ExternalId::new(123)))
        .unwrap();

    // Existing whitelist entry survives; new adds are blocked.
    let whitelist = s.registry.list_whitelist(&s.root, "s", "p").unwrap().value;
    assert_eq!(whitelist, vec![ExternalId::new(123)]);

    s.registry.create_product(&s.root, "s", "q").unwrap();
    let err = rt
        .block_on(s.registry.whitelist_add(&s.root, "s", "q", ExternalId::new(123)))
        .unwrap_err();
    assert!(matches!(err, EngineError::Op(OpError::Blacklisted(_))));

    // Verification reports the overlap as a warning, not an error.
    let result = s.registry.verify(&s.root).unwrap().value;
    assert!(result.ok);
    assert_eq!(result.warnings.len(), 1);

    // Unblacklisting reopens the door.
    s.registry
        .blacklist_remove(&s.root, ExternalId::new(123))
        .unwrap();
    rt.block_on(s.registry.whitelist_add(&s.root, "s", "q", ExternalId::new(123)))
        .unwrap();
}

#[test]
fn an_identity_owns_at_most_one_store() {
    let s = setup();
    s.registry.create_store(&s.root, "first").unwrap();
    s.registry.create_store(&s.root, "second").unwrap();

    s.registry
        .assign_owner(&s.root, "first", &caller("7"))
        .unwrap();

    let err = s
        .registry
        .assign_owner(&s.root, "second", &caller("7"))
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Op(OpError::AlreadyOwnsStore { .. })
    ));

    // Transferring a store displaces the previous owner cleanly.
    s.registry
        .assign_owner(&s.root, "first", &caller("8"))
        .unwrap();
    assert_eq!(s.registry.role_of(&caller("7")).unwrap().value, Role::None);
    s.registry
        .assign_owner(&s.root, "second", &caller("7"))
        .unwrap();
}

#[test]
fn permission_matrix() {
    let s = setup();
    let rt = tokio::runtime::Runtime::new().unwrap();

    s.registry.create_store(&s.root, "shop").unwrap();
    s.registry.staff_add(&s.root, &caller("2")).unwrap();
    s.registry
        .assign_owner(&s.root, "shop", &caller("3"))
        .unwrap();
    s.validator.allow(ExternalId::new(5));

    let stranger = caller("999");
    let staff = caller("2");
    let owner = caller("3");

    // Strangers can do nothing but look at their (empty) panel.
    assert!(matches!(
        s.registry.create_store(&stranger, "x").unwrap_err(),
        EngineError::Denied { .. }
    ));
    assert!(matches!(
        s.registry.list_stores(&stranger).unwrap_err(),
        EngineError::Denied { .. }
    ));
    assert!(matches!(
        s.registry
            .create_product(&stranger, "shop", "p")
            .unwrap_err(),
        EngineError::Denied { .. }
    ));

    // Staff administer everything except the staff list itself.
    s.registry.create_product(&staff, "shop", "p").unwrap();
    rt.block_on(s.registry.blacklist_add(&staff, ExternalId::new(5)))
        .unwrap();
    assert!(matches!(
        s.registry.staff_add(&staff, &caller("4")).unwrap_err(),
        EngineError::Denied { .. }
    ));

    // Owners manage only their own store's products and whitelists.
    s.registry.create_product(&owner, "shop", "q").unwrap();
    assert!(matches!(
        s.registry.create_store(&owner, "another").unwrap_err(),
        EngineError::Denied { .. }
    ));
    assert!(matches!(
        rt.block_on(s.registry.blacklist_add(&owner, ExternalId::new(5)))
            .unwrap_err(),
        EngineError::Denied { .. }
    ));
    assert!(matches!(
        s.registry
            .assign_owner(&owner, "shop", &caller("6"))
            .unwrap_err(),
        EngineError::Denied { .. }
    ));

    // Root can revoke staff.
    s.registry.staff_remove(&s.root, &staff).unwrap();
    assert!(matches!(
        s.registry.create_store(&staff, "x").unwrap_err(),
        EngineError::Denied { .. }
    ));
}

#[test]
fn concurrent_whitelist_adds_lose_no_updates() {
    let dir = TempDir::new().unwrap();
    let root = caller("1");
    let registry = Arc::new(Registry::new(
        FileStore::new(dir.path().join("data.json")),
        root.clone(),
        Arc::new(AllowValidator),
    ));

    registry.create_store(&root, "s").unwrap();
    registry.create_product(&root, "s", "p").unwrap();

    let threads: Vec<_> = (0..8u64)
        .map(|i| {
            let registry = Arc::clone(&registry);
            let root = root.clone();
            thread::spawn(move || {
                let rt = tokio::runtime::Runtime::new().unwrap();
                rt.block_on(registry.whitelist_add(&root, "s", "p", ExternalId::new(i)))
                    .unwrap();
            })
        })
        .collect();
    for handle in threads {
        handle.join().unwrap();
    }

    let whitelist = registry.list_whitelist(&root, "s", "p").unwrap().value;
    let expected: Vec<_> = (0..8u64).map(ExternalId::new).collect();
    assert_eq!(whitelist, expected);
}

#[test]
fn duplicate_and_missing_targets_report_structured_errors() {
    let s = setup();
    s.registry.create_store(&s.root, "s").unwrap();

    assert!(matches!(
        s.registry.create_store(&s.root, "s").unwrap_err(),
        EngineError::Op(OpError::DuplicateName(_))
    ));
    assert!(matches!(
        s.registry.delete_store(&s.root, "ghost").unwrap_err(),
        EngineError::Op(OpError::NotFound(_))
    ));
    assert!(matches!(
        s.registry
            .create_product(&s.root, "ghost", "p")
            .unwrap_err(),
        EngineError::Op(OpError::NotFound(_))
    ));
    assert!(matches!(
        s.registry.remove_owner(&s.root, "s").unwrap_err(),
        EngineError::Op(OpError::NotOwned(_))
    ));
    assert!(matches!(
        s.registry
            .whitelist_remove(&s.root, "s", "p", ExternalId::new(1))
            .unwrap_err(),
        EngineError::Op(OpError::NotFound(_))
    ));
}
