//! Behaviour every store backend must share.
//!
//! The same checks run against the in-memory and the JSON file backend:
//! company scoping, full-collection replacement and ordered round trips.

use serde_json::json;
use strata_domain::{CompanyId, Perspective, PerspectiveId};
use strata_store::{EntityKind, EntityStore, EntityStoreExt, JsonFileStore, MemoryStore};
use tempfile::TempDir;

fn perspectives() -> Vec<Perspective> {
    vec![
        Perspective::new(PerspectiveId::new("fin"), "Financial", CompanyId::new("a")),
        Perspective::new(PerspectiveId::new("cus"), "Customer", CompanyId::new("b")),
        Perspective::new(PerspectiveId::new("int"), "Internal Processes", CompanyId::new("a")),
    ]
}

fn check_contract(store: &dyn EntityStore) {
    store.save(&perspectives()).unwrap();

    let all: Vec<Perspective> = store.load(None).unwrap();
    assert_eq!(all, perspectives());

    let a: Vec<Perspective> = store.load(Some(&CompanyId::new("a"))).unwrap();
    let ids: Vec<_> = a.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["fin", "int"]);

    // Replacement is wholesale, not a merge
    store
        .write_all(
            EntityKind::Perspectives,
            vec![json!({"id": "lrn", "description": "Learning", "companyId": "b"})],
        )
        .unwrap();
    let after: Vec<Perspective> = store.load(None).unwrap();
    assert_eq!(after.len(), 1);
    assert_eq!(after[0].id, PerspectiveId::new("lrn"));

    // Other collections are untouched
    assert!(store.read_all(EntityKind::Goals, None).unwrap().is_empty());
}

#[test]
fn memory_store_contract() {
    check_contract(&MemoryStore::new());
}

#[test]
fn json_file_store_contract() {
    let dir = TempDir::new().unwrap();
    check_contract(&JsonFileStore::open(dir.path()).unwrap());
}
