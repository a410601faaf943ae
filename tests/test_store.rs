use bytes::Bytes;
use depot::resources::{DynamicStore, Lookup, PutOutcome, SharedStore, StoreError};

fn store(capacity: usize) -> DynamicStore {
    DynamicStore::new(capacity, 64)
}

#[test]
fn test_new_store_is_empty() {
    let store = store(3);

    assert_eq!(store.capacity(), 3);
    assert_eq!(store.len(), 0);
    assert!(store.is_empty());
    assert_eq!(
        store.lookup("/dynamic/a"),
        Lookup {
            existing: None,
            first_free: Some(0)
        }
    );
}

#[test]
fn test_create_then_read() {
    let mut store = store(3);

    let index = store.create("/dynamic/a", Bytes::from_static(b"alpha")).unwrap();
    assert_eq!(store.read(index).unwrap(), Bytes::from_static(b"alpha"));

    let slot = store.slot(index).unwrap();
    assert!(slot.in_use());
    assert_eq!(slot.path(), "/dynamic/a");
    assert_eq!(slot.content_length(), 5);
}

#[test]
fn test_lookup_reports_existing_and_first_free() {
    let mut store = store(4);
    store.create("/dynamic/a", Bytes::from_static(b"1")).unwrap();
    store.create("/dynamic/b", Bytes::from_static(b"2")).unwrap();
    store.delete(0).unwrap();

    let lookup = store.lookup("/dynamic/b");
    assert_eq!(lookup.existing, Some(1));
    assert_eq!(lookup.first_free, Some(0));

    let lookup = store.lookup("/dynamic/zzz");
    assert_eq!(lookup.existing, None);
    assert_eq!(lookup.first_free, Some(0));
}

#[test]
fn test_create_existing_path_fails() {
    let mut store = store(3);
    store.create("/dynamic/a", Bytes::from_static(b"1")).unwrap();

    assert_eq!(
        store.create("/dynamic/a", Bytes::from_static(b"2")),
        Err(StoreError::AlreadyExists("/dynamic/a".to_string()))
    );
    assert_eq!(store.len(), 1);
}

#[test]
fn test_update_overwrites_content() {
    let mut store = store(3);
    let index = store.create("/dynamic/a", Bytes::from_static(b"a much longer value")).unwrap();

    store.update(index, Bytes::from_static(b"short")).unwrap();

    assert_eq!(store.read(index).unwrap(), Bytes::from_static(b"short"));
    assert_eq!(store.slot(index).unwrap().path(), "/dynamic/a");
}

#[test]
fn test_update_free_slot_fails() {
    let mut store = store(3);
    assert_eq!(
        store.update(1, Bytes::from_static(b"x")),
        Err(StoreError::NotInUse(1))
    );
}

#[test]
fn test_delete_clears_slot() {
    let mut store = store(3);
    let index = store.create("/dynamic/a", Bytes::from_static(b"1")).unwrap();

    store.delete(index).unwrap();

    let slot = store.slot(index).unwrap();
    assert!(!slot.in_use());
    assert_eq!(slot.content_length(), 0);
    assert_eq!(store.read(index), Err(StoreError::NotInUse(index)));
    assert_eq!(store.delete(index), Err(StoreError::NotInUse(index)));
}

#[test]
fn test_out_of_range_index() {
    let mut store = store(2);
    assert_eq!(
        store.delete(5),
        Err(StoreError::OutOfRange {
            index: 5,
            capacity: 2
        })
    );
    assert!(store.read(2).is_err());
}

#[test]
fn test_capacity_exceeded_keeps_existing_resources() {
    let mut store = store(3);
    for i in 0..3 {
        store.create(&format!("/dynamic/{i}"), Bytes::from(format!("v{i}"))).unwrap();
    }

    assert_eq!(
        store.create("/dynamic/extra", Bytes::from_static(b"x")),
        Err(StoreError::CapacityExceeded { capacity: 3 })
    );

    for i in 0..3 {
        assert_eq!(store.get(&format!("/dynamic/{i}")), Some(Bytes::from(format!("v{i}"))));
    }
    assert_eq!(store.get("/dynamic/extra"), None);
}

#[test]
fn test_deleted_slot_is_reused_by_any_path() {
    let mut store = store(2);
    store.create("/dynamic/a", Bytes::from_static(b"1")).unwrap();
    store.create("/dynamic/b", Bytes::from_static(b"2")).unwrap();

    assert!(store.remove("/dynamic/a"));
    let index = store.create("/dynamic/c", Bytes::from_static(b"3")).unwrap();

    assert_eq!(index, 0);
    assert_eq!(store.get("/dynamic/c"), Some(Bytes::from_static(b"3")));
    assert_eq!(store.get("/dynamic/a"), None);
}

#[test]
fn test_put_creates_then_updates() {
    let mut store = store(2);

    assert_eq!(
        store.put("/dynamic/a", Bytes::from_static(b"1")),
        Ok(PutOutcome::Created(0))
    );
    assert_eq!(
        store.put("/dynamic/a", Bytes::from_static(b"2")),
        Ok(PutOutcome::Updated(0))
    );
    assert_eq!(store.len(), 1);
    assert_eq!(store.get("/dynamic/a"), Some(Bytes::from_static(b"2")));
}

#[test]
fn test_update_succeeds_when_store_is_full() {
    let mut store = store(1);
    store.put("/dynamic/a", Bytes::from_static(b"1")).unwrap();

    assert_eq!(
        store.put("/dynamic/a", Bytes::from_static(b"2")),
        Ok(PutOutcome::Updated(0))
    );
}

#[test]
fn test_paths_match_exactly() {
    let mut store = store(3);
    store.put("/dynamic/a", Bytes::from_static(b"1")).unwrap();

    assert_eq!(store.get("/dynamic/A"), None);
    assert_eq!(store.get("/dynamic/a/"), None);
    assert_eq!(store.get("/dynamic/"), None);
}

#[test]
fn test_limits_on_path_and_content() {
    let mut store = store(3);

    let long_path = format!("/dynamic/{}", "p".repeat(300));
    assert!(matches!(
        store.create(&long_path, Bytes::new()),
        Err(StoreError::PathTooLong { .. })
    ));

    assert_eq!(
        store.put("/dynamic/big", Bytes::from(vec![0u8; 65])),
        Err(StoreError::ContentTooLarge { len: 65, max: 64 })
    );
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_shared_store_roundtrip() {
    let shared = SharedStore::new(store(2));

    assert_eq!(
        shared.put("/dynamic/a", Bytes::from_static(b"x")).await,
        Ok(PutOutcome::Created(0))
    );
    assert_eq!(shared.get("/dynamic/a").await, Some(Bytes::from_static(b"x")));
    assert!(shared.remove("/dynamic/a").await);
    assert!(!shared.remove("/dynamic/a").await);
    assert_eq!(shared.len().await, 0);
    assert_eq!(shared.capacity().await, 2);
}

#[tokio::test]
async fn test_concurrent_puts_never_duplicate_a_path() {
    let shared = SharedStore::new(DynamicStore::new(8, 64));

    let mut handles = Vec::new();
    for i in 0..32 {
        let shared = shared.clone();
        handles.push(tokio::spawn(async move {
            let path = format!("/dynamic/{}", i % 4);
            shared.put(&path, Bytes::from(format!("{i}"))).await
        }));
    }

    let mut created = 0;
    for handle in handles {
        if let Ok(PutOutcome::Created(_)) = handle.await.unwrap() {
            created += 1;
        }
    }

    assert_eq!(created, 4);
    assert_eq!(shared.len().await, 4);
}
