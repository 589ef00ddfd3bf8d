use bytes::Bytes;
use std::sync::Arc;

use object_store_manager::{
    BucketMaintenanceService, BucketName, DrainOptions, InMemoryVersionStore,
    MaintenanceServiceImpl, ObjectKey, ObjectVersionRef, StorageError,
};

fn bucket() -> BucketName {
    BucketName::new("single-key-bucket".to_string()).unwrap()
}

fn key(name: &str) -> ObjectKey {
    ObjectKey::new(name.to_string()).unwrap()
}

#[tokio::test]
async fn test_deletes_all_versions_of_exactly_one_key() {
    let store = Arc::new(InMemoryVersionStore::new());
    store.create_bucket(&bucket()).await;
    for _ in 0..2 {
        store
            .put_version(&bucket(), &key("logs"), Bytes::from_static(b"x"))
            .await
            .unwrap();
    }
    store.put_delete_marker(&bucket(), &key("logs")).await.unwrap();
    // A sibling key that shares the prefix and must survive
    store
        .put_version(&bucket(), &key("logs-old"), Bytes::from_static(b"x"))
        .await
        .unwrap();

    let service = MaintenanceServiceImpl::new(store.clone());
    let report = service
        .delete_all_versions(&bucket(), &key("logs"), &DrainOptions::default())
        .await
        .unwrap();

    assert_eq!(report.deleted, 3);
    assert!(report.is_clean());
    assert_eq!(store.entry_count(&bucket()).await, 1);
}

#[tokio::test]
async fn test_single_key_drain_clears_a_hold_under_force() {
    let store = Arc::new(InMemoryVersionStore::new());
    store.create_bucket(&bucket()).await;
    let id = store
        .put_version(&bucket(), &key("held"), Bytes::from_static(b"x"))
        .await
        .unwrap();
    let target = ObjectVersionRef::new(key("held"), id);
    store.set_legal_hold(&bucket(), &target, true).await.unwrap();

    let service = MaintenanceServiceImpl::new(store.clone());
    let report = service
        .delete_all_versions(&bucket(), &key("held"), &DrainOptions::forced())
        .await
        .unwrap();

    assert_eq!(report.deleted, 1);
    assert!(report.is_clean());
    assert_eq!(store.entry_count(&bucket()).await, 0);
}

#[tokio::test]
async fn test_targeted_version_delete_recovers_under_force() {
    let store = Arc::new(InMemoryVersionStore::new());
    store.create_bucket(&bucket()).await;
    let id = store
        .put_version(&bucket(), &key("doc.pdf"), Bytes::from_static(b"x"))
        .await
        .unwrap();
    let target = ObjectVersionRef::new(key("doc.pdf"), id);
    store.set_legal_hold(&bucket(), &target, true).await.unwrap();

    let service = MaintenanceServiceImpl::new(store.clone());
    service
        .delete_version(&bucket(), &target, true)
        .await
        .unwrap();

    assert_eq!(store.entry_count(&bucket()).await, 0);
    let stats = store.stats().await;
    assert_eq!(stats.legal_hold_puts, 1);
    // One denied attempt plus one retry after the hold was cleared
    assert_eq!(stats.single_delete_calls, 2);
}

#[tokio::test]
async fn test_targeted_version_delete_fails_without_force() {
    let store = Arc::new(InMemoryVersionStore::new());
    store.create_bucket(&bucket()).await;
    let id = store
        .put_version(&bucket(), &key("doc.pdf"), Bytes::from_static(b"x"))
        .await
        .unwrap();
    let target = ObjectVersionRef::new(key("doc.pdf"), id);
    store.set_legal_hold(&bucket(), &target, true).await.unwrap();

    let service = MaintenanceServiceImpl::new(store.clone());
    let result = service.delete_version(&bucket(), &target, false).await;

    assert!(matches!(result, Err(StorageError::AccessDenied { .. })));
    assert_eq!(store.entry_count(&bucket()).await, 1);
    assert_eq!(store.stats().await.legal_hold_gets, 0);
}
