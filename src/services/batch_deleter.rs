use std::sync::Arc;

use crate::{
    domain::{
        errors::{StorageError, StorageResult},
        models::{ItemFailure, ObjectVersionRef},
        value_objects::BucketName,
    },
    ports::{storage::VersionStoreClient, MAX_DELETE_BATCH},
};

/// Outcome of one batched delete call
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Targets absent from the failure list, counted as deleted
    pub deleted: u64,
    pub failures: Vec<ItemFailure>,
    /// The whole call hit a missing bucket; nothing was deleted and nothing
    /// remains to delete
    pub bucket_vanished: bool,
}

/// Issues one quiet-mode batched delete per page of targets.
///
/// Callers are responsible for chunking; a page from the version lister is
/// already within the server's batch limit.
pub struct BatchDeleter {
    store: Arc<dyn VersionStoreClient>,
}

impl BatchDeleter {
    pub fn new(store: Arc<dyn VersionStoreClient>) -> Self {
        Self { store }
    }

    pub async fn delete_batch(
        &self,
        bucket: &BucketName,
        targets: &[ObjectVersionRef],
        bypass_governance: bool,
    ) -> StorageResult<BatchOutcome> {
        if targets.is_empty() {
            return Err(StorageError::EmptyBatch);
        }
        if targets.len() > MAX_DELETE_BATCH {
            return Err(StorageError::BatchTooLarge {
                actual: targets.len(),
                max: MAX_DELETE_BATCH,
            });
        }

        match self
            .store
            .delete_objects(bucket, targets, bypass_governance)
            .await
        {
            Ok(failures) => Ok(BatchOutcome {
                deleted: (targets.len() - failures.len()) as u64,
                failures,
                bucket_vanished: false,
            }),
            // Emptying a bucket that no longer exists is a no-op success
            Err(StorageError::BucketNotFound { .. }) => Ok(BatchOutcome {
                bucket_vanished: true,
                ..BatchOutcome::default()
            }),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::storage::InMemoryVersionStore;
    use crate::domain::models::ObjectVersionRef;
    use crate::domain::value_objects::{ObjectKey, VersionId};
    use bytes::Bytes;

    fn bucket() -> BucketName {
        BucketName::new("test-bucket".to_string()).unwrap()
    }

    fn key(name: &str) -> ObjectKey {
        ObjectKey::new(name.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_empty_batch_is_rejected_without_a_call() {
        let store = Arc::new(InMemoryVersionStore::new());
        store.create_bucket(&bucket()).await;
        let deleter = BatchDeleter::new(store.clone());

        match deleter.delete_batch(&bucket(), &[], false).await {
            Err(StorageError::EmptyBatch) => {}
            other => panic!("expected EmptyBatch, got {:?}", other),
        }
        assert_eq!(store.stats().await.batch_delete_calls, 0);
    }

    #[tokio::test]
    async fn test_oversized_batch_is_rejected() {
        let store = Arc::new(InMemoryVersionStore::new());
        let deleter = BatchDeleter::new(store);

        let targets: Vec<ObjectVersionRef> = (0..=MAX_DELETE_BATCH)
            .map(|i| {
                ObjectVersionRef::new(
                    key(&format!("k{}", i)),
                    VersionId::new(format!("v{}", i)).unwrap(),
                )
            })
            .collect();

        match deleter.delete_batch(&bucket(), &targets, false).await {
            Err(StorageError::BatchTooLarge { actual, max }) => {
                assert_eq!(actual, MAX_DELETE_BATCH + 1);
                assert_eq!(max, MAX_DELETE_BATCH);
            }
            other => panic!("expected BatchTooLarge, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_no_failures_counts_every_target_deleted() {
        let store = Arc::new(InMemoryVersionStore::new());
        store.create_bucket(&bucket()).await;
        let mut targets = Vec::new();
        for name in ["a.txt", "b.txt", "c.txt"] {
            let id = store
                .put_version(&bucket(), &key(name), Bytes::from_static(b"x"))
                .await
                .unwrap();
            targets.push(ObjectVersionRef::new(key(name), id));
        }

        let deleter = BatchDeleter::new(store.clone());
        let outcome = deleter.delete_batch(&bucket(), &targets, false).await.unwrap();

        assert_eq!(outcome.deleted, 3);
        assert!(outcome.failures.is_empty());
        assert!(!outcome.bucket_vanished);
        assert_eq!(store.entry_count(&bucket()).await, 0);
    }

    #[tokio::test]
    async fn test_missing_bucket_is_a_noop_success() {
        let store = Arc::new(InMemoryVersionStore::new());
        let deleter = BatchDeleter::new(store);

        let targets = vec![ObjectVersionRef::new(
            key("a.txt"),
            VersionId::new("v1".to_string()).unwrap(),
        )];
        let outcome = deleter.delete_batch(&bucket(), &targets, false).await.unwrap();

        assert_eq!(outcome.deleted, 0);
        assert!(outcome.failures.is_empty());
        assert!(outcome.bucket_vanished);
    }

    #[tokio::test]
    async fn test_protected_targets_come_back_as_failures() {
        let store = Arc::new(InMemoryVersionStore::new());
        store.create_bucket(&bucket()).await;
        let id = store
            .put_version(&bucket(), &key("held.txt"), Bytes::from_static(b"x"))
            .await
            .unwrap();
        let target = ObjectVersionRef::new(key("held.txt"), id);
        store.set_legal_hold(&bucket(), &target, true).await.unwrap();

        let deleter = BatchDeleter::new(store.clone());
        let outcome = deleter
            .delete_batch(&bucket(), std::slice::from_ref(&target), false)
            .await
            .unwrap();

        assert_eq!(outcome.deleted, 0);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].code, "AccessDenied");
        assert_eq!(store.entry_count(&bucket()).await, 1);
    }
}
