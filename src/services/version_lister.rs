use std::sync::Arc;

use crate::{
    domain::{
        errors::{StorageError, StorageResult},
        models::VersionPage,
        value_objects::BucketName,
    },
    ports::storage::{ListVersionsRequest, VersionStoreClient},
};

/// Serial cursor over one version listing.
///
/// Markers are keyset state, not a resumable token: the state is owned by
/// exactly one lister and the page sequence cannot be rewound. A fresh lister
/// is needed for every pass over a bucket.
#[derive(Debug)]
struct PageState {
    key_marker: Option<String>,
    version_id_marker: Option<String>,
    max_keys: u32,
    exhausted: bool,
}

/// Pull-based pagination over the list-object-versions endpoint
pub struct VersionLister {
    store: Arc<dyn VersionStoreClient>,
    bucket: BucketName,
    prefix: Option<String>,
    state: PageState,
}

impl VersionLister {
    pub const DEFAULT_PAGE_SIZE: u32 = 1000;

    pub fn new(
        store: Arc<dyn VersionStoreClient>,
        bucket: BucketName,
        prefix: Option<String>,
        max_keys: u32,
    ) -> Self {
        Self {
            store,
            bucket,
            prefix,
            state: PageState {
                key_marker: None,
                version_id_marker: None,
                max_keys,
                exhausted: false,
            },
        }
    }

    /// Whether another page can be fetched
    pub fn has_more_pages(&self) -> bool {
        !self.state.exhausted
    }

    /// Fetch the next page and advance the cursor.
    ///
    /// Calling this on an exhausted lister is a programming error and fails
    /// without issuing a request.
    pub async fn next_page(&mut self) -> StorageResult<VersionPage> {
        if self.state.exhausted {
            return Err(StorageError::ListerExhausted);
        }

        let request = ListVersionsRequest {
            bucket: self.bucket.clone(),
            prefix: self.prefix.clone(),
            key_marker: self.state.key_marker.clone(),
            version_id_marker: self.state.version_id_marker.clone(),
            max_keys: self.state.max_keys,
        };

        let page = self.store.list_object_versions(&request).await?;

        if page.is_truncated
            && (page.next_key_marker.is_some() || page.next_version_id_marker.is_some())
        {
            self.state.key_marker = page.next_key_marker.clone();
            self.state.version_id_marker = page.next_version_id_marker.clone();
        } else {
            // Either the listing is complete, or a truncated response gave
            // no forward marker and no progress is possible
            self.state.exhausted = true;
        }

        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::storage::InMemoryVersionStore;
    use crate::domain::models::{
        ItemFailure, LegalHoldStatus, ObjectVersionRef, VersioningState,
    };
    use crate::domain::value_objects::ObjectKey;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex;

    fn bucket() -> BucketName {
        BucketName::new("test-bucket".to_string()).unwrap()
    }

    fn key(name: &str) -> ObjectKey {
        ObjectKey::new(name.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_walks_all_pages_then_stops() {
        let store = Arc::new(InMemoryVersionStore::new());
        store.create_bucket(&bucket()).await;
        for name in ["a.txt", "b.txt", "c.txt", "d.txt", "e.txt"] {
            store
                .put_version(&bucket(), &key(name), Bytes::from_static(b"x"))
                .await
                .unwrap();
        }

        // 5 entries at 2 per page: two truncated pages then a final one
        let mut lister = VersionLister::new(store.clone(), bucket(), None, 2);
        let mut pages = 0;
        let mut total = 0;
        while lister.has_more_pages() {
            let page = lister.next_page().await.unwrap();
            pages += 1;
            total += page.len();
        }

        assert_eq!(pages, 3);
        assert_eq!(total, 5);
        assert!(!lister.has_more_pages());
        assert_eq!(store.stats().await.list_calls, 3);
    }

    #[tokio::test]
    async fn test_next_page_after_exhaustion_is_an_error() {
        let store = Arc::new(InMemoryVersionStore::new());
        store.create_bucket(&bucket()).await;

        let mut lister = VersionLister::new(store.clone(), bucket(), None, 10);
        lister.next_page().await.unwrap();
        assert!(!lister.has_more_pages());

        match lister.next_page().await {
            Err(StorageError::ListerExhausted) => {}
            other => panic!("expected ListerExhausted, got {:?}", other),
        }
        // The failed call must not have reached the store
        assert_eq!(store.stats().await.list_calls, 1);
    }

    #[tokio::test]
    async fn test_prefix_scopes_the_listing() {
        let store = Arc::new(InMemoryVersionStore::new());
        store.create_bucket(&bucket()).await;
        store
            .put_version(&bucket(), &key("logs"), Bytes::from_static(b"x"))
            .await
            .unwrap();
        store
            .put_version(&bucket(), &key("logs-old"), Bytes::from_static(b"x"))
            .await
            .unwrap();
        store
            .put_version(&bucket(), &key("data"), Bytes::from_static(b"x"))
            .await
            .unwrap();

        let mut lister =
            VersionLister::new(store, bucket(), Some("logs".to_string()), 10);
        let page = lister.next_page().await.unwrap();

        // Prefix matching is not exact matching; both "logs" keys qualify
        assert_eq!(page.versions.len(), 2);
    }

    // Serves scripted pages to exercise responses the faithful in-memory
    // store cannot produce.
    struct ScriptedStore {
        pages: Mutex<Vec<VersionPage>>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl VersionStoreClient for ScriptedStore {
        async fn list_object_versions(
            &self,
            _request: &ListVersionsRequest,
        ) -> StorageResult<VersionPage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.pages.lock().await.remove(0))
        }

        async fn delete_objects(
            &self,
            _bucket: &BucketName,
            _targets: &[ObjectVersionRef],
            _bypass_governance: bool,
        ) -> StorageResult<Vec<ItemFailure>> {
            unreachable!("not used by lister tests")
        }

        async fn delete_object(
            &self,
            _bucket: &BucketName,
            _target: &ObjectVersionRef,
            _bypass_governance: bool,
        ) -> StorageResult<()> {
            unreachable!("not used by lister tests")
        }

        async fn get_object_legal_hold(
            &self,
            _bucket: &BucketName,
            _target: &ObjectVersionRef,
        ) -> StorageResult<LegalHoldStatus> {
            unreachable!("not used by lister tests")
        }

        async fn put_object_legal_hold(
            &self,
            _bucket: &BucketName,
            _target: &ObjectVersionRef,
            _status: LegalHoldStatus,
        ) -> StorageResult<()> {
            unreachable!("not used by lister tests")
        }

        async fn get_bucket_policy(&self, _bucket: &BucketName) -> StorageResult<Option<String>> {
            unreachable!("not used by lister tests")
        }

        async fn put_bucket_policy(
            &self,
            _bucket: &BucketName,
            _document: &str,
        ) -> StorageResult<()> {
            unreachable!("not used by lister tests")
        }

        async fn delete_bucket_policy(&self, _bucket: &BucketName) -> StorageResult<()> {
            unreachable!("not used by lister tests")
        }

        async fn get_bucket_versioning(
            &self,
            _bucket: &BucketName,
        ) -> StorageResult<VersioningState> {
            unreachable!("not used by lister tests")
        }

        async fn put_bucket_versioning(
            &self,
            _bucket: &BucketName,
            _state: VersioningState,
        ) -> StorageResult<()> {
            unreachable!("not used by lister tests")
        }
    }

    #[tokio::test]
    async fn test_truncated_page_without_markers_exhausts() {
        let store = Arc::new(ScriptedStore {
            pages: Mutex::new(vec![VersionPage {
                is_truncated: true,
                ..VersionPage::default()
            }]),
            calls: AtomicUsize::new(0),
        });

        let mut lister = VersionLister::new(store.clone(), bucket(), None, 10);
        lister.next_page().await.unwrap();

        // No forward marker means no forward progress
        assert!(!lister.has_more_pages());
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }
}
