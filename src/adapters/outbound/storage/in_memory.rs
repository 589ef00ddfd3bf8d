use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    domain::{
        errors::{StorageError, StorageResult},
        models::{
            DeleteMarkerEntry, ItemFailure, LegalHoldStatus, ObjectVersionRef, RetentionMode,
            VersionEntry, VersionPage, VersioningState, ACCESS_DENIED_CODE,
        },
        value_objects::{BucketName, ObjectKey, VersionId},
    },
    ports::storage::{ListVersionsRequest, VersionStoreClient},
};

/// In-memory implementation of VersionStoreClient for testing and development.
///
/// Models the listing, batch delete, object lock, and policy endpoints of a
/// versioning-enabled store, including governance/compliance retention and
/// per-version legal holds. Also records per-call statistics so tests can
/// assert on the exact calls an orchestration issued.
#[derive(Clone)]
pub struct InMemoryVersionStore {
    state: Arc<RwLock<StoreState>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Version,
    DeleteMarker,
}

#[derive(Clone)]
struct StoredEntry {
    key: String,
    version_id: String,
    kind: EntryKind,
    seq: u64,
    last_modified: DateTime<Utc>,
    size: u64,
    etag: Option<String>,
    legal_hold: bool,
    retention: Option<RetentionMode>,
}

#[derive(Default)]
struct BucketState {
    entries: Vec<StoredEntry>,
    // Creation order of every entry ever stored, keyed by (key, version id).
    // Survives deletion so a continuation marker keeps its position even
    // after the entry it names is gone.
    seq_index: HashMap<(String, String), u64>,
    policy: Option<String>,
    // Pre-mutation policy value still served while stale_reads_left > 0
    stale_policy: Option<String>,
    stale_reads_left: u32,
    versioning: VersioningState,
}

/// Counters for the calls a store instance has served
#[derive(Debug, Clone, Default)]
pub struct CallStats {
    pub list_calls: u32,
    pub batch_delete_calls: u32,
    pub single_delete_calls: u32,
    pub legal_hold_gets: u32,
    pub legal_hold_puts: u32,
    pub policy_gets: u32,
    /// Per batch call: how many targets matched stored versions vs markers
    pub batch_target_kinds: Vec<(usize, usize)>,
}

#[derive(Default)]
struct StoreState {
    buckets: HashMap<String, BucketState>,
    stats: CallStats,
    next_seq: u64,
    policy_read_lag: u32,
}

impl StoreState {
    fn bucket(&self, name: &BucketName) -> StorageResult<&BucketState> {
        self.buckets
            .get(name.as_str())
            .ok_or_else(|| StorageError::BucketNotFound {
                bucket: name.as_str().to_string(),
            })
    }

    fn bucket_mut(&mut self, name: &BucketName) -> StorageResult<&mut BucketState> {
        self.buckets
            .get_mut(name.as_str())
            .ok_or_else(|| StorageError::BucketNotFound {
                bucket: name.as_str().to_string(),
            })
    }
}

impl StoredEntry {
    fn is_protected(&self, bypass_governance: bool) -> bool {
        if self.legal_hold {
            return true;
        }
        match self.retention {
            Some(RetentionMode::Compliance) => true,
            Some(RetentionMode::Governance) => !bypass_governance,
            None => false,
        }
    }

    fn target(&self) -> StorageResult<ObjectVersionRef> {
        let key = ObjectKey::new(self.key.clone()).map_err(|e| StorageError::InternalError {
            message: format!("Stored entry has invalid key: {}", e),
        })?;
        let version_id =
            VersionId::new(self.version_id.clone()).map_err(|e| StorageError::InternalError {
                message: format!("Stored entry has invalid version id: {}", e),
            })?;
        Ok(ObjectVersionRef::new(key, version_id))
    }

    fn matches(&self, target: &ObjectVersionRef) -> bool {
        self.key == target.key.as_str() && self.version_id == target.version_id.as_str()
    }
}

impl InMemoryVersionStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreState::default())),
        }
    }

    pub async fn create_bucket(&self, bucket: &BucketName) {
        let mut state = self.state.write().await;
        state
            .buckets
            .entry(bucket.as_str().to_string())
            .or_insert_with(|| BucketState {
                versioning: VersioningState::Enabled,
                ..BucketState::default()
            });
    }

    /// Store a new object version and return its generated id
    pub async fn put_version(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        data: Bytes,
    ) -> StorageResult<VersionId> {
        let mut state = self.state.write().await;
        state.next_seq += 1;
        let seq = state.next_seq;
        let version_id = Uuid::new_v4().to_string();
        let etag = format!("\"{:x}\"", md5::compute(&data));

        let entry = StoredEntry {
            key: key.as_str().to_string(),
            version_id: version_id.clone(),
            kind: EntryKind::Version,
            seq,
            last_modified: Utc::now(),
            size: data.len() as u64,
            etag: Some(etag),
            legal_hold: false,
            retention: None,
        };
        let bucket_state = state.bucket_mut(bucket)?;
        bucket_state
            .seq_index
            .insert((key.as_str().to_string(), version_id.clone()), seq);
        bucket_state.entries.push(entry);

        VersionId::new(version_id).map_err(|e| StorageError::InternalError {
            message: format!("Generated invalid version id: {}", e),
        })
    }

    /// Store a delete marker for a key and return its generated id
    pub async fn put_delete_marker(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
    ) -> StorageResult<VersionId> {
        let mut state = self.state.write().await;
        state.next_seq += 1;
        let seq = state.next_seq;
        let version_id = Uuid::new_v4().to_string();

        let entry = StoredEntry {
            key: key.as_str().to_string(),
            version_id: version_id.clone(),
            kind: EntryKind::DeleteMarker,
            seq,
            last_modified: Utc::now(),
            size: 0,
            etag: None,
            legal_hold: false,
            retention: None,
        };
        let bucket_state = state.bucket_mut(bucket)?;
        bucket_state
            .seq_index
            .insert((key.as_str().to_string(), version_id.clone()), seq);
        bucket_state.entries.push(entry);

        VersionId::new(version_id).map_err(|e| StorageError::InternalError {
            message: format!("Generated invalid version id: {}", e),
        })
    }

    /// Test seam: flip the legal hold flag without touching call statistics
    pub async fn set_legal_hold(
        &self,
        bucket: &BucketName,
        target: &ObjectVersionRef,
        held: bool,
    ) -> StorageResult<()> {
        let mut state = self.state.write().await;
        let bucket_state = state.bucket_mut(bucket)?;
        match bucket_state.entries.iter_mut().find(|e| e.matches(target)) {
            Some(entry) => {
                entry.legal_hold = held;
                Ok(())
            }
            None => Err(StorageError::VersionNotFound {
                key: target.key.clone(),
                version_id: target.version_id.clone(),
            }),
        }
    }

    /// Test seam: set or clear retention on a stored version
    pub async fn set_retention(
        &self,
        bucket: &BucketName,
        target: &ObjectVersionRef,
        retention: Option<RetentionMode>,
    ) -> StorageResult<()> {
        let mut state = self.state.write().await;
        let bucket_state = state.bucket_mut(bucket)?;
        match bucket_state.entries.iter_mut().find(|e| e.matches(target)) {
            Some(entry) => {
                entry.retention = retention;
                Ok(())
            }
            None => Err(StorageError::VersionNotFound {
                key: target.key.clone(),
                version_id: target.version_id.clone(),
            }),
        }
    }

    /// Total entries (versions plus markers) remaining in a bucket
    pub async fn entry_count(&self, bucket: &BucketName) -> usize {
        let state = self.state.read().await;
        state
            .buckets
            .get(bucket.as_str())
            .map(|b| b.entries.len())
            .unwrap_or(0)
    }

    pub async fn stats(&self) -> CallStats {
        self.state.read().await.stats.clone()
    }

    /// Serve the pre-mutation policy value for the next `reads` reads after
    /// each policy write, simulating eventual consistency
    pub async fn lag_policy_reads(&self, reads: u32) {
        self.state.write().await.policy_read_lag = reads;
    }

    // Listing order matches the store API: keys ascending, newest entry
    // first within a key.
    fn sorted_entries(bucket: &BucketState, prefix: Option<&str>) -> Vec<StoredEntry> {
        let mut entries: Vec<StoredEntry> = bucket
            .entries
            .iter()
            .filter(|e| prefix.map_or(true, |p| e.key.starts_with(p)))
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key).then(b.seq.cmp(&a.seq)));
        entries
    }

    // Resolves the continuation markers to an index strictly after the
    // marker position, whether or not the marked entry still exists.
    fn page_start(
        entries: &[StoredEntry],
        key_marker: Option<&str>,
        version_id_marker: Option<&str>,
        seq_index: &HashMap<(String, String), u64>,
    ) -> usize {
        match (key_marker, version_id_marker) {
            (None, _) => 0,
            (Some(km), Some(vm)) => {
                match seq_index.get(&(km.to_string(), vm.to_string())) {
                    Some(&marker_seq) => entries
                        .iter()
                        .filter(|e| {
                            e.key.as_str() < km || (e.key == km && e.seq >= marker_seq)
                        })
                        .count(),
                    None => entries.iter().filter(|e| e.key.as_str() <= km).count(),
                }
            }
            (Some(km), None) => entries.iter().filter(|e| e.key.as_str() <= km).count(),
        }
    }
}

impl Default for InMemoryVersionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VersionStoreClient for InMemoryVersionStore {
    async fn list_object_versions(
        &self,
        request: &ListVersionsRequest,
    ) -> StorageResult<VersionPage> {
        let mut state = self.state.write().await;
        state.stats.list_calls += 1;

        let bucket = state.bucket(&request.bucket)?;
        let entries = Self::sorted_entries(bucket, request.prefix.as_deref());
        let start = Self::page_start(
            &entries,
            request.key_marker.as_deref(),
            request.version_id_marker.as_deref(),
            &bucket.seq_index,
        );

        let max = request.max_keys as usize;
        let end = (start + max).min(entries.len());
        let slice = &entries[start.min(entries.len())..end];
        let is_truncated = end < entries.len();

        let mut page = VersionPage {
            is_truncated,
            ..VersionPage::default()
        };
        if is_truncated {
            if let Some(last) = slice.last() {
                page.next_key_marker = Some(last.key.clone());
                page.next_version_id_marker = Some(last.version_id.clone());
            }
        }

        for entry in slice {
            let target = entry.target()?;
            match entry.kind {
                EntryKind::Version => page.versions.push(VersionEntry {
                    target,
                    is_latest: false,
                    last_modified: Some(entry.last_modified),
                    size: Some(entry.size),
                    etag: entry.etag.clone(),
                }),
                EntryKind::DeleteMarker => page.delete_markers.push(DeleteMarkerEntry {
                    target,
                    is_latest: false,
                    last_modified: Some(entry.last_modified),
                }),
            }
        }

        Ok(page)
    }

    async fn delete_objects(
        &self,
        bucket: &BucketName,
        targets: &[ObjectVersionRef],
        bypass_governance: bool,
    ) -> StorageResult<Vec<ItemFailure>> {
        let mut state = self.state.write().await;
        state.stats.batch_delete_calls += 1;

        // Probe bucket existence before mutating anything
        state.bucket(bucket)?;

        let mut failures = Vec::new();
        let mut matched_versions = 0;
        let mut matched_markers = 0;

        for target in targets {
            let bucket_state = state.bucket_mut(bucket)?;
            if let Some(pos) = bucket_state.entries.iter().position(|e| e.matches(target)) {
                match bucket_state.entries[pos].kind {
                    EntryKind::Version => matched_versions += 1,
                    EntryKind::DeleteMarker => matched_markers += 1,
                }
                if bucket_state.entries[pos].is_protected(bypass_governance) {
                    failures.push(ItemFailure {
                        target: target.clone(),
                        code: ACCESS_DENIED_CODE.to_string(),
                        message: "Access Denied because object protected by object lock"
                            .to_string(),
                    });
                } else {
                    bucket_state.entries.remove(pos);
                }
            }
            // Absent targets delete as a no-op, matching the real API
        }

        state
            .stats
            .batch_target_kinds
            .push((matched_versions, matched_markers));
        Ok(failures)
    }

    async fn delete_object(
        &self,
        bucket: &BucketName,
        target: &ObjectVersionRef,
        bypass_governance: bool,
    ) -> StorageResult<()> {
        let mut state = self.state.write().await;
        state.stats.single_delete_calls += 1;

        let bucket_state = state.bucket_mut(bucket)?;
        if let Some(pos) = bucket_state.entries.iter().position(|e| e.matches(target)) {
            if bucket_state.entries[pos].is_protected(bypass_governance) {
                return Err(StorageError::AccessDenied {
                    message: "Access Denied because object protected by object lock".to_string(),
                });
            }
            bucket_state.entries.remove(pos);
        }
        Ok(())
    }

    async fn get_object_legal_hold(
        &self,
        bucket: &BucketName,
        target: &ObjectVersionRef,
    ) -> StorageResult<LegalHoldStatus> {
        let mut state = self.state.write().await;
        state.stats.legal_hold_gets += 1;

        let bucket_state = state.bucket(bucket)?;
        match bucket_state.entries.iter().find(|e| e.matches(target)) {
            Some(entry) if entry.legal_hold => Ok(LegalHoldStatus::On),
            Some(_) => Ok(LegalHoldStatus::Off),
            None => Err(StorageError::VersionNotFound {
                key: target.key.clone(),
                version_id: target.version_id.clone(),
            }),
        }
    }

    async fn put_object_legal_hold(
        &self,
        bucket: &BucketName,
        target: &ObjectVersionRef,
        status: LegalHoldStatus,
    ) -> StorageResult<()> {
        let mut state = self.state.write().await;
        state.stats.legal_hold_puts += 1;

        let bucket_state = state.bucket_mut(bucket)?;
        match bucket_state.entries.iter_mut().find(|e| e.matches(target)) {
            Some(entry) => {
                entry.legal_hold = status == LegalHoldStatus::On;
                Ok(())
            }
            None => Err(StorageError::VersionNotFound {
                key: target.key.clone(),
                version_id: target.version_id.clone(),
            }),
        }
    }

    async fn get_bucket_policy(&self, bucket: &BucketName) -> StorageResult<Option<String>> {
        let mut state = self.state.write().await;
        state.stats.policy_gets += 1;

        let bucket_state = state.bucket_mut(bucket)?;
        if bucket_state.stale_reads_left > 0 {
            bucket_state.stale_reads_left -= 1;
            return Ok(bucket_state.stale_policy.clone());
        }
        Ok(bucket_state.policy.clone())
    }

    async fn put_bucket_policy(&self, bucket: &BucketName, document: &str) -> StorageResult<()> {
        let mut state = self.state.write().await;
        let lag = state.policy_read_lag;
        let bucket_state = state.bucket_mut(bucket)?;
        let previous = bucket_state.policy.take();
        bucket_state.policy = Some(document.to_string());
        if lag > 0 {
            bucket_state.stale_policy = previous;
            bucket_state.stale_reads_left = lag;
        }
        Ok(())
    }

    async fn delete_bucket_policy(&self, bucket: &BucketName) -> StorageResult<()> {
        let mut state = self.state.write().await;
        let lag = state.policy_read_lag;
        let bucket_state = state.bucket_mut(bucket)?;
        let previous = bucket_state.policy.take();
        if lag > 0 {
            bucket_state.stale_policy = previous;
            bucket_state.stale_reads_left = lag;
        }
        Ok(())
    }

    async fn get_bucket_versioning(&self, bucket: &BucketName) -> StorageResult<VersioningState> {
        let state = self.state.read().await;
        Ok(state.bucket(bucket)?.versioning)
    }

    async fn put_bucket_versioning(
        &self,
        bucket: &BucketName,
        versioning: VersioningState,
    ) -> StorageResult<()> {
        let mut state = self.state.write().await;
        state.bucket_mut(bucket)?.versioning = versioning;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket() -> BucketName {
        BucketName::new("test-bucket".to_string()).unwrap()
    }

    fn key(name: &str) -> ObjectKey {
        ObjectKey::new(name.to_string()).unwrap()
    }

    async fn seeded_store() -> (InMemoryVersionStore, Vec<VersionId>) {
        let store = InMemoryVersionStore::new();
        store.create_bucket(&bucket()).await;
        let mut ids = Vec::new();
        for name in ["a.txt", "a.txt", "b.txt"] {
            let id = store
                .put_version(&bucket(), &key(name), Bytes::from_static(b"data"))
                .await
                .unwrap();
            ids.push(id);
        }
        (store, ids)
    }

    #[tokio::test]
    async fn test_list_paginates_with_markers() {
        let (store, _) = seeded_store().await;

        let first = store
            .list_object_versions(&ListVersionsRequest {
                bucket: bucket(),
                prefix: None,
                key_marker: None,
                version_id_marker: None,
                max_keys: 2,
            })
            .await
            .unwrap();
        assert_eq!(first.len(), 2);
        assert!(first.is_truncated);
        assert!(first.next_key_marker.is_some());

        let second = store
            .list_object_versions(&ListVersionsRequest {
                bucket: bucket(),
                prefix: None,
                key_marker: first.next_key_marker.clone(),
                version_id_marker: first.next_version_id_marker.clone(),
                max_keys: 2,
            })
            .await
            .unwrap();
        assert_eq!(second.len(), 1);
        assert!(!second.is_truncated);
    }

    #[tokio::test]
    async fn test_governance_retention_requires_bypass() {
        let (store, ids) = seeded_store().await;
        let target = ObjectVersionRef::new(key("a.txt"), ids[0].clone());
        store
            .set_retention(&bucket(), &target, Some(RetentionMode::Governance))
            .await
            .unwrap();

        let failures = store
            .delete_objects(&bucket(), std::slice::from_ref(&target), false)
            .await
            .unwrap();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].code, ACCESS_DENIED_CODE);

        let failures = store
            .delete_objects(&bucket(), std::slice::from_ref(&target), true)
            .await
            .unwrap();
        assert!(failures.is_empty());
    }

    #[tokio::test]
    async fn test_compliance_retention_ignores_bypass() {
        let (store, ids) = seeded_store().await;
        let target = ObjectVersionRef::new(key("a.txt"), ids[0].clone());
        store
            .set_retention(&bucket(), &target, Some(RetentionMode::Compliance))
            .await
            .unwrap();

        let failures = store
            .delete_objects(&bucket(), std::slice::from_ref(&target), true)
            .await
            .unwrap();
        assert_eq!(failures.len(), 1);
    }

    #[tokio::test]
    async fn test_versioning_round_trip() {
        let store = InMemoryVersionStore::new();
        store.create_bucket(&bucket()).await;
        assert_eq!(
            store.get_bucket_versioning(&bucket()).await.unwrap(),
            VersioningState::Enabled
        );

        store
            .put_bucket_versioning(&bucket(), VersioningState::Suspended)
            .await
            .unwrap();
        assert_eq!(
            store.get_bucket_versioning(&bucket()).await.unwrap(),
            VersioningState::Suspended
        );
    }

    #[tokio::test]
    async fn test_policy_read_lag() {
        let store = InMemoryVersionStore::new();
        store.create_bucket(&bucket()).await;
        store.lag_policy_reads(2).await;

        store.put_bucket_policy(&bucket(), "{}").await.unwrap();
        assert_eq!(store.get_bucket_policy(&bucket()).await.unwrap(), None);
        assert_eq!(store.get_bucket_policy(&bucket()).await.unwrap(), None);
        assert_eq!(
            store.get_bucket_policy(&bucket()).await.unwrap(),
            Some("{}".to_string())
        );
    }
}
