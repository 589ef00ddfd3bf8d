use crate::domain::{
    errors::StorageResult,
    models::{ItemFailure, LegalHoldStatus, ObjectVersionRef, VersionPage, VersioningState},
    value_objects::BucketName,
};
use async_trait::async_trait;

/// Parameters for one list-object-versions call.
///
/// Markers are omitted on the first page; subsequent pages carry the
/// server-supplied continuation markers from the previous response.
#[derive(Debug, Clone)]
pub struct ListVersionsRequest {
    pub bucket: BucketName,
    pub prefix: Option<String>,
    pub key_marker: Option<String>,
    pub version_id_marker: Option<String>,
    pub max_keys: u32,
}

/// Port for the versioned object store API.
/// This abstracts the actual store backend (S3, MinIO, in-memory fake).
///
/// Request signing is a concern of the implementing adapter; callers never
/// construct or inspect credentials.
#[async_trait]
pub trait VersionStoreClient: Send + Sync + 'static {
    /// Fetch one page of object versions and delete markers
    async fn list_object_versions(
        &self,
        request: &ListVersionsRequest,
    ) -> StorageResult<VersionPage>;

    /// Issue one quiet-mode batched delete.
    ///
    /// Returns only the per-item failures; every target absent from the
    /// returned list was deleted. `bypass_governance` forwards the
    /// governance-retention bypass flag on the whole request.
    async fn delete_objects(
        &self,
        bucket: &BucketName,
        targets: &[ObjectVersionRef],
        bypass_governance: bool,
    ) -> StorageResult<Vec<ItemFailure>>;

    /// Delete a single object version
    async fn delete_object(
        &self,
        bucket: &BucketName,
        target: &ObjectVersionRef,
        bypass_governance: bool,
    ) -> StorageResult<()>;

    /// Read the legal hold status for one object version
    async fn get_object_legal_hold(
        &self,
        bucket: &BucketName,
        target: &ObjectVersionRef,
    ) -> StorageResult<LegalHoldStatus>;

    /// Set the legal hold status for one object version
    async fn put_object_legal_hold(
        &self,
        bucket: &BucketName,
        target: &ObjectVersionRef,
        status: LegalHoldStatus,
    ) -> StorageResult<()>;

    /// Read the bucket policy document; `None` when no policy is present
    async fn get_bucket_policy(&self, bucket: &BucketName) -> StorageResult<Option<String>>;

    /// Write the bucket policy document
    async fn put_bucket_policy(&self, bucket: &BucketName, document: &str) -> StorageResult<()>;

    /// Remove the bucket policy
    async fn delete_bucket_policy(&self, bucket: &BucketName) -> StorageResult<()>;

    /// Read the bucket versioning state
    async fn get_bucket_versioning(&self, bucket: &BucketName) -> StorageResult<VersioningState>;

    /// Write the bucket versioning state
    async fn put_bucket_versioning(
        &self,
        bucket: &BucketName,
        state: VersioningState,
    ) -> StorageResult<()>;
}
