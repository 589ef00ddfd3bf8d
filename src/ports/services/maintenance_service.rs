use crate::domain::{
    errors::StorageResult,
    models::{DrainAborted, DrainReport, ObjectVersionRef},
    value_objects::{BucketName, ObjectKey},
};
use async_trait::async_trait;

/// Server-side cap on targets per batched delete call
pub const MAX_DELETE_BATCH: usize = 1000;

/// Options for a bucket or key drain
#[derive(Debug, Clone)]
pub struct DrainOptions {
    /// Forced mode: bypass governance retention and attempt legal-hold
    /// recovery on denied items
    pub force: bool,

    /// Page size for the version listing (also the batch size submitted to
    /// each delete call)
    pub page_size: u32,

    /// Optional deadline checked between network calls; exceeding it aborts
    /// the drain with the partial report
    pub deadline: Option<tokio::time::Instant>,
}

impl Default for DrainOptions {
    fn default() -> Self {
        Self {
            force: false,
            page_size: MAX_DELETE_BATCH as u32,
            deadline: None,
        }
    }
}

impl DrainOptions {
    pub fn forced() -> Self {
        Self {
            force: true,
            ..Self::default()
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_deadline(mut self, deadline: tokio::time::Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// Service port for destructive bucket maintenance
#[async_trait]
pub trait BucketMaintenanceService: Send + Sync {
    /// Delete every object version and delete marker in a bucket.
    ///
    /// Versions are drained before markers; an abort preserves the partial
    /// report.
    async fn empty_bucket(
        &self,
        bucket: &BucketName,
        options: &DrainOptions,
    ) -> Result<DrainReport, DrainAborted>;

    /// Delete every version and marker of exactly one key
    async fn delete_all_versions(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        options: &DrainOptions,
    ) -> Result<DrainReport, DrainAborted>;

    /// Delete one specific version, recovering from a legal hold when forced
    async fn delete_version(
        &self,
        bucket: &BucketName,
        target: &ObjectVersionRef,
        force: bool,
    ) -> StorageResult<()>;
}
