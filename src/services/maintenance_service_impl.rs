use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::{
    domain::{
        errors::{StorageError, StorageResult},
        models::{
            DeletionOutcome, DrainAborted, DrainReport, DrainTarget, ItemFailure,
            ObjectVersionRef,
        },
        value_objects::{BucketName, ObjectKey},
    },
    ports::{
        services::{BucketMaintenanceService, DrainOptions},
        storage::VersionStoreClient,
    },
    services::{BatchDeleter, LegalHoldRecoverer, VersionLister},
};

/// Destructive bucket maintenance: bucket emptying and per-key version
/// deletion.
///
/// A drain runs two strictly sequential passes. Object versions go first;
/// delete markers only after every version page has been processed. Deleting
/// a marker while its shadowed versions remain would make the object visible
/// again.
pub struct MaintenanceServiceImpl {
    store: Arc<dyn VersionStoreClient>,
    deleter: BatchDeleter,
    recoverer: LegalHoldRecoverer,
}

impl MaintenanceServiceImpl {
    pub fn new(store: Arc<dyn VersionStoreClient>) -> Self {
        Self {
            deleter: BatchDeleter::new(store.clone()),
            recoverer: LegalHoldRecoverer::new(store.clone()),
            store,
        }
    }

    fn check_deadline(options: &DrainOptions) -> StorageResult<()> {
        match options.deadline {
            Some(deadline) if tokio::time::Instant::now() >= deadline => {
                Err(StorageError::DeadlineExceeded)
            }
            _ => Ok(()),
        }
    }

    async fn drain(
        &self,
        bucket: &BucketName,
        exact_key: Option<&ObjectKey>,
        options: &DrainOptions,
    ) -> Result<DrainReport, DrainAborted> {
        let mut report = DrainReport::default();

        if let Err(source) = self
            .version_pass(bucket, exact_key, options, &mut report)
            .await
        {
            return Err(DrainAborted::new(report, source));
        }

        if let Err(source) = self
            .marker_pass(bucket, exact_key, options, &mut report)
            .await
        {
            return Err(DrainAborted::new(report, source));
        }

        debug!(
            bucket = %bucket,
            deleted = report.deleted,
            failed = report.errors.len(),
            "drain complete"
        );
        Ok(report)
    }

    /// Phase A: delete object versions, recovering held items under force
    async fn version_pass(
        &self,
        bucket: &BucketName,
        exact_key: Option<&ObjectKey>,
        options: &DrainOptions,
        report: &mut DrainReport,
    ) -> StorageResult<()> {
        let prefix = exact_key.map(|k| k.as_str().to_string());
        let mut lister = VersionLister::new(
            self.store.clone(),
            bucket.clone(),
            prefix,
            options.page_size,
        );

        while lister.has_more_pages() {
            Self::check_deadline(options)?;

            let page = match lister.next_page().await {
                Ok(page) => page,
                // A bucket that no longer exists has nothing left to drain
                Err(StorageError::BucketNotFound { .. }) => return Ok(()),
                Err(e) => return Err(e),
            };

            // The server prefix filter is a prefix match, not an exact
            // match; sibling keys sharing the prefix must survive.
            let targets: Vec<ObjectVersionRef> = page
                .versions
                .iter()
                .filter(|entry| exact_key.map_or(true, |k| entry.target.key == *k))
                .map(|entry| entry.target.clone())
                .collect();
            if targets.is_empty() {
                continue;
            }

            Self::check_deadline(options)?;
            let outcome = self
                .deleter
                .delete_batch(bucket, &targets, options.force)
                .await?;
            if outcome.bucket_vanished {
                return Ok(());
            }
            report.record_deleted(outcome.deleted);

            for failure in outcome.failures {
                self.handle_version_failure(bucket, failure, options, report)
                    .await;
            }
        }

        Ok(())
    }

    /// Phase B: delete markers only; markers are never retention-protected,
    /// so no recovery applies.
    async fn marker_pass(
        &self,
        bucket: &BucketName,
        exact_key: Option<&ObjectKey>,
        options: &DrainOptions,
        report: &mut DrainReport,
    ) -> StorageResult<()> {
        let prefix = exact_key.map(|k| k.as_str().to_string());
        let mut lister = VersionLister::new(
            self.store.clone(),
            bucket.clone(),
            prefix,
            options.page_size,
        );

        while lister.has_more_pages() {
            Self::check_deadline(options)?;

            let page = match lister.next_page().await {
                Ok(page) => page,
                Err(StorageError::BucketNotFound { .. }) => return Ok(()),
                Err(e) => return Err(e),
            };

            let targets: Vec<ObjectVersionRef> = page
                .delete_markers
                .iter()
                .filter(|entry| exact_key.map_or(true, |k| entry.target.key == *k))
                .map(|entry| entry.target.clone())
                .collect();
            if targets.is_empty() {
                continue;
            }

            Self::check_deadline(options)?;
            let outcome = self
                .deleter
                .delete_batch(bucket, &targets, options.force)
                .await?;
            if outcome.bucket_vanished {
                return Ok(());
            }
            report.record_deleted(outcome.deleted);

            for failure in outcome.failures {
                warn!(entry = %failure.target, code = %failure.code, "delete marker not deleted");
                report.record_error(
                    DrainTarget::DeleteMarker(failure.target.clone()),
                    failure.code,
                    failure.message,
                );
            }
        }

        Ok(())
    }

    /// Fold one failed version delete into the report, attempting legal-hold
    /// recovery first when running forced. Item failures never abort a page.
    async fn handle_version_failure(
        &self,
        bucket: &BucketName,
        failure: ItemFailure,
        options: &DrainOptions,
        report: &mut DrainReport,
    ) {
        match DeletionOutcome::classify(&failure) {
            DeletionOutcome::Denied { message } if options.force => {
                match self.recoverer.try_recover(bucket, &failure.target).await {
                    Ok(true) => {
                        // Hold cleared; the target is owed exactly one retry
                        match self
                            .store
                            .delete_object(bucket, &failure.target, true)
                            .await
                        {
                            Ok(()) => report.record_deleted(1),
                            Err(e) => {
                                warn!(entry = %failure.target, "retry delete failed after hold removal");
                                report.record_error(
                                    DrainTarget::Version(failure.target),
                                    failure.code,
                                    e.to_string(),
                                );
                            }
                        }
                    }
                    Ok(false) => {
                        // No hold was set; the denial stands as-is
                        report.record_error(
                            DrainTarget::Version(failure.target),
                            failure.code,
                            message,
                        );
                    }
                    Err(e) => {
                        report.record_error(
                            DrainTarget::Version(failure.target),
                            failure.code,
                            format!("{} (legal hold removal failed: {})", message, e),
                        );
                    }
                }
            }
            DeletionOutcome::Denied { message } => {
                report.record_error(DrainTarget::Version(failure.target), failure.code, message);
            }
            DeletionOutcome::Failed { code, message } => {
                report.record_error(DrainTarget::Version(failure.target), code, message);
            }
            // A failure never classifies as deleted
            DeletionOutcome::Deleted => {}
        }
    }
}

#[async_trait]
impl BucketMaintenanceService for MaintenanceServiceImpl {
    async fn empty_bucket(
        &self,
        bucket: &BucketName,
        options: &DrainOptions,
    ) -> Result<DrainReport, DrainAborted> {
        debug!(bucket = %bucket, force = options.force, "emptying bucket");
        self.drain(bucket, None, options).await
    }

    async fn delete_all_versions(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        options: &DrainOptions,
    ) -> Result<DrainReport, DrainAborted> {
        debug!(bucket = %bucket, key = %key, force = options.force, "deleting all versions of key");
        self.drain(bucket, Some(key), options).await
    }

    async fn delete_version(
        &self,
        bucket: &BucketName,
        target: &ObjectVersionRef,
        force: bool,
    ) -> StorageResult<()> {
        match self.store.delete_object(bucket, target, force).await {
            Ok(()) => Ok(()),
            Err(StorageError::AccessDenied { message }) if force => {
                if self.recoverer.try_recover(bucket, target).await? {
                    self.store.delete_object(bucket, target, true).await
                } else {
                    Err(StorageError::AccessDenied { message })
                }
            }
            Err(e) => Err(e),
        }
    }
}
