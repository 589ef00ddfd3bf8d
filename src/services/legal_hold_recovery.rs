use std::sync::Arc;
use tracing::debug;

use crate::{
    domain::{
        errors::StorageResult,
        models::{LegalHoldStatus, ObjectVersionRef},
        value_objects::BucketName,
    },
    ports::storage::VersionStoreClient,
};

/// Clears the legal hold on one protected object version so a forced delete
/// can be retried.
///
/// Works one version at a time: the hold state must be read and cleared per
/// version before the retry, so there is nothing to batch.
pub struct LegalHoldRecoverer {
    store: Arc<dyn VersionStoreClient>,
}

impl LegalHoldRecoverer {
    pub fn new(store: Arc<dyn VersionStoreClient>) -> Self {
        Self { store }
    }

    /// Attempt to clear the hold on `target`.
    ///
    /// Returns `true` when a hold was cleared and the caller owes the target
    /// one retry delete. Returns `false` when no hold was set; the denial
    /// came from something a retry cannot fix.
    pub async fn try_recover(
        &self,
        bucket: &BucketName,
        target: &ObjectVersionRef,
    ) -> StorageResult<bool> {
        let status = self.store.get_object_legal_hold(bucket, target).await?;
        if status == LegalHoldStatus::Off {
            return Ok(false);
        }

        debug!(key = %target.key, version_id = %target.version_id, "clearing legal hold");
        self.store
            .put_object_legal_hold(bucket, target, LegalHoldStatus::Off)
            .await?;
        Ok(true)
    }
}
