use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::{
    domain::{
        errors::{ConvergenceError, PolicyError, ProbeError, StorageError},
        models::RetryPolicy,
        value_objects::BucketName,
    },
    ports::{services::PolicyService, storage::VersionStoreClient},
    services::ConvergencePoller,
};

/// Bucket policy management with read-after-write confirmation.
///
/// The policy endpoint is eventually consistent; every mutation is followed
/// by a poll against the read path until it reflects the write. After a
/// delete, convergence means the read reports not-present.
pub struct PolicyServiceImpl {
    store: Arc<dyn VersionStoreClient>,
    retry: RetryPolicy,
}

impl PolicyServiceImpl {
    pub fn new(store: Arc<dyn VersionStoreClient>, retry: RetryPolicy) -> Self {
        Self { store, retry }
    }

    fn map_convergence(bucket: &BucketName, err: ConvergenceError) -> PolicyError {
        match err {
            ConvergenceError::TimedOut { waited } => PolicyError::DidNotConverge {
                bucket: bucket.as_str().to_string(),
                waited,
            },
            ConvergenceError::Permanent(e) => PolicyError::Storage(e),
        }
    }
}

#[async_trait]
impl PolicyService for PolicyServiceImpl {
    async fn put_policy(&self, bucket: &BucketName, document: &str) -> Result<(), PolicyError> {
        // The store rejects malformed documents with a 400; catch them here
        // before the write-then-poll cycle starts
        serde_json::from_str::<serde_json::Value>(document).map_err(|e| {
            PolicyError::Storage(StorageError::ValidationError {
                message: format!("Policy document is not valid JSON: {}", e),
            })
        })?;

        self.store.put_bucket_policy(bucket, document).await?;
        debug!(bucket = %bucket, "policy written, waiting for reads to converge");

        let store = Arc::clone(&self.store);
        let target = bucket.clone();
        let poller = ConvergencePoller::new(self.retry.clone());
        poller
            .poll_until(move || {
                let store = Arc::clone(&store);
                let target = target.clone();
                async move {
                    match store.get_bucket_policy(&target).await {
                        Ok(Some(_)) => Ok(()),
                        Ok(None) => Err(ProbeError::NotYetVisible),
                        Err(e) => Err(ProbeError::Permanent(e)),
                    }
                }
            })
            .await
            .map_err(|e| Self::map_convergence(bucket, e))
    }

    async fn get_policy(&self, bucket: &BucketName) -> Result<Option<String>, PolicyError> {
        Ok(self.store.get_bucket_policy(bucket).await?)
    }

    async fn delete_policy(&self, bucket: &BucketName) -> Result<(), PolicyError> {
        self.store.delete_bucket_policy(bucket).await?;
        debug!(bucket = %bucket, "policy deleted, waiting for reads to converge");

        let store = Arc::clone(&self.store);
        let target = bucket.clone();
        let poller = ConvergencePoller::new(self.retry.clone());
        poller
            .poll_until(move || {
                let store = Arc::clone(&store);
                let target = target.clone();
                async move {
                    // Convergence is inverted here: done once reads 404
                    match store.get_bucket_policy(&target).await {
                        Ok(None) => Ok(()),
                        Ok(Some(_)) => Err(ProbeError::NotYetVisible),
                        Err(e) => Err(ProbeError::Permanent(e)),
                    }
                }
            })
            .await
            .map_err(|e| Self::map_convergence(bucket, e))
    }
}
