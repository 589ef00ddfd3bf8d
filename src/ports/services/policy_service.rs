use crate::domain::{errors::PolicyError, value_objects::BucketName};
use async_trait::async_trait;

/// Service port for bucket policy management.
///
/// Writes are confirmed against the eventually consistent read endpoint
/// before they are reported as complete.
#[async_trait]
pub trait PolicyService: Send + Sync {
    /// Write a policy document and wait until reads reflect it
    async fn put_policy(&self, bucket: &BucketName, document: &str) -> Result<(), PolicyError>;

    /// Read the current policy document; `None` when no policy is present
    async fn get_policy(&self, bucket: &BucketName) -> Result<Option<String>, PolicyError>;

    /// Delete the policy and wait until reads report it gone
    async fn delete_policy(&self, bucket: &BucketName) -> Result<(), PolicyError>;
}
