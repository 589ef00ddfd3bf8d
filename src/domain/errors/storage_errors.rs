use crate::domain::value_objects::{ObjectKey, VersionId};

/// Errors that can occur while driving the object store API
#[derive(Debug, Clone)]
pub enum StorageError {
    /// Bucket not found
    BucketNotFound { bucket: String },

    /// Object not found
    ObjectNotFound { key: ObjectKey },

    /// Version not found
    VersionNotFound {
        key: ObjectKey,
        version_id: VersionId,
    },

    /// Access denied (retention, legal hold, or missing permission)
    AccessDenied { message: String },

    /// A page was requested from a lister that has already been exhausted
    ListerExhausted,

    /// A batch delete was submitted with no targets
    EmptyBatch,

    /// A batch delete exceeded the per-request limit
    BatchTooLarge { actual: usize, max: usize },

    /// A caller-supplied deadline elapsed before the operation completed
    DeadlineExceeded,

    /// The store returned a response the client could not interpret
    InvalidResponse { message: String },

    /// Validation error
    ValidationError { message: String },

    /// Infrastructure error with external source
    InfrastructureError {
        message: String,
        source: Option<String>, // Store error as string to allow Clone
    },

    /// Generic storage error
    InternalError { message: String },
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::BucketNotFound { bucket } => {
                write!(f, "Bucket not found: {}", bucket)
            }
            StorageError::ObjectNotFound { key } => {
                write!(f, "Object not found: {}", key)
            }
            StorageError::VersionNotFound { key, version_id } => {
                write!(f, "Version '{}' not found for object: {}", version_id, key)
            }
            StorageError::AccessDenied { message } => {
                write!(f, "Access denied: {}", message)
            }
            StorageError::ListerExhausted => {
                write!(f, "Version lister is exhausted; no more pages to fetch")
            }
            StorageError::EmptyBatch => {
                write!(f, "Batch delete requires at least one target")
            }
            StorageError::BatchTooLarge { actual, max } => {
                write!(f, "Batch delete too large: {} targets (max: {})", actual, max)
            }
            StorageError::DeadlineExceeded => {
                write!(f, "Operation deadline exceeded")
            }
            StorageError::InvalidResponse { message } => {
                write!(f, "Invalid response from store: {}", message)
            }
            StorageError::ValidationError { message } => {
                write!(f, "Validation error: {}", message)
            }
            StorageError::InfrastructureError { message, .. } => {
                write!(f, "Infrastructure error: {}", message)
            }
            StorageError::InternalError { message } => {
                write!(f, "Internal storage error: {}", message)
            }
        }
    }
}

impl std::error::Error for StorageError {}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
