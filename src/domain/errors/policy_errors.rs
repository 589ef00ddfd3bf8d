use std::time::Duration;

use crate::domain::errors::StorageError;

/// Errors from bucket policy management
#[derive(Debug)]
pub enum PolicyError {
    /// The underlying store call failed
    Storage(StorageError),

    /// The policy write succeeded but reads never reflected it in time
    DidNotConverge { bucket: String, waited: Duration },
}

impl std::fmt::Display for PolicyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyError::Storage(err) => write!(f, "Policy operation failed: {}", err),
            PolicyError::DidNotConverge { bucket, waited } => {
                write!(
                    f,
                    "Policy for bucket '{}' did not converge within deadline (waited {:?})",
                    bucket, waited
                )
            }
        }
    }
}

impl std::error::Error for PolicyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PolicyError::Storage(err) => Some(err),
            PolicyError::DidNotConverge { .. } => None,
        }
    }
}

impl From<StorageError> for PolicyError {
    fn from(err: StorageError) -> Self {
        PolicyError::Storage(err)
    }
}
