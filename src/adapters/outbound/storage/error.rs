use crate::domain::{
    errors::StorageError,
    value_objects::ObjectKey,
};
use thiserror::Error as ThisError;

/// Infrastructure errors from the REST storage adapter
#[derive(ThisError, Debug)]
pub enum StoreError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Service error: {status} {code}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
        /// Resource name extracted from the error body, when present
        resource: Option<String>,
    },

    #[error("XML error: {0}")]
    Xml(String),
}

/// Convert infrastructure StoreError to domain StorageError
impl From<StoreError> for StorageError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Api {
                status,
                code,
                message,
                resource,
            } => match code.as_str() {
                "NoSuchBucket" => StorageError::BucketNotFound {
                    bucket: resource.unwrap_or_else(|| "unknown".to_string()),
                },
                "AccessDenied" => StorageError::AccessDenied { message },
                "NoSuchKey" => match resource.and_then(|r| ObjectKey::new(r).ok()) {
                    Some(key) => StorageError::ObjectNotFound { key },
                    None => StorageError::InfrastructureError {
                        message: format!("NoSuchKey: {}", message),
                        source: Some(status.to_string()),
                    },
                },
                _ => StorageError::InfrastructureError {
                    message: format!("{}: {}", code, message),
                    source: Some(status.to_string()),
                },
            },
            StoreError::Transport(e) => StorageError::InfrastructureError {
                message: format!("HTTP request failed: {}", e),
                source: Some(e.to_string()),
            },
            StoreError::Xml(msg) => StorageError::InvalidResponse { message: msg },
        }
    }
}
