use std::sync::Arc;

use crate::{
    adapters::outbound::storage::{
        AnonymousSigner, CredentialSigner, InMemoryVersionStore, RequestSigner, S3VersionStore,
    },
    domain::models::RetryPolicy,
    ports::storage::VersionStoreClient,
    services::{MaintenanceServiceImpl, PolicyServiceImpl},
};

/// Configuration for the application
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage_backend: StorageBackend,
    pub retry_policy: RetryPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_backend: StorageBackend::InMemory,
            retry_policy: RetryPolicy::default(),
        }
    }
}

/// Storage backend configuration
#[derive(Debug, Clone)]
pub enum StorageBackend {
    InMemory,
    S3 {
        endpoint: String,
        region: Option<String>,
        access_key: Option<String>,
        secret_key: Option<String>,
        session_token: Option<String>,
        secure: bool,
    },
}

/// Application dependencies container
pub struct AppDependencies {
    pub store: Arc<dyn VersionStoreClient>,
}

/// Application services container
pub struct AppServices {
    pub maintenance: Arc<MaintenanceServiceImpl>,
    pub policy: Arc<PolicyServiceImpl>,
    pub store: Arc<dyn VersionStoreClient>,
}

/// Application builder for dependency injection
pub struct AppBuilder {
    config: AppConfig,
}

impl AppBuilder {
    /// Create a new application builder
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    /// Configure the application with custom settings
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Configure storage backend
    pub fn with_storage_backend(mut self, backend: StorageBackend) -> Self {
        self.config.storage_backend = backend;
        self
    }

    /// Configure the convergence retry policy
    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.config.retry_policy = retry_policy;
        self
    }

    /// Build the application dependencies
    pub fn build_dependencies(&self) -> Result<AppDependencies, AppError> {
        let store = self.create_store()?;
        Ok(AppDependencies { store })
    }

    /// Build the complete application with services
    pub fn build(self) -> Result<AppServices, AppError> {
        let deps = self.build_dependencies()?;

        let maintenance = Arc::new(MaintenanceServiceImpl::new(deps.store.clone()));
        let policy = Arc::new(PolicyServiceImpl::new(
            deps.store.clone(),
            self.config.retry_policy.clone(),
        ));

        Ok(AppServices {
            maintenance,
            policy,
            store: deps.store,
        })
    }

    fn create_store(&self) -> Result<Arc<dyn VersionStoreClient>, AppError> {
        match &self.config.storage_backend {
            StorageBackend::InMemory => Ok(Arc::new(InMemoryVersionStore::new())),
            StorageBackend::S3 {
                endpoint,
                region,
                access_key,
                secret_key,
                session_token,
                secure,
            } => {
                let signer: Arc<dyn RequestSigner> = match (access_key, secret_key) {
                    (Some(access_key), Some(secret_key)) => {
                        let mut signer =
                            CredentialSigner::new(access_key.as_str(), secret_key.as_str());
                        if let Some(token) = session_token {
                            signer = signer.with_session_token(token.as_str());
                        }
                        Arc::new(signer)
                    }
                    (None, None) => Arc::new(AnonymousSigner),
                    _ => {
                        return Err(AppError::Configuration {
                            message: "Access key and secret key must be provided together"
                                .to_string(),
                        });
                    }
                };

                Ok(Arc::new(S3VersionStore::new(
                    endpoint.clone(),
                    region.clone(),
                    *secure,
                    signer,
                )))
            }
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage initialization error: {message}")]
    StorageInit { message: String },
}

/// Convenience functions for common configurations
///
/// Create an in-memory application for testing and development
pub fn create_in_memory_app() -> Result<AppServices, AppError> {
    AppBuilder::new()
        .with_storage_backend(StorageBackend::InMemory)
        .build()
}

/// Create an application backed by an S3-compatible endpoint
pub fn create_s3_app(
    endpoint: String,
    region: Option<String>,
    access_key: Option<String>,
    secret_key: Option<String>,
    secure: bool,
) -> Result<AppServices, AppError> {
    AppBuilder::new()
        .with_storage_backend(StorageBackend::S3 {
            endpoint,
            region,
            access_key,
            secret_key,
            session_token: None,
            secure,
        })
        .build()
}

/// Create application from environment variables
pub fn create_app_from_env() -> Result<AppServices, AppError> {
    let storage_backend = match std::env::var("STORAGE_BACKEND").as_deref() {
        Ok("s3") => {
            let endpoint = std::env::var("S3_ENDPOINT").map_err(|_| AppError::Configuration {
                message: "S3_ENDPOINT environment variable required".to_string(),
            })?;
            let region = std::env::var("S3_REGION").ok();
            let access_key = std::env::var("S3_ACCESS_KEY").ok();
            let secret_key = std::env::var("S3_SECRET_KEY").ok();
            let session_token = std::env::var("S3_SESSION_TOKEN").ok();
            let secure = std::env::var("S3_USE_SSL")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true);

            StorageBackend::S3 {
                endpoint,
                region,
                access_key,
                secret_key,
                session_token,
                secure,
            }
        }
        _ => StorageBackend::InMemory,
    };

    AppBuilder::new()
        .with_storage_backend(storage_backend)
        .build()
}
