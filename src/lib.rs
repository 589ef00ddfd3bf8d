pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;
pub mod services;

// Re-export key types for convenience

// Domain types - core business entities and value objects
pub use domain::{
    BucketName,
    ConvergenceError,
    DeleteMarkerEntry,
    DeletionOutcome,
    DomainValidationError,
    DrainAborted,
    DrainError,
    DrainReport,
    DrainTarget,
    ItemFailure,
    LegalHoldStatus,
    // Value objects
    ObjectKey,
    // Models
    ObjectVersionRef,
    PolicyError,
    ProbeError,
    RetentionMode,
    RetryPolicy,
    // Errors
    StorageError,
    VersionEntry,
    VersionId,
    VersionPage,
    VersioningState,
};

// Port types - interfaces for external systems
pub use ports::{
    BucketMaintenanceService,
    DrainOptions,
    // Storage ports
    ListVersionsRequest,
    // Service ports
    PolicyService,
    VersionStoreClient,
    MAX_DELETE_BATCH,
};

// Service implementations - business logic
pub use services::{
    BatchDeleter, BatchOutcome, ConvergencePoller, LegalHoldRecoverer, MaintenanceServiceImpl,
    PolicyServiceImpl, VersionLister,
};

// Application factory and configuration
pub use app::{
    create_app_from_env, create_in_memory_app, create_s3_app, AppBuilder, AppConfig,
    AppDependencies, AppError, AppServices, StorageBackend,
};

// Adapter types - infrastructure implementations
pub use adapters::outbound::storage::{
    AnonymousSigner, CredentialSigner, InMemoryVersionStore, RequestSigner, S3VersionStore,
};

// Public facade for easy construction
pub mod prelude {
    pub use crate::{
        create_in_memory_app, create_s3_app, AppBuilder, AppServices, BucketMaintenanceService,
        BucketName, DrainOptions, DrainReport, InMemoryVersionStore, MaintenanceServiceImpl,
        ObjectKey, ObjectVersionRef, PolicyService, PolicyServiceImpl, RetryPolicy,
        S3VersionStore, VersionId, VersionLister, VersionStoreClient,
    };
}
