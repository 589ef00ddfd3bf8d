pub mod services;
pub mod storage;

// Re-export all port traits for convenience
pub use services::{BucketMaintenanceService, DrainOptions, PolicyService, MAX_DELETE_BATCH};
pub use storage::{ListVersionsRequest, VersionStoreClient};
