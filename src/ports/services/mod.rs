mod maintenance_service;
mod policy_service;

pub use maintenance_service::{BucketMaintenanceService, DrainOptions, MAX_DELETE_BATCH};
pub use policy_service::PolicyService;
