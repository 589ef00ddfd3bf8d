mod batch_deleter;
mod convergence;
mod legal_hold_recovery;
mod maintenance_service_impl;
mod policy_service_impl;
mod version_lister;

pub use batch_deleter::{BatchDeleter, BatchOutcome};
pub use convergence::ConvergencePoller;
pub use legal_hold_recovery::LegalHoldRecoverer;
pub use maintenance_service_impl::MaintenanceServiceImpl;
pub use policy_service_impl::PolicyServiceImpl;
pub use version_lister::VersionLister;
