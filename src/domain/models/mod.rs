pub mod drain;
pub mod retry;
pub mod version;

pub use drain::{
    DeletionOutcome, DrainAborted, DrainError, DrainReport, DrainTarget, ItemFailure,
    ACCESS_DENIED_CODE,
};
pub use retry::RetryPolicy;
pub use version::{
    DeleteMarkerEntry, LegalHoldStatus, ObjectVersionRef, RetentionMode, VersionEntry,
    VersionPage, VersioningState,
};
