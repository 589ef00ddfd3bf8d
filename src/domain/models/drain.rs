use crate::domain::errors::StorageError;
use crate::domain::models::ObjectVersionRef;

/// Error code the store uses for retention and legal-hold denials
pub const ACCESS_DENIED_CODE: &str = "AccessDenied";

/// Raw per-item failure from a quiet-mode batch delete response
#[derive(Debug, Clone)]
pub struct ItemFailure {
    pub target: ObjectVersionRef,
    pub code: String,
    pub message: String,
}

/// Classified outcome for one submitted delete target.
///
/// Classification happens once per item so the recovery decision lives in a
/// single place instead of scattered code checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionOutcome {
    Deleted,
    /// Access denied; candidate for legal-hold recovery under forced mode
    Denied { message: String },
    /// Any other per-item failure code; terminal for the item
    Failed { code: String, message: String },
}

impl DeletionOutcome {
    /// Classify a raw batch failure by its error code
    pub fn classify(failure: &ItemFailure) -> Self {
        if failure.code == ACCESS_DENIED_CODE {
            DeletionOutcome::Denied {
                message: failure.message.clone(),
            }
        } else {
            DeletionOutcome::Failed {
                code: failure.code.clone(),
                message: failure.message.clone(),
            }
        }
    }
}

/// What kind of entry a failed delete was aimed at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrainTarget {
    Version(ObjectVersionRef),
    DeleteMarker(ObjectVersionRef),
}

impl DrainTarget {
    pub fn as_ref(&self) -> &ObjectVersionRef {
        match self {
            DrainTarget::Version(r) => r,
            DrainTarget::DeleteMarker(r) => r,
        }
    }
}

impl std::fmt::Display for DrainTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DrainTarget::Version(r) => write!(f, "version {}", r),
            DrainTarget::DeleteMarker(r) => write!(f, "delete marker {}", r),
        }
    }
}

/// One undeleted item in a drain report, with its original code and message
#[derive(Debug, Clone)]
pub struct DrainError {
    pub target: DrainTarget,
    pub code: String,
    pub message: String,
}

impl std::fmt::Display for DrainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}: {}", self.target, self.code, self.message)
    }
}

/// Accumulated result of one bucket or key drain.
///
/// `deleted` and `errors` grow monotonically across pages; every failed item
/// is enumerated so callers can report exactly which objects remain.
#[derive(Debug, Clone, Default)]
pub struct DrainReport {
    pub deleted: u64,
    pub errors: Vec<DrainError>,
}

impl DrainReport {
    pub fn record_deleted(&mut self, count: u64) {
        self.deleted += count;
    }

    pub fn record_error(&mut self, target: DrainTarget, code: String, message: String) {
        self.errors.push(DrainError {
            target,
            code,
            message,
        });
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A drain that stopped early on a non-recoverable error.
///
/// Carries the report accumulated before the abort so completed deletions are
/// never discarded.
#[derive(Debug)]
pub struct DrainAborted {
    pub partial: DrainReport,
    pub source: StorageError,
}

impl DrainAborted {
    pub fn new(partial: DrainReport, source: StorageError) -> Self {
        Self { partial, source }
    }
}

impl std::fmt::Display for DrainAborted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Drain aborted after {} deletions and {} item failures: {}",
            self.partial.deleted,
            self.partial.errors.len(),
            self.source
        )
    }
}

impl std::error::Error for DrainAborted {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{ObjectKey, VersionId};

    fn failure(code: &str) -> ItemFailure {
        ItemFailure {
            target: ObjectVersionRef::new(
                ObjectKey::new("a.txt".to_string()).unwrap(),
                VersionId::new("v1".to_string()).unwrap(),
            ),
            code: code.to_string(),
            message: "denied".to_string(),
        }
    }

    #[test]
    fn test_classify_access_denied() {
        assert_eq!(
            DeletionOutcome::classify(&failure("AccessDenied")),
            DeletionOutcome::Denied {
                message: "denied".to_string()
            }
        );
    }

    #[test]
    fn test_classify_other_code() {
        assert_eq!(
            DeletionOutcome::classify(&failure("InternalError")),
            DeletionOutcome::Failed {
                code: "InternalError".to_string(),
                message: "denied".to_string()
            }
        );
    }

    #[test]
    fn test_report_accumulates() {
        let mut report = DrainReport::default();
        report.record_deleted(3);
        report.record_deleted(2);
        assert_eq!(report.deleted, 5);
        assert!(report.is_clean());

        let target = DrainTarget::Version(ObjectVersionRef::new(
            ObjectKey::new("a.txt".to_string()).unwrap(),
            VersionId::new("v1".to_string()).unwrap(),
        ));
        report.record_error(target, "AccessDenied".to_string(), "held".to_string());
        assert!(!report.is_clean());
        assert_eq!(report.errors.len(), 1);
    }
}
