use chrono::{DateTime, Utc};

use crate::domain::value_objects::{ObjectKey, VersionId};

/// Identifies exactly one immutable version of one object.
///
/// Produced by listing, consumed by delete calls; never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectVersionRef {
    pub key: ObjectKey,
    pub version_id: VersionId,
}

impl ObjectVersionRef {
    pub fn new(key: ObjectKey, version_id: VersionId) -> Self {
        Self { key, version_id }
    }
}

impl std::fmt::Display for ObjectVersionRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.key, self.version_id)
    }
}

/// One object version row from a version listing
#[derive(Debug, Clone)]
pub struct VersionEntry {
    pub target: ObjectVersionRef,
    pub is_latest: bool,
    pub last_modified: Option<DateTime<Utc>>,
    pub size: Option<u64>,
    pub etag: Option<String>,
}

/// One delete-marker row from a version listing.
///
/// Same shape as a version entry but identifies a tombstone, not an
/// addressable payload.
#[derive(Debug, Clone)]
pub struct DeleteMarkerEntry {
    pub target: ObjectVersionRef,
    pub is_latest: bool,
    pub last_modified: Option<DateTime<Utc>>,
}

/// One page from the list-object-versions endpoint
#[derive(Debug, Clone, Default)]
pub struct VersionPage {
    pub versions: Vec<VersionEntry>,
    pub delete_markers: Vec<DeleteMarkerEntry>,
    pub is_truncated: bool,
    pub next_key_marker: Option<String>,
    pub next_version_id_marker: Option<String>,
}

impl VersionPage {
    /// Total number of entries (versions plus markers) on this page
    pub fn len(&self) -> usize {
        self.versions.len() + self.delete_markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty() && self.delete_markers.is_empty()
    }
}

/// Per-version legal hold flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegalHoldStatus {
    On,
    Off,
}

impl LegalHoldStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LegalHoldStatus::On => "ON",
            LegalHoldStatus::Off => "OFF",
        }
    }

    pub fn from_api_str(value: &str) -> Self {
        if value.eq_ignore_ascii_case("ON") {
            LegalHoldStatus::On
        } else {
            LegalHoldStatus::Off
        }
    }
}

impl std::fmt::Display for LegalHoldStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Retention strictness for locked object versions.
///
/// Governance retention yields to the bypass flag; compliance never does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionMode {
    Governance,
    Compliance,
}

/// Bucket versioning state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersioningState {
    Enabled,
    Suspended,
    /// Versioning has never been configured on the bucket
    #[default]
    Unversioned,
}

impl VersioningState {
    /// The `Status` string the API expects; an unversioned bucket has none.
    pub fn as_api_str(&self) -> Option<&'static str> {
        match self {
            VersioningState::Enabled => Some("Enabled"),
            VersioningState::Suspended => Some("Suspended"),
            VersioningState::Unversioned => None,
        }
    }

    pub fn from_api_str(value: Option<&str>) -> Self {
        match value {
            Some(s) if s.eq_ignore_ascii_case("Enabled") => VersioningState::Enabled,
            Some(s) if s.eq_ignore_ascii_case("Suspended") => VersioningState::Suspended,
            _ => VersioningState::Unversioned,
        }
    }
}
