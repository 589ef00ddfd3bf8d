use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::adapters::outbound::storage::error::StoreError;
use crate::domain::{
    models::{DeleteMarkerEntry, ItemFailure, ObjectVersionRef, VersionEntry, VersionPage},
    value_objects::{ObjectKey, VersionId},
};

/// Wire shape of a ListObjectVersions response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ListVersionsResult {
    #[serde(default)]
    pub is_truncated: bool,
    pub next_key_marker: Option<String>,
    pub next_version_id_marker: Option<String>,
    #[serde(default, rename = "Version")]
    pub versions: Vec<VersionRow>,
    #[serde(default, rename = "DeleteMarker")]
    pub delete_markers: Vec<DeleteMarkerRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct VersionRow {
    pub key: String,
    pub version_id: String,
    #[serde(default)]
    pub is_latest: bool,
    pub last_modified: Option<DateTime<Utc>>,
    pub size: Option<u64>,
    pub e_tag: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct DeleteMarkerRow {
    pub key: String,
    pub version_id: String,
    #[serde(default)]
    pub is_latest: bool,
    pub last_modified: Option<DateTime<Utc>>,
}

/// Wire shape of a batched delete request body
#[derive(Debug, Serialize)]
#[serde(rename = "Delete", rename_all = "PascalCase")]
pub(crate) struct DeleteRequest {
    pub quiet: bool,
    #[serde(rename = "Object")]
    pub objects: Vec<ObjectIdentifier>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ObjectIdentifier {
    pub key: String,
    pub version_id: String,
}

/// Wire shape of a batched delete response; quiet mode returns errors only
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct DeleteResult {
    #[serde(default, rename = "Error")]
    pub errors: Vec<DeleteErrorRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct DeleteErrorRow {
    pub key: String,
    pub version_id: Option<String>,
    pub code: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "LegalHold", rename_all = "PascalCase")]
pub(crate) struct LegalHold {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "VersioningConfiguration", rename_all = "PascalCase")]
pub(crate) struct VersioningConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Wire shape of an API error body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ErrorResponse {
    pub code: Option<String>,
    pub message: Option<String>,
    pub resource: Option<String>,
    pub bucket_name: Option<String>,
}

fn parse_target(key: String, version_id: String) -> Result<ObjectVersionRef, StoreError> {
    let key = ObjectKey::new(key).map_err(|e| StoreError::Xml(format!("Invalid key: {}", e)))?;
    let version_id = VersionId::new(version_id)
        .map_err(|e| StoreError::Xml(format!("Invalid version id: {}", e)))?;
    Ok(ObjectVersionRef::new(key, version_id))
}

pub(crate) fn version_page_from_xml(result: ListVersionsResult) -> Result<VersionPage, StoreError> {
    let mut page = VersionPage {
        is_truncated: result.is_truncated,
        next_key_marker: result.next_key_marker,
        next_version_id_marker: result.next_version_id_marker,
        ..VersionPage::default()
    };

    for row in result.versions {
        page.versions.push(VersionEntry {
            target: parse_target(row.key, row.version_id)?,
            is_latest: row.is_latest,
            last_modified: row.last_modified,
            size: row.size,
            etag: row.e_tag,
        });
    }

    for row in result.delete_markers {
        page.delete_markers.push(DeleteMarkerEntry {
            target: parse_target(row.key, row.version_id)?,
            is_latest: row.is_latest,
            last_modified: row.last_modified,
        });
    }

    Ok(page)
}

pub(crate) fn item_failures_from_xml(result: DeleteResult) -> Result<Vec<ItemFailure>, StoreError> {
    result
        .errors
        .into_iter()
        .map(|row| {
            let version_id = row.version_id.unwrap_or_else(|| "null".to_string());
            Ok(ItemFailure {
                target: parse_target(row.key, version_id)?,
                code: row.code.unwrap_or_else(|| "UnknownError".to_string()),
                message: row
                    .message
                    .unwrap_or_else(|| "Service error occurred".to_string()),
            })
        })
        .collect()
}
