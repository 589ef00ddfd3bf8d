use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    adapters::outbound::storage::error::StoreError,
    adapters::outbound::storage::s3::signer::RequestSigner,
    adapters::outbound::storage::s3::xml,
    domain::{
        errors::{StorageError, StorageResult},
        models::{ItemFailure, LegalHoldStatus, ObjectVersionRef, VersionPage, VersioningState},
        value_objects::{BucketName, ObjectKey},
    },
    ports::storage::{ListVersionsRequest, VersionStoreClient},
};

/// REST adapter driving the bucket-level API of an S3-compatible store.
///
/// Every outbound request passes through the configured signer; the adapter
/// itself only builds URLs, bodies, and headers.
pub struct S3VersionStore {
    http: Client,
    endpoint: String,
    region: String,
    secure: bool,
    signer: Arc<dyn RequestSigner>,
}

impl S3VersionStore {
    pub fn new(
        endpoint: impl Into<String>,
        region: Option<String>,
        secure: bool,
        signer: Arc<dyn RequestSigner>,
    ) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            http,
            endpoint: endpoint.into(),
            region: region.unwrap_or_else(|| "us-east-1".to_string()),
            secure,
            signer,
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    fn scheme(&self) -> &'static str {
        if self.secure { "https" } else { "http" }
    }

    fn base_url(&self) -> String {
        format!("{}://{}", self.scheme(), self.endpoint)
    }

    fn bucket_url(&self, bucket: &BucketName) -> String {
        format!("{}/{}", self.base_url(), bucket)
    }

    fn object_url(&self, bucket: &BucketName, key: &ObjectKey) -> String {
        // Keys may contain '/' separators that must survive encoding
        let encoded: Vec<String> = key
            .as_str()
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        format!("{}/{}", self.bucket_url(bucket), encoded.join("/"))
    }

    /// Sign and execute a request, turning non-2xx responses into API errors
    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, StoreError> {
        let response = self.signer.sign(request).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let status = status.as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(parse_api_error(status, &body))
    }
}

fn parse_api_error(status: u16, body: &str) -> StoreError {
    let parsed: Option<xml::ErrorResponse> = quick_xml::de::from_str(body).ok();
    let (code, message, resource) = match parsed {
        Some(e) => (e.code, e.message, e.resource.or(e.bucket_name)),
        None => (None, None, None),
    };

    // A 404 without a parseable code is treated as a missing bucket; the
    // store always names a code, so a bare 404 came from the bucket route.
    let code = match code.filter(|c| !c.is_empty()) {
        Some(c) => c,
        None if status == 404 => "NoSuchBucket".to_string(),
        None => "UnknownError".to_string(),
    };

    StoreError::Api {
        status,
        code,
        message: message.unwrap_or_else(|| "Service error occurred".to_string()),
        resource,
    }
}

#[async_trait]
impl VersionStoreClient for S3VersionStore {
    async fn list_object_versions(
        &self,
        request: &ListVersionsRequest,
    ) -> StorageResult<VersionPage> {
        let url = format!("{}?versions", self.bucket_url(&request.bucket));

        let mut query: Vec<(&str, String)> = vec![("max-keys", request.max_keys.to_string())];
        if let Some(prefix) = &request.prefix {
            query.push(("prefix", prefix.clone()));
        }
        if let Some(key_marker) = &request.key_marker {
            query.push(("key-marker", key_marker.clone()));
        }
        if let Some(version_id_marker) = &request.version_id_marker {
            query.push(("version-id-marker", version_id_marker.clone()));
        }

        let response = self.execute(self.http.get(&url).query(&query)).await?;
        let body = response.text().await.map_err(StoreError::Transport)?;
        let parsed: xml::ListVersionsResult =
            quick_xml::de::from_str(&body).map_err(|e| StoreError::Xml(e.to_string()))?;

        Ok(xml::version_page_from_xml(parsed)?)
    }

    async fn delete_objects(
        &self,
        bucket: &BucketName,
        targets: &[ObjectVersionRef],
        bypass_governance: bool,
    ) -> StorageResult<Vec<ItemFailure>> {
        let payload = xml::DeleteRequest {
            quiet: true,
            objects: targets
                .iter()
                .map(|t| xml::ObjectIdentifier {
                    key: t.key.as_str().to_string(),
                    version_id: t.version_id.as_str().to_string(),
                })
                .collect(),
        };
        let body =
            quick_xml::se::to_string(&payload).map_err(|e| StoreError::Xml(e.to_string()))?;
        let content_md5 = BASE64.encode(md5::compute(body.as_bytes()).0);

        let url = format!("{}?delete", self.bucket_url(bucket));
        let mut request = self
            .http
            .post(&url)
            .header("Content-MD5", content_md5)
            .header("Content-Type", "application/xml")
            .body(body);
        if bypass_governance {
            request = request.header("x-amz-bypass-governance-retention", "true");
        }

        let response = self.execute(request).await?;
        let body = response.text().await.map_err(StoreError::Transport)?;
        let parsed: xml::DeleteResult =
            quick_xml::de::from_str(&body).map_err(|e| StoreError::Xml(e.to_string()))?;

        Ok(xml::item_failures_from_xml(parsed)?)
    }

    async fn delete_object(
        &self,
        bucket: &BucketName,
        target: &ObjectVersionRef,
        bypass_governance: bool,
    ) -> StorageResult<()> {
        let url = self.object_url(bucket, &target.key);
        let mut request = self
            .http
            .delete(&url)
            .query(&[("versionId", target.version_id.as_str())]);
        if bypass_governance {
            request = request.header("x-amz-bypass-governance-retention", "true");
        }

        self.execute(request).await?;
        Ok(())
    }

    async fn get_object_legal_hold(
        &self,
        bucket: &BucketName,
        target: &ObjectVersionRef,
    ) -> StorageResult<LegalHoldStatus> {
        let url = format!("{}?legal-hold", self.object_url(bucket, &target.key));
        let request = self
            .http
            .get(&url)
            .query(&[("versionId", target.version_id.as_str())]);

        match self.execute(request).await {
            Ok(response) => {
                let body = response.text().await.map_err(StoreError::Transport)?;
                let parsed: xml::LegalHold =
                    quick_xml::de::from_str(&body).map_err(|e| StoreError::Xml(e.to_string()))?;
                Ok(LegalHoldStatus::from_api_str(
                    parsed.status.as_deref().unwrap_or("OFF"),
                ))
            }
            // No lock configuration on the version means no hold to clear
            Err(StoreError::Api { ref code, .. }) if code == "NoSuchObjectLockConfiguration" => {
                Ok(LegalHoldStatus::Off)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn put_object_legal_hold(
        &self,
        bucket: &BucketName,
        target: &ObjectVersionRef,
        status: LegalHoldStatus,
    ) -> StorageResult<()> {
        let payload = xml::LegalHold {
            status: Some(status.as_str().to_string()),
        };
        let body =
            quick_xml::se::to_string(&payload).map_err(|e| StoreError::Xml(e.to_string()))?;

        let url = format!("{}?legal-hold", self.object_url(bucket, &target.key));
        let request = self
            .http
            .put(&url)
            .query(&[("versionId", target.version_id.as_str())])
            .header("Content-Type", "application/xml")
            .body(body);

        self.execute(request).await?;
        Ok(())
    }

    async fn get_bucket_policy(&self, bucket: &BucketName) -> StorageResult<Option<String>> {
        let url = format!("{}?policy", self.bucket_url(bucket));

        match self.execute(self.http.get(&url)).await {
            Ok(response) => {
                let body = response.text().await.map_err(StoreError::Transport)?;
                Ok(Some(body))
            }
            // 404 is the not-present signal on this endpoint
            Err(StoreError::Api { status: 404, .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn put_bucket_policy(&self, bucket: &BucketName, document: &str) -> StorageResult<()> {
        let url = format!("{}?policy", self.bucket_url(bucket));
        let request = self
            .http
            .put(&url)
            .header("Content-Type", "application/json")
            .body(document.to_string());

        self.execute(request).await?;
        Ok(())
    }

    async fn delete_bucket_policy(&self, bucket: &BucketName) -> StorageResult<()> {
        let url = format!("{}?policy", self.bucket_url(bucket));

        match self.execute(self.http.delete(&url)).await {
            Ok(_) => Ok(()),
            // Deleting an absent policy is already the desired state
            Err(StoreError::Api { status: 404, .. }) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn get_bucket_versioning(&self, bucket: &BucketName) -> StorageResult<VersioningState> {
        let url = format!("{}?versioning", self.bucket_url(bucket));
        let response = self.execute(self.http.get(&url)).await?;
        let body = response.text().await.map_err(StoreError::Transport)?;
        let parsed: xml::VersioningConfiguration =
            quick_xml::de::from_str(&body).map_err(|e| StoreError::Xml(e.to_string()))?;

        Ok(VersioningState::from_api_str(parsed.status.as_deref()))
    }

    async fn put_bucket_versioning(
        &self,
        bucket: &BucketName,
        state: VersioningState,
    ) -> StorageResult<()> {
        let status = match state.as_api_str() {
            Some(status) => status,
            None => {
                return Err(StorageError::ValidationError {
                    message: "Versioning cannot be reset to the unconfigured state".to_string(),
                });
            }
        };

        let payload = xml::VersioningConfiguration {
            status: Some(status.to_string()),
        };
        let body =
            quick_xml::se::to_string(&payload).map_err(|e| StoreError::Xml(e.to_string()))?;

        let url = format!("{}?versioning", self.bucket_url(bucket));
        let request = self
            .http
            .put(&url)
            .header("Content-Type", "application/xml")
            .body(body);

        self.execute(request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_api_error_with_code() {
        let body = r#"<Error><Code>AccessDenied</Code><Message>Access Denied</Message></Error>"#;
        match parse_api_error(403, body) {
            StoreError::Api { status, code, .. } => {
                assert_eq!(status, 403);
                assert_eq!(code, "AccessDenied");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_bare_404_reads_as_missing_bucket() {
        match parse_api_error(404, "") {
            StoreError::Api { code, .. } => assert_eq!(code, "NoSuchBucket"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_api_error_converts_to_domain() {
        let err = StoreError::Api {
            status: 404,
            code: "NoSuchBucket".to_string(),
            message: "The specified bucket does not exist".to_string(),
            resource: Some("missing-bucket".to_string()),
        };
        match StorageError::from(err) {
            StorageError::BucketNotFound { bucket } => assert_eq!(bucket, "missing-bucket"),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
