//! Remote evidence store adapter
//!
//! Talks to the evidence backend over its REST surface: metadata is
//! registered first, then the artifact bytes are uploaded against the
//! assigned id. Downloads hand back a time-limited URL minted by the
//! backend rather than the bytes themselves.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::application::ports::store::EvidenceStore;
use crate::application::ports::StoreError;
use crate::domain::capture::CaptureKind;
use crate::domain::evidence::{
    Deliverable, DeliverablePayload, Evidence, EvidenceContent, SavedEvidence,
};

#[derive(Debug, Serialize)]
struct CreateRecordingRequest {
    kind: CaptureKind,
    device_id: String,
    duration_secs: u64,
    size_bytes: u64,
    content_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    checksum: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct DownloadResponse {
    url: String,
}

/// Evidence store backed by the remote recordings API
pub struct HttpEvidenceStore {
    base_url: String,
    api_token: String,
    client: reqwest::Client,
}

impl HttpEvidenceStore {
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            api_token: api_token.into(),
            client: reqwest::Client::new(),
        }
    }

    fn recordings_url(&self) -> String {
        format!("{}/recordings", self.base_url)
    }

    fn recording_url(&self, id: &str) -> String {
        format!("{}/recordings/{}", self.base_url, id)
    }

    fn map_status(status: StatusCode, id: Option<&str>) -> StoreError {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StoreError::Unauthenticated,
            StatusCode::PAYLOAD_TOO_LARGE | StatusCode::INSUFFICIENT_STORAGE => {
                StoreError::QuotaExceeded
            }
            StatusCode::NOT_FOUND => StoreError::NotFound(id.unwrap_or("?").to_string()),
            other => StoreError::Network(format!("HTTP {other}")),
        }
    }

    fn map_transport(error: reqwest::Error) -> StoreError {
        StoreError::Network(error.to_string())
    }

    /// Reject non-success responses, keeping the success body
    fn check(
        response: reqwest::Response,
        id: Option<&str>,
    ) -> Result<reqwest::Response, StoreError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(Self::map_status(response.status(), id))
        }
    }
}

#[async_trait]
impl EvidenceStore for HttpEvidenceStore {
    async fn save(&self, deliverable: Deliverable) -> Result<SavedEvidence, StoreError> {
        let (bytes, content_type, checksum) = match &deliverable.payload {
            DeliverablePayload::Media(artifact) => (
                artifact.bytes.clone(),
                artifact.mime_type.as_str().to_string(),
                Some(artifact.checksum),
            ),
            DeliverablePayload::Location(record) => (
                serde_json::to_vec(record).map_err(|e| StoreError::Io(e.to_string()))?,
                "application/json".to_string(),
                None,
            ),
        };

        let metadata = CreateRecordingRequest {
            kind: deliverable.kind,
            device_id: deliverable.device_id.clone(),
            duration_secs: deliverable.duration_secs,
            size_bytes: bytes.len() as u64,
            content_type: content_type.clone(),
            checksum,
        };

        let response = self
            .client
            .post(self.recordings_url())
            .bearer_auth(&self.api_token)
            .json(&metadata)
            .send()
            .await
            .map_err(Self::map_transport)?;
        let saved: SavedEvidence = Self::check(response, None)?
            .json()
            .await
            .map_err(Self::map_transport)?;

        let upload = self
            .client
            .put(format!("{}/file", self.recording_url(&saved.id)))
            .bearer_auth(&self.api_token)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(Self::map_transport)?;
        Self::check(upload, Some(&saved.id))?;

        Ok(saved)
    }

    async fn list(&self) -> Result<Vec<Evidence>, StoreError> {
        let response = self
            .client
            .get(self.recordings_url())
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(Self::map_transport)?;
        Self::check(response, None)?
            .json()
            .await
            .map_err(Self::map_transport)
    }

    async fn download(&self, id: &str) -> Result<EvidenceContent, StoreError> {
        let response = self
            .client
            .get(format!("{}/download", self.recording_url(id)))
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(Self::map_transport)?;
        let body: DownloadResponse = Self::check(response, Some(id))?
            .json()
            .await
            .map_err(Self::map_transport)?;
        Ok(EvidenceContent::Url(body.url))
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let response = self
            .client
            .delete(self.recording_url(id))
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(Self::map_transport)?;
        Self::check(response, Some(id)).map(|_| ())
    }
}
