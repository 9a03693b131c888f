//! Evidence records and session deliverables

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::capture::CaptureKind;
use crate::domain::location::LocationRecord;
use crate::domain::mime::MimeType;

/// Finalized media output of one recorder session
#[derive(Debug, Clone, PartialEq)]
pub struct MediaArtifact {
    pub mime_type: MimeType,
    pub bytes: Vec<u8>,
    /// CRC32 of the artifact bytes
    pub checksum: u32,
    pub duration_secs: u64,
}

impl MediaArtifact {
    pub fn new(mime_type: MimeType, bytes: Vec<u8>, duration_secs: u64) -> Self {
        let checksum = crc32fast::hash(&bytes);
        Self {
            mime_type,
            bytes,
            checksum,
            duration_secs,
        }
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Payload handed to the persistence boundary
#[derive(Debug, Clone, PartialEq)]
pub enum DeliverablePayload {
    Media(MediaArtifact),
    Location(LocationRecord),
}

/// One unit of evidence handed to the store, exactly once per session
#[derive(Debug, Clone, PartialEq)]
pub struct Deliverable {
    pub kind: CaptureKind,
    pub device_id: String,
    pub duration_secs: u64,
    pub payload: DeliverablePayload,
}

impl Deliverable {
    /// Size of the payload in bytes (location records measure their JSON)
    pub fn size_bytes(&self) -> u64 {
        match &self.payload {
            DeliverablePayload::Media(artifact) => artifact.size_bytes(),
            DeliverablePayload::Location(record) => serde_json::to_vec(record)
                .map(|v| v.len() as u64)
                .unwrap_or(0),
        }
    }

    /// File extension for the stored artifact
    pub fn extension(&self) -> &'static str {
        match &self.payload {
            DeliverablePayload::Media(artifact) => artifact.mime_type.extension(),
            DeliverablePayload::Location(_) => "json",
        }
    }
}

/// Acknowledgment from the persistence boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedEvidence {
    pub id: String,
    pub created_at: DateTime<Utc>,
}

/// Persisted evidence record as returned by listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub id: String,
    pub kind: CaptureKind,
    pub created_at: DateTime<Utc>,
    pub duration_secs: u64,
    pub size_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<u32>,
}

impl Evidence {
    /// Display label like "Video_2024-05-01_14-30-00.webm"
    pub fn file_name(&self, extension: &str) -> String {
        let type_label = match self.kind {
            CaptureKind::Video => "Video",
            CaptureKind::Audio => "Audio",
            CaptureKind::Location => "Localizacao",
            CaptureKind::Panic => "Panico",
        };
        format!(
            "{}_{}.{}",
            type_label,
            self.created_at.format("%Y-%m-%d_%H-%M-%S"),
            extension
        )
    }
}

/// Raw evidence content returned by a download
#[derive(Debug, Clone, PartialEq)]
pub enum EvidenceContent {
    /// Stored bytes plus a suggested file name
    Bytes { data: Vec<u8>, file_name: String },
    /// Time-limited access URL minted by the backend
    Url(String),
}
