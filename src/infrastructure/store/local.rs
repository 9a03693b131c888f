//! Local filesystem evidence store
//!
//! Keeps one artifact file per evidence record plus an `index.json`
//! with the metadata, under the platform data directory. This is the
//! default backend; nothing leaves the machine.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use tokio::fs;
use uuid::Uuid;

use crate::application::ports::store::EvidenceStore;
use crate::application::ports::StoreError;
use crate::domain::evidence::{
    Deliverable, DeliverablePayload, Evidence, EvidenceContent, SavedEvidence,
};

const INDEX_FILE: &str = "index.json";

/// Evidence store rooted in a local directory
pub struct LocalEvidenceStore {
    root: PathBuf,
}

impl LocalEvidenceStore {
    /// Create a store under the platform data directory
    pub fn new() -> Self {
        let root = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vigil");
        Self { root }
    }

    /// Create with a custom root directory
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }

    async fn read_index(&self) -> Result<Vec<Evidence>, StoreError> {
        let path = self.index_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| StoreError::Io(e.to_string()))
    }

    async fn write_index(&self, index: &[Evidence]) -> Result<(), StoreError> {
        let content =
            serde_json::to_string_pretty(index).map_err(|e| StoreError::Io(e.to_string()))?;
        fs::write(self.index_path(), content)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))
    }

    fn payload_bytes(deliverable: &Deliverable) -> Result<Vec<u8>, StoreError> {
        match &deliverable.payload {
            DeliverablePayload::Media(artifact) => Ok(artifact.bytes.clone()),
            DeliverablePayload::Location(record) => {
                serde_json::to_vec_pretty(record).map_err(|e| StoreError::Io(e.to_string()))
            }
        }
    }

    /// Artifact path from the display name, disambiguated with the id
    /// when two saves land in the same second
    fn artifact_path(&self, id: &str, file_name: &str) -> PathBuf {
        let path = self.root.join(file_name);
        if path.exists() {
            self.root.join(format!("{}_{}", &id[..8], file_name))
        } else {
            path
        }
    }
}

impl Default for LocalEvidenceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EvidenceStore for LocalEvidenceStore {
    async fn save(&self, deliverable: Deliverable) -> Result<SavedEvidence, StoreError> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;

        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now();
        let bytes = Self::payload_bytes(&deliverable)?;

        let checksum = match &deliverable.payload {
            DeliverablePayload::Media(artifact) => Some(artifact.checksum),
            DeliverablePayload::Location(_) => None,
        };

        let mut evidence = Evidence {
            id: id.clone(),
            kind: deliverable.kind,
            created_at,
            duration_secs: deliverable.duration_secs,
            size_bytes: bytes.len() as u64,
            file_path: None,
            checksum,
        };

        let file_name = evidence.file_name(deliverable.extension());
        let path = self.artifact_path(&id, &file_name);
        fs::write(&path, &bytes)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;
        evidence.file_path = Some(path.display().to_string());
        debug!("Stored evidence {id} at {}", path.display());

        let mut index = self.read_index().await?;
        index.insert(0, evidence);
        self.write_index(&index).await?;

        Ok(SavedEvidence { id, created_at })
    }

    async fn list(&self) -> Result<Vec<Evidence>, StoreError> {
        self.read_index().await
    }

    async fn download(&self, id: &str) -> Result<EvidenceContent, StoreError> {
        let index = self.read_index().await?;
        let evidence = index
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let path = evidence
            .file_path
            .as_deref()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let data = fs::read(path)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;

        let file_name = Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| id.to_string());

        Ok(EvidenceContent::Bytes { data, file_name })
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut index = self.read_index().await?;
        let position = index
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let evidence = index.remove(position);
        if let Some(path) = &evidence.file_path {
            // The record is authoritative; a missing file is not an error
            let _ = fs::remove_file(path).await;
        }
        self.write_index(&index).await
    }
}
