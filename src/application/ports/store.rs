//! Evidence store port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::evidence::{Deliverable, Evidence, EvidenceContent, SavedEvidence};

/// Persistence boundary failures.
/// All are non-fatal to the session orchestrator: local teardown still
/// completes and state resets to idle.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Not authenticated with the evidence backend")]
    Unauthenticated,

    #[error("Evidence backend unreachable: {0}")]
    Network(String),

    #[error("Storage quota exceeded")]
    QuotaExceeded,

    #[error("Evidence not found: {0}")]
    NotFound(String),

    #[error("Evidence storage I/O failed: {0}")]
    Io(String),
}

/// Port for the persistence boundary holding captured evidence
#[async_trait]
pub trait EvidenceStore: Send + Sync {
    /// Persist one deliverable, returning its assigned id and timestamp
    async fn save(&self, deliverable: Deliverable) -> Result<SavedEvidence, StoreError>;

    /// List persisted evidence, newest first
    async fn list(&self) -> Result<Vec<Evidence>, StoreError>;

    /// Fetch the content of one evidence record
    async fn download(&self, id: &str) -> Result<EvidenceContent, StoreError>;

    /// Remove one evidence record and its artifact
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}
