//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod capture;
pub mod config;
pub mod error;
pub mod evidence;
pub mod location;
pub mod mime;
pub mod state;
pub mod time_limit;

// Re-export common types
pub use capture::{CapabilitySet, CaptureKind, CaptureRequest};
pub use config::{AppConfig, Backend};
pub use error::*;
pub use evidence::{
    Deliverable, DeliverablePayload, Evidence, EvidenceContent, MediaArtifact, SavedEvidence,
};
pub use location::{LocationRecord, LocationSample, LocationTrail};
pub use mime::{MimeType, AUDIO_PREFERENCES, VIDEO_PREFERENCES};
pub use state::{SessionState, StatePatch};
pub use time_limit::TimeLimit;
