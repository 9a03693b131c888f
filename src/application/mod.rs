//! Application layer: session use cases behind port boundaries

pub mod acquirer;
pub mod orchestrator;
pub mod ports;
pub mod recorder;
pub mod state_store;
pub mod tracker;

#[cfg(test)]
pub mod test_support;

pub use acquirer::{acquire_media, AcquiredMedia};
pub use orchestrator::{
    SessionError, SessionHandle, SessionOrchestrator, SessionOutcome, StopError,
};
pub use recorder::{RecorderError, RecorderPhase, SessionRecorder};
pub use state_store::{ObserverId, RecordingStateStore};
pub use tracker::LocationTracker;
