//! Media source port interfaces

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::mime::MimeType;

/// Device acquisition failures, per capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AcquireError {
    #[error("Permission denied by the platform")]
    PermissionDenied,

    #[error("No matching device found")]
    NotFound,

    #[error("Device is busy in another application")]
    DeviceBusy,

    #[error("Requested capture is not supported on this device")]
    Unsupported,
}

/// Camera orientation preference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraFacing {
    Rear,
    Front,
    /// Whatever camera the platform can provide
    Any,
}

/// What to open, mirroring a getUserMedia constraint set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConstraints {
    pub audio: bool,
    pub video: Option<CameraFacing>,
}

impl StreamConstraints {
    pub const fn microphone() -> Self {
        Self {
            audio: true,
            video: None,
        }
    }

    pub const fn camera(facing: CameraFacing) -> Self {
        Self {
            audio: false,
            video: Some(facing),
        }
    }
}

/// What tracks a live stream carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    AudioOnly,
    VideoOnly,
    VideoWithAudio,
}

/// One live device stream.
/// Exclusively owned by its holder; tracks stay open until `stop_tracks`.
#[async_trait]
pub trait MediaStream: Send {
    /// Which tracks this stream carries
    fn kind(&self) -> StreamKind;

    /// Whether the platform can encode this stream into the given format
    fn supports(&self, mime: MimeType) -> bool;

    /// Await the next encoded chunk.
    /// Returns None once the stream has ended or its tracks were stopped.
    async fn next_chunk(&mut self) -> Option<Vec<u8>>;

    /// Stop all underlying tracks. Idempotent; a second call is a no-op.
    fn stop_tracks(&mut self);

    /// Whether the tracks are still open
    fn is_live(&self) -> bool;
}

/// Port for opening device capture streams
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Open a stream satisfying the constraints, or fail with a typed reason.
    /// On success the stream stays open, owned by the caller; the source
    /// performs no implicit cleanup.
    async fn open(
        &self,
        constraints: StreamConstraints,
    ) -> Result<Box<dyn MediaStream>, AcquireError>;

    /// Combine a video stream and an audio stream into one video+audio
    /// stream. The combined stream owns both inputs; stopping its tracks
    /// stops them all. On failure both inputs are released.
    fn combine(
        &self,
        video: Box<dyn MediaStream>,
        audio: Box<dyn MediaStream>,
    ) -> Result<Box<dyn MediaStream>, AcquireError>;
}
