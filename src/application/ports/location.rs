//! Location source port interfaces

use async_trait::async_trait;
use thiserror::Error;

/// A single transient sampling failure.
/// These never stop tracking; the tracker logs and keeps waiting.
#[derive(Debug, Clone, Error)]
pub enum FixError {
    #[error("Position fix timed out")]
    Timeout,

    #[error("Location permission revoked")]
    PermissionRevoked,

    #[error("Position unavailable: {0}")]
    Unavailable(String),
}

/// Continuous sampling options, mirroring the platform watch API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchOptions {
    pub high_accuracy: bool,
    /// How long to wait for a single fix before reporting a timeout
    pub timeout_ms: u64,
    /// Oldest cached fix the platform may return
    pub max_age_ms: u64,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout_ms: 10_000,
            max_age_ms: 60_000,
        }
    }
}

/// One raw position fix from the platform
#[derive(Debug, Clone, PartialEq)]
pub struct PositionFix {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: f64,
    pub altitude: Option<f64>,
    pub heading: Option<f64>,
    pub speed: Option<f64>,
}

/// An active position watch.
/// Fixes arrive until `clear` is called or the source shuts down.
#[async_trait]
pub trait LocationWatch: Send {
    /// Await the next fix or transient failure.
    /// Returns None once the watch has been cleared.
    async fn next_fix(&mut self) -> Option<Result<PositionFix, FixError>>;

    /// Stop sampling. Idempotent.
    fn clear(&mut self);
}

/// Port for continuous device position sampling
#[async_trait]
pub trait LocationSource: Send + Sync {
    /// Begin a continuous watch with the given options
    async fn watch(&self, options: WatchOptions) -> Result<Box<dyn LocationWatch>, FixError>;
}
