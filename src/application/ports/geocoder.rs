//! Reverse geocoding port interface

use async_trait::async_trait;
use thiserror::Error;

/// Reverse geocoding errors
#[derive(Debug, Clone, Error)]
pub enum GeocodeError {
    #[error("Geocoding request timed out")]
    Timeout,

    #[error("Geocoding request failed: {0}")]
    RequestFailed(String),

    #[error("No address found for coordinates")]
    NoAddress,
}

/// Port for resolving coordinates to a human-readable address.
/// Best effort and timeout-bounded; callers degrade to a coordinate
/// string on any failure.
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn resolve(&self, latitude: f64, longitude: f64) -> Result<String, GeocodeError>;
}
