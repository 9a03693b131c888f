//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod config;
pub mod geocoder;
pub mod location;
pub mod media;
pub mod notifier;
pub mod store;

// Re-export common types
pub use config::ConfigStore;
pub use geocoder::{GeocodeError, ReverseGeocoder};
pub use location::{FixError, LocationSource, LocationWatch, PositionFix, WatchOptions};
pub use media::{
    AcquireError, CameraFacing, MediaSource, MediaStream, StreamConstraints, StreamKind,
};
pub use notifier::{NotificationError, Notifier, NotifyLevel};
pub use store::{EvidenceStore, StoreError};
