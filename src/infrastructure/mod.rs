//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with the microphone, the desktop, the geocoding API,
//! and the evidence backends.

pub mod config;
pub mod geocode;
pub mod location;
pub mod media;
pub mod notification;
pub mod store;

// Re-export adapters
pub use config::XdgConfigStore;
pub use geocode::BigDataCloudGeocoder;
pub use location::StaticLocationSource;
pub use media::CpalMediaSource;
pub use notification::{create_notifier, NoopNotifier, NotifyRustNotifier};
pub use store::{HttpEvidenceStore, LocalEvidenceStore};
