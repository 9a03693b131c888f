//! Reverse geocoding infrastructure module

mod bigdatacloud;

pub use bigdatacloud::BigDataCloudGeocoder;
