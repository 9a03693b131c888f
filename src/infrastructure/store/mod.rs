//! Evidence store infrastructure module

mod http;
mod local;

pub use http::HttpEvidenceStore;
pub use local::LocalEvidenceStore;
