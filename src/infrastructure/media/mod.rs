//! Media capture infrastructure module
//!
//! Desktop capture is microphone-only; camera capabilities come from
//! platform adapters that are not part of this build.

mod cpal_source;

pub use cpal_source::CpalMediaSource;
