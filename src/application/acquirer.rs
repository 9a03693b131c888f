//! Device capability acquisition
//!
//! Opens the device streams a capture request needs, with per-capability
//! fallbacks. Streams returned here are owned by the caller until released.

use log::warn;

use crate::application::ports::{
    AcquireError, CameraFacing, MediaSource, MediaStream, StreamConstraints,
};
use crate::domain::capture::CapabilitySet;

/// Outcome of acquiring the media capabilities of one session.
/// Every stream in here is open and must be released by the holder.
pub struct AcquiredMedia {
    /// The stream the session recorder will consume, if any media
    /// capability was requested and could be opened
    pub recording: Option<Box<dyn MediaStream>>,
    /// Streams acquired but not recorded (e.g. the second camera of a
    /// dual-camera setup); released together with the session
    pub auxiliary: Vec<Box<dyn MediaStream>>,
    /// Why the camera capability is absent, when it was requested
    pub camera_unavailable: Option<AcquireError>,
}

impl AcquiredMedia {
    fn empty() -> Self {
        Self {
            recording: None,
            auxiliary: Vec::new(),
            camera_unavailable: None,
        }
    }

    /// Stop every track this acquisition holds
    pub fn release_all(&mut self) {
        if let Some(stream) = self.recording.as_mut() {
            stream.stop_tracks();
        }
        for stream in &mut self.auxiliary {
            stream.stop_tracks();
        }
    }
}

/// Acquire the device streams for a capability set.
///
/// Microphone access comes first when audio is required and fails fast;
/// rear and front cameras are requested concurrently and fail
/// independently, with a single any-camera retry when the preferred
/// facing is unavailable. On a hard failure everything acquired so far
/// is released before the error is returned.
pub async fn acquire_media(
    source: &dyn MediaSource,
    capabilities: CapabilitySet,
    preferred_facing: CameraFacing,
) -> Result<AcquiredMedia, AcquireError> {
    let mut acquired = AcquiredMedia::empty();

    if !capabilities.audio && !capabilities.camera {
        return Ok(acquired);
    }

    // Audio-dependent sessions cannot proceed without the microphone
    let mut microphone = if capabilities.audio {
        Some(source.open(StreamConstraints::microphone()).await?)
    } else {
        None
    };

    if capabilities.camera {
        let (rear, front) = tokio::join!(
            source.open(StreamConstraints::camera(CameraFacing::Rear)),
            source.open(StreamConstraints::camera(CameraFacing::Front)),
        );

        let (preferred, other) = match preferred_facing {
            CameraFacing::Front => (front, rear),
            _ => (rear, front),
        };

        let camera = match preferred {
            Ok(stream) => Ok(stream),
            Err(err) => {
                warn!("preferred camera unavailable ({err}), retrying with any camera");
                source.open(StreamConstraints::camera(CameraFacing::Any)).await
            }
        };

        if let Ok(stream) = other {
            acquired.auxiliary.push(stream);
        }

        match (camera, microphone.take()) {
            (Ok(camera), Some(mic)) => match source.combine(camera, mic) {
                Ok(combined) => acquired.recording = Some(combined),
                Err(err) => {
                    // Camera stream was consumed by the failed combine;
                    // reopen the microphone and record audio-only
                    warn!("combining camera and microphone failed ({err}), recording audio only");
                    match source.open(StreamConstraints::microphone()).await {
                        Ok(mic) => acquired.recording = Some(mic),
                        Err(err) => {
                            acquired.release_all();
                            return Err(err);
                        }
                    }
                    acquired.camera_unavailable = Some(err);
                }
            },
            (Ok(camera), None) => acquired.recording = Some(camera),
            (Err(err), Some(mic)) => {
                // Dual-capability session degrades to audio-only recording
                warn!("camera unavailable ({err}), session degrades to audio only");
                acquired.recording = Some(mic);
                acquired.camera_unavailable = Some(err);
            }
            (Err(err), None) => {
                acquired.release_all();
                return Err(err);
            }
        }
    } else {
        acquired.recording = microphone;
    }

    Ok(acquired)
}
