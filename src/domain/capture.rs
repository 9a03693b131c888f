//! Capture request value objects

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::InvalidCaptureKindError;
use crate::domain::time_limit::TimeLimit;

/// What a session captures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureKind {
    Video,
    Audio,
    Location,
    Panic,
}

impl CaptureKind {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Location => "location",
            Self::Panic => "panic",
        }
    }

    /// Capability set this kind activates.
    /// Panic turns everything on; individual kinds map one-to-one.
    pub const fn capabilities(&self) -> CapabilitySet {
        match self {
            Self::Panic => CapabilitySet {
                camera: true,
                audio: true,
                location: true,
            },
            Self::Video => CapabilitySet {
                camera: true,
                audio: false,
                location: false,
            },
            Self::Audio => CapabilitySet {
                camera: false,
                audio: true,
                location: false,
            },
            Self::Location => CapabilitySet {
                camera: false,
                audio: false,
                location: true,
            },
        }
    }
}

impl fmt::Display for CaptureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CaptureKind {
    type Err = InvalidCaptureKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "video" => Ok(Self::Video),
            "audio" => Ok(Self::Audio),
            "location" => Ok(Self::Location),
            "panic" => Ok(Self::Panic),
            _ => Err(InvalidCaptureKindError {
                input: s.to_string(),
            }),
        }
    }
}

/// Which device capabilities a session holds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySet {
    pub camera: bool,
    pub audio: bool,
    pub location: bool,
}

impl CapabilitySet {
    /// A set with nothing active
    pub const fn none() -> Self {
        Self {
            camera: false,
            audio: false,
            location: false,
        }
    }

    /// Whether any capability is active
    pub const fn any(&self) -> bool {
        self.camera || self.audio || self.location
    }
}

/// Immutable description of one requested capture session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureRequest {
    pub kind: CaptureKind,
    pub time_limit: TimeLimit,
}

impl CaptureRequest {
    pub fn new(kind: CaptureKind, time_limit: TimeLimit) -> Self {
        Self { kind, time_limit }
    }

    /// Capability set this request activates
    pub const fn capabilities(&self) -> CapabilitySet {
        self.kind.capabilities()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_activates_everything() {
        let caps = CaptureKind::Panic.capabilities();
        assert!(caps.camera && caps.audio && caps.location);
    }

    #[test]
    fn individual_kinds_map_one_to_one() {
        assert_eq!(
            CaptureKind::Video.capabilities(),
            CapabilitySet {
                camera: true,
                audio: false,
                location: false
            }
        );
        assert_eq!(
            CaptureKind::Audio.capabilities(),
            CapabilitySet {
                camera: false,
                audio: true,
                location: false
            }
        );
        assert_eq!(
            CaptureKind::Location.capabilities(),
            CapabilitySet {
                camera: false,
                audio: false,
                location: true
            }
        );
    }

    #[test]
    fn kind_parse_round_trip() {
        for kind in [
            CaptureKind::Video,
            CaptureKind::Audio,
            CaptureKind::Location,
            CaptureKind::Panic,
        ] {
            assert_eq!(kind.as_str().parse::<CaptureKind>().unwrap(), kind);
        }
        assert!("screen".parse::<CaptureKind>().is_err());
    }
}
