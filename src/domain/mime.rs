//! Media container type value object

use std::fmt;

use serde::{Deserialize, Serialize};

/// Container/codec formats a recorder can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MimeType {
    VideoMp4,
    VideoWebm,
    AudioWebmOpus,
    AudioWebm,
    AudioOggOpus,
    AudioMp4,
    AudioWav,
}

/// Ordered audio format preference, first supported wins
pub const AUDIO_PREFERENCES: &[MimeType] = &[
    MimeType::AudioWebmOpus,
    MimeType::AudioWebm,
    MimeType::AudioOggOpus,
    MimeType::AudioMp4,
    MimeType::AudioWav,
];

/// Ordered video format preference, first supported wins
pub const VIDEO_PREFERENCES: &[MimeType] = &[MimeType::VideoMp4, MimeType::VideoWebm];

impl MimeType {
    /// Get the MIME type string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::VideoMp4 => "video/mp4",
            Self::VideoWebm => "video/webm",
            Self::AudioWebmOpus => "audio/webm;codecs=opus",
            Self::AudioWebm => "audio/webm",
            Self::AudioOggOpus => "audio/ogg;codecs=opus",
            Self::AudioMp4 => "audio/mp4",
            Self::AudioWav => "audio/wav",
        }
    }

    /// Get the file extension
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::VideoMp4 | Self::AudioMp4 => "mp4",
            Self::VideoWebm | Self::AudioWebmOpus | Self::AudioWebm => "webm",
            Self::AudioOggOpus => "ogg",
            Self::AudioWav => "wav",
        }
    }

    /// Whether this format carries video
    pub const fn is_video(&self) -> bool {
        matches!(self, Self::VideoMp4 | Self::VideoWebm)
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
