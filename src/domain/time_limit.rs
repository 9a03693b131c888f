//! Time limit value object

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use crate::domain::error::TimeLimitParseError;

/// Default session time limit (60 seconds)
pub const DEFAULT_TIME_LIMIT_SECS: u64 = 60;

/// Longest allowed session (1 hour)
pub const MAX_TIME_LIMIT_SECS: u64 = 3600;

/// Value object bounding how long a capture session runs.
/// Always positive; sessions cannot be stopped before it elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeLimit {
    seconds: u64,
}

impl TimeLimit {
    /// Create a TimeLimit from whole seconds, clamped to the allowed range
    pub fn from_secs(secs: u64) -> Self {
        Self {
            seconds: secs.clamp(1, MAX_TIME_LIMIT_SECS),
        }
    }

    /// Default time limit for all session kinds
    pub const fn default_limit() -> Self {
        Self {
            seconds: DEFAULT_TIME_LIMIT_SECS,
        }
    }

    /// Get the limit in seconds
    pub const fn as_secs(&self) -> u64 {
        self.seconds
    }

    /// Get the limit in milliseconds
    pub const fn as_millis(&self) -> u64 {
        self.seconds * 1000
    }

    /// Convert to std::time::Duration
    pub const fn as_std(&self) -> StdDuration {
        StdDuration::from_secs(self.seconds)
    }
}

impl Default for TimeLimit {
    fn default() -> Self {
        Self::default_limit()
    }
}

impl FromStr for TimeLimit {
    type Err = TimeLimitParseError;

    /// Parse a time limit string.
    /// Supported formats: "30s", "1m", "2m30s", "90s"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_lowercase();

        let mut minutes: u64 = 0;
        let mut seconds: u64 = 0;
        let mut current_num = String::new();
        let mut found_any = false;

        for ch in input.chars() {
            if ch.is_ascii_digit() {
                current_num.push(ch);
            } else if ch == 'm' && !current_num.is_empty() {
                minutes = current_num.parse().map_err(|_| TimeLimitParseError {
                    input: s.to_string(),
                })?;
                current_num.clear();
                found_any = true;
            } else if ch == 's' && !current_num.is_empty() {
                seconds = current_num.parse().map_err(|_| TimeLimitParseError {
                    input: s.to_string(),
                })?;
                current_num.clear();
                found_any = true;
            } else {
                return Err(TimeLimitParseError {
                    input: s.to_string(),
                });
            }
        }

        // A bare number counts as seconds
        if !current_num.is_empty() {
            seconds = current_num.parse().map_err(|_| TimeLimitParseError {
                input: s.to_string(),
            })?;
            found_any = true;
        }

        let total = minutes * 60 + seconds;
        if !found_any || total == 0 || total > MAX_TIME_LIMIT_SECS {
            return Err(TimeLimitParseError {
                input: s.to_string(),
            });
        }

        Ok(Self { seconds: total })
    }
}

impl fmt::Display for TimeLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minutes = self.seconds / 60;
        let seconds = self.seconds % 60;
        match (minutes, seconds) {
            (0, s) => write!(f, "{}s", s),
            (m, 0) => write!(f, "{}m", m),
            (m, s) => write!(f, "{}m{}s", m, s),
        }
    }
}
