//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::time_limit::TimeLimit;

/// Which persistence backend stores evidence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Local,
    Remote,
}

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub device_id: Option<String>,
    pub time_limit: Option<String>,
    pub backend: Option<Backend>,
    pub remote_url: Option<String>,
    pub api_token: Option<String>,
    pub notify: Option<bool>,
    /// Fallback coordinates for machines without a position fix
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub high_accuracy: Option<bool>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            device_id: Some("default-device".to_string()),
            time_limit: Some("60s".to_string()),
            backend: Some(Backend::Local),
            remote_url: None,
            api_token: None,
            notify: Some(false),
            latitude: None,
            longitude: None,
            high_accuracy: Some(true),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            device_id: other.device_id.or(self.device_id),
            time_limit: other.time_limit.or(self.time_limit),
            backend: other.backend.or(self.backend),
            remote_url: other.remote_url.or(self.remote_url),
            api_token: other.api_token.or(self.api_token),
            notify: other.notify.or(self.notify),
            latitude: other.latitude.or(self.latitude),
            longitude: other.longitude.or(self.longitude),
            high_accuracy: other.high_accuracy.or(self.high_accuracy),
        }
    }

    /// Get the device id, or the default label
    pub fn device_id_or_default(&self) -> String {
        self.device_id
            .clone()
            .unwrap_or_else(|| "default-device".to_string())
    }

    /// Get time_limit as parsed TimeLimit, or default if not set/invalid
    pub fn time_limit_or_default(&self) -> TimeLimit {
        self.time_limit
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(TimeLimit::default_limit)
    }

    pub fn backend_or_default(&self) -> Backend {
        self.backend.unwrap_or_default()
    }

    pub fn notify_or_default(&self) -> bool {
        self.notify.unwrap_or(false)
    }

    pub fn high_accuracy_or_default(&self) -> bool {
        self.high_accuracy.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_prefers_other() {
        let base = AppConfig::defaults();
        let override_cfg = AppConfig {
            time_limit: Some("2m".to_string()),
            backend: Some(Backend::Remote),
            ..AppConfig::empty()
        };

        let merged = base.merge(override_cfg);
        assert_eq!(merged.time_limit.as_deref(), Some("2m"));
        assert_eq!(merged.backend, Some(Backend::Remote));
        // Untouched fields keep base values
        assert_eq!(merged.device_id.as_deref(), Some("default-device"));
    }

    #[test]
    fn invalid_time_limit_falls_back_to_default() {
        let config = AppConfig {
            time_limit: Some("bogus".to_string()),
            ..AppConfig::empty()
        };
        assert_eq!(config.time_limit_or_default(), TimeLimit::default_limit());
    }

    #[test]
    fn toml_round_trip() {
        let config = AppConfig {
            device_id: Some("phone-1".to_string()),
            latitude: Some(-23.5505),
            longitude: Some(-46.6333),
            ..AppConfig::empty()
        };
        let text = toml::to_string(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.device_id.as_deref(), Some("phone-1"));
        assert_eq!(parsed.latitude, Some(-23.5505));
    }
}
