//! BigDataCloud reverse geocoder adapter

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::application::ports::{GeocodeError, ReverseGeocoder};

/// BigDataCloud client endpoint, usable without an API key
const API_BASE_URL: &str = "https://api.bigdatacloud.net/data/reverse-geocode-client";

/// Locality language requested from the API
const LOCALITY_LANGUAGE: &str = "pt";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// Response types for the reverse-geocode-client API

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReverseGeocodeResponse {
    locality_info: Option<LocalityInfo>,
}

#[derive(Debug, Deserialize)]
struct LocalityInfo {
    administrative: Option<Vec<AdministrativeArea>>,
}

#[derive(Debug, Deserialize)]
struct AdministrativeArea {
    name: Option<String>,
}

/// Reverse geocoder backed by the BigDataCloud client API
pub struct BigDataCloudGeocoder {
    base_url: String,
    client: reqwest::Client,
}

impl BigDataCloudGeocoder {
    pub fn new() -> Self {
        Self::with_base_url(API_BASE_URL)
    }

    /// Create with a custom base URL (used by tests)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self, latitude: f64, longitude: f64) -> String {
        format!(
            "{}?latitude={}&longitude={}&localityLanguage={}",
            self.base_url, latitude, longitude, LOCALITY_LANGUAGE
        )
    }

    /// Join the first three administrative area names into one address
    fn extract_address(response: &ReverseGeocodeResponse) -> Option<String> {
        let areas = response.locality_info.as_ref()?.administrative.as_ref()?;
        let address = areas
            .iter()
            .take(3)
            .filter_map(|area| area.name.as_deref())
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string();

        if address.is_empty() {
            None
        } else {
            Some(address)
        }
    }
}

impl Default for BigDataCloudGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReverseGeocoder for BigDataCloudGeocoder {
    async fn resolve(&self, latitude: f64, longitude: f64) -> Result<String, GeocodeError> {
        let response = self
            .client
            .get(self.api_url(latitude, longitude))
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeocodeError::Timeout
                } else {
                    GeocodeError::RequestFailed(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(GeocodeError::RequestFailed(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let body: ReverseGeocodeResponse = response
            .json()
            .await
            .map_err(|e| GeocodeError::RequestFailed(e.to_string()))?;

        Self::extract_address(&body).ok_or(GeocodeError::NoAddress)
    }
}
