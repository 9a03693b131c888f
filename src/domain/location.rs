//! Location samples, trails, and the serialized trail record

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::capture::CaptureKind;

/// One position fix, annotated best-effort with a resolved address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSample {
    pub latitude: f64,
    pub longitude: f64,
    /// Fix accuracy in meters
    pub accuracy: f64,
    /// Wall-clock arrival time, milliseconds since the epoch
    pub timestamp_ms: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl LocationSample {
    /// Coordinate string used when reverse geocoding is unavailable
    pub fn coordinate_string(&self) -> String {
        format!("{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// Ordered sequence of samples collected during one session.
/// Insertion order is sampling order; append-only until the snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationTrail {
    samples: Vec<LocationSample>,
}

impl LocationTrail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sample: LocationSample) {
        self.samples.push(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[LocationSample] {
        &self.samples
    }

    /// Serialize the trail into its persisted record shape
    pub fn into_record(self, kind: CaptureKind, device_id: &str, duration_secs: u64) -> LocationRecord {
        let start_time = self
            .samples
            .first()
            .map(|s| rfc3339(s.timestamp_ms))
            .unwrap_or_else(|| rfc3339(Utc::now().timestamp_millis()));
        let end_time = rfc3339(Utc::now().timestamp_millis());

        let record_type = if kind == CaptureKind::Panic {
            "panic_location_recording"
        } else {
            "location_recording"
        };

        LocationRecord {
            record_type: record_type.to_string(),
            device_id: device_id.to_string(),
            duration: duration_secs,
            start_time,
            end_time,
            total_points: self.samples.len(),
            locations: self
                .samples
                .into_iter()
                .map(|s| LocationPoint {
                    timestamp: rfc3339(s.timestamp_ms),
                    latitude: s.latitude,
                    longitude: s.longitude,
                    accuracy: s.accuracy,
                    altitude: s.altitude,
                    heading: s.heading,
                    speed: s.speed,
                    address: s.address,
                })
                .collect(),
        }
    }
}

fn rfc3339(timestamp_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp_ms)
        .unwrap_or_else(Utc::now)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Persisted location deliverable, one per session that tracked position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    #[serde(rename = "type")]
    pub record_type: String,
    pub device_id: String,
    pub duration: u64,
    pub start_time: String,
    pub end_time: String,
    pub total_points: usize,
    pub locations: Vec<LocationPoint>,
}

/// One serialized trail entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationPoint {
    pub timestamp: String,
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(n: i64) -> LocationSample {
        LocationSample {
            latitude: -23.55 + n as f64 * 0.001,
            longitude: -46.63,
            accuracy: 12.0,
            timestamp_ms: 1_700_000_000_000 + n * 1000,
            altitude: None,
            heading: None,
            speed: None,
            address: None,
        }
    }

    #[test]
    fn trail_preserves_arrival_order() {
        let mut trail = LocationTrail::new();
        for n in 0..5 {
            trail.push(sample(n));
        }
        let record = trail.into_record(CaptureKind::Location, "dev-1", 60);
        assert_eq!(record.total_points, 5);
        let timestamps: Vec<_> = record.locations.iter().map(|p| p.timestamp.clone()).collect();
        let mut sorted = timestamps.clone();
        sorted.sort();
        assert_eq!(timestamps, sorted);
    }

    #[test]
    fn panic_trail_uses_panic_record_type() {
        let mut trail = LocationTrail::new();
        trail.push(sample(0));
        let record = trail.into_record(CaptureKind::Panic, "dev-1", 60);
        assert_eq!(record.record_type, "panic_location_recording");
    }

    #[test]
    fn record_json_shape() {
        let mut trail = LocationTrail::new();
        trail.push(LocationSample {
            address: Some("Centro, São Paulo".to_string()),
            ..sample(0)
        });
        let record = trail.into_record(CaptureKind::Location, "dev-1", 30);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["type"], "location_recording");
        assert_eq!(json["device_id"], "dev-1");
        assert_eq!(json["total_points"], 1);
        assert_eq!(json["locations"][0]["address"], "Centro, São Paulo");
        // Absent optional fields are omitted, not null
        assert!(json["locations"][0].get("altitude").is_none());
    }

    #[test]
    fn coordinate_string_format() {
        let s = sample(0);
        assert_eq!(s.coordinate_string(), "-23.550000, -46.630000");
    }
}
