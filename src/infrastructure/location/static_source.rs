//! Fixed-coordinate location source
//!
//! Adapter for machines without a GPS fix: emits the configured
//! coordinates at a steady interval so location-backed sessions still
//! produce a trail. The reported accuracy wobbles slightly per fix so
//! trails remain distinguishable from a single repeated point.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use crate::application::ports::{
    FixError, LocationSource, LocationWatch, PositionFix, WatchOptions,
};

const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Location source pinned to one configured coordinate
pub struct StaticLocationSource {
    latitude: f64,
    longitude: f64,
    interval: Duration,
}

impl StaticLocationSource {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            interval: DEFAULT_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

#[async_trait]
impl LocationSource for StaticLocationSource {
    async fn watch(&self, options: WatchOptions) -> Result<Box<dyn LocationWatch>, FixError> {
        Ok(Box::new(StaticWatch {
            latitude: self.latitude,
            longitude: self.longitude,
            base_accuracy: if options.high_accuracy { 10.0 } else { 50.0 },
            interval: self.interval,
            emitted: 0,
            cleared: false,
        }))
    }
}

struct StaticWatch {
    latitude: f64,
    longitude: f64,
    base_accuracy: f64,
    interval: Duration,
    emitted: u32,
    cleared: bool,
}

#[async_trait]
impl LocationWatch for StaticWatch {
    async fn next_fix(&mut self) -> Option<Result<PositionFix, FixError>> {
        if self.cleared {
            return None;
        }
        // First fix is immediate so short sessions still get a point
        if self.emitted > 0 {
            sleep(self.interval).await;
        }
        if self.cleared {
            return None;
        }

        let wobble = f64::from(self.emitted % 5);
        self.emitted += 1;
        Some(Ok(PositionFix {
            latitude: self.latitude,
            longitude: self.longitude,
            accuracy: self.base_accuracy + wobble,
            altitude: None,
            heading: None,
            speed: None,
        }))
    }

    fn clear(&mut self) {
        self.cleared = true;
    }
}
