//! Location trail collector
//!
//! Runs a position watch in a background task, annotating each fix
//! with a best-effort reverse-geocoded address and appending it to an
//! ordered trail. Transient fix errors are logged and never stop the
//! watch.

use std::sync::{Arc, Mutex as StdMutex};

use chrono::Utc;
use log::warn;
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;

use crate::application::ports::{
    FixError, LocationSource, PositionFix, ReverseGeocoder, WatchOptions,
};
use crate::domain::location::{LocationSample, LocationTrail};

struct Inner {
    watch_task: Option<JoinHandle<()>>,
    snapshot: Option<LocationTrail>,
}

/// One active position watch feeding a trail.
///
/// `stop` is idempotent: the first call clears the watch and snapshots
/// the trail; later calls return the same snapshot.
pub struct LocationTracker {
    trail: Arc<StdMutex<LocationTrail>>,
    stop_signal: Arc<Notify>,
    inner: Mutex<Inner>,
}

impl LocationTracker {
    /// Begin watching. Fails only if the watch itself cannot start;
    /// individual bad fixes afterwards are tolerated.
    pub async fn start(
        source: &dyn LocationSource,
        geocoder: Option<Arc<dyn ReverseGeocoder>>,
        options: WatchOptions,
    ) -> Result<Self, FixError> {
        let mut watch = source.watch(options).await?;

        let trail: Arc<StdMutex<LocationTrail>> = Arc::new(StdMutex::new(LocationTrail::new()));
        let stop_signal = Arc::new(Notify::new());

        let task_trail = Arc::clone(&trail);
        let task_stop = Arc::clone(&stop_signal);
        let watch_task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = task_stop.notified() => break,
                    fix = watch.next_fix() => match fix {
                        Some(Ok(fix)) => {
                            let sample = annotate(fix, geocoder.as_deref()).await;
                            task_trail.lock().unwrap().push(sample);
                        }
                        Some(Err(err)) => warn!("Location fix failed, still watching: {err}"),
                        None => break,
                    },
                }
            }
            watch.clear();
        });

        Ok(Self {
            trail,
            stop_signal,
            inner: Mutex::new(Inner {
                watch_task: Some(watch_task),
                snapshot: None,
            }),
        })
    }

    /// Samples collected so far
    pub fn point_count(&self) -> usize {
        self.trail.lock().unwrap().len()
    }

    /// Stop watching and return the collected trail
    pub async fn stop(&self) -> LocationTrail {
        let mut inner = self.inner.lock().await;
        if let Some(snapshot) = &inner.snapshot {
            return snapshot.clone();
        }

        self.stop_signal.notify_one();
        if let Some(task) = inner.watch_task.take() {
            let _ = task.await;
        }

        let snapshot = self.trail.lock().unwrap().clone();
        inner.snapshot = Some(snapshot.clone());
        snapshot
    }
}

/// Turn a raw fix into a trail sample, resolving the address when a
/// geocoder is available and falling back to the coordinate string.
async fn annotate(fix: PositionFix, geocoder: Option<&dyn ReverseGeocoder>) -> LocationSample {
    let mut sample = LocationSample {
        latitude: fix.latitude,
        longitude: fix.longitude,
        accuracy: fix.accuracy,
        timestamp_ms: Utc::now().timestamp_millis(),
        altitude: fix.altitude,
        heading: fix.heading,
        speed: fix.speed,
        address: None,
    };

    sample.address = Some(match geocoder {
        Some(geocoder) => match geocoder.resolve(fix.latitude, fix.longitude).await {
            Ok(address) => address,
            Err(err) => {
                warn!("Reverse geocoding failed: {err}");
                sample.coordinate_string()
            }
        },
        None => sample.coordinate_string(),
    });

    sample
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::application::test_support::{fix_at, MockGeocoder, MockLocationSource};

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn collects_fixes_in_order() {
        let source = MockLocationSource::with_fixes(3);
        let tracker = LocationTracker::start(&source, None, WatchOptions::default())
            .await
            .unwrap();
        settle().await;

        let trail = tracker.stop().await;
        assert_eq!(trail.len(), 3);
        let latitudes: Vec<f64> = trail.samples().iter().map(|s| s.latitude).collect();
        assert_eq!(
            latitudes,
            vec![fix_at(0.0).latitude, fix_at(1.0).latitude, fix_at(2.0).latitude]
        );
    }

    #[tokio::test]
    async fn watch_failure_propagates() {
        let source = MockLocationSource {
            fixes: Vec::new(),
            watch_fails: Some(FixError::PermissionRevoked),
        };
        let result = LocationTracker::start(&source, None, WatchOptions::default()).await;
        assert!(matches!(result.err(), Some(FixError::PermissionRevoked)));
    }

    #[tokio::test]
    async fn transient_fix_errors_are_skipped() {
        let source = MockLocationSource {
            fixes: vec![
                Ok(fix_at(0.0)),
                Err(FixError::Timeout),
                Ok(fix_at(1.0)),
            ],
            watch_fails: None,
        };

        let tracker = LocationTracker::start(&source, None, WatchOptions::default())
            .await
            .unwrap();
        settle().await;

        let trail = tracker.stop().await;
        assert_eq!(trail.len(), 2);
    }

    #[tokio::test]
    async fn geocoded_addresses_annotate_samples() {
        let source = MockLocationSource::with_fixes(1);
        let geocoder: Arc<dyn ReverseGeocoder> =
            Arc::new(MockGeocoder::resolving("Av. Paulista, 1578"));

        let tracker = LocationTracker::start(&source, Some(geocoder), WatchOptions::default())
            .await
            .unwrap();
        settle().await;

        let trail = tracker.stop().await;
        assert_eq!(
            trail.samples()[0].address.as_deref(),
            Some("Av. Paulista, 1578")
        );
    }

    #[tokio::test]
    async fn geocode_failure_degrades_to_coordinates() {
        let source = MockLocationSource::with_fixes(1);
        let geocoder: Arc<dyn ReverseGeocoder> = Arc::new(MockGeocoder::failing());

        let tracker = LocationTracker::start(&source, Some(geocoder), WatchOptions::default())
            .await
            .unwrap();
        settle().await;

        let trail = tracker.stop().await;
        let sample = &trail.samples()[0];
        assert_eq!(sample.address.as_deref(), Some(sample.coordinate_string().as_str()));
    }

    #[tokio::test]
    async fn stop_is_idempotent() {
        let source = MockLocationSource::with_fixes(2);
        let tracker = LocationTracker::start(&source, None, WatchOptions::default())
            .await
            .unwrap();
        settle().await;

        let first = tracker.stop().await;
        let second = tracker.stop().await;
        assert_eq!(first, second);
    }
}
