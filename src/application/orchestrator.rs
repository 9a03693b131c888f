//! Session orchestrator
//!
//! Owns the whole lifecycle of a capture session: guards the
//! single-active invariant, acquires device capabilities, starts the
//! recorder and location tracker, arms the auto-stop timer, and tears
//! everything down exactly once. Collaborators are injected through the
//! port traits, so the orchestrator never touches hardware, network, or
//! the desktop directly.

use std::sync::Arc;
use std::time::Instant;

use log::{info, warn};
use thiserror::Error;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;

use crate::application::acquirer::{acquire_media, AcquiredMedia};
use crate::application::ports::{
    AcquireError, CameraFacing, EvidenceStore, FixError, LocationSource, MediaSource,
    MediaStream, Notifier, NotifyLevel, ReverseGeocoder, StoreError, StreamKind, WatchOptions,
};
use crate::application::recorder::{RecorderError, SessionRecorder};
use crate::application::state_store::RecordingStateStore;
use crate::application::tracker::LocationTracker;
use crate::domain::capture::{CaptureKind, CaptureRequest};
use crate::domain::evidence::{Deliverable, DeliverablePayload, SavedEvidence};
use crate::domain::mime::{AUDIO_PREFERENCES, VIDEO_PREFERENCES};
use crate::domain::state::StatePatch;
use crate::domain::time_limit::TimeLimit;

/// Why a trigger was refused
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("A {0} session is already active")]
    AlreadyActive(CaptureKind),

    #[error("Could not acquire device capability: {0}")]
    Acquire(#[from] AcquireError),

    #[error("Could not start the recorder: {0}")]
    Recorder(#[from] RecorderError),

    #[error("Could not start location tracking: {0}")]
    Location(#[from] FixError),
}

/// Why a stop request was refused
#[derive(Debug, PartialEq, Eq, Error)]
pub enum StopError {
    #[error("No session is active")]
    NotActive,

    #[error("Session cannot be stopped for another {remaining_secs}s")]
    TimerPending { remaining_secs: u64 },
}

/// What ended the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopCause {
    /// The configured time limit elapsed
    Expired,
    /// A different trigger replaced the running feature session
    Preempted,
    /// Supervisory teardown, e.g. process shutdown
    Forced,
}

/// Result of one completed session
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub kind: CaptureKind,
    pub duration_secs: u64,
    pub saved: Vec<SavedEvidence>,
    pub store_errors: Vec<StoreError>,
}

/// Handle returned by `trigger`.
/// The session runs on its own; awaiting `done` observes its outcome.
pub struct SessionHandle {
    pub kind: CaptureKind,
    pub time_limit: TimeLimit,
    /// Set when the camera was requested but the session degraded to
    /// audio-only recording
    pub camera_degraded: bool,
    done: oneshot::Receiver<SessionOutcome>,
}

impl SessionHandle {
    /// Wait for the session to finish.
    /// Returns None only if the orchestrator was dropped mid-session.
    pub async fn done(self) -> Option<SessionOutcome> {
        self.done.await.ok()
    }
}

struct ActiveSession {
    kind: CaptureKind,
    time_limit: TimeLimit,
    started_at: Instant,
    recorder: Option<SessionRecorder>,
    tracker: Option<LocationTracker>,
    auxiliary: Vec<Box<dyn MediaStream>>,
    timer: Option<JoinHandle<()>>,
    done_tx: Option<oneshot::Sender<SessionOutcome>>,
}

/// The one place sessions start and stop.
pub struct SessionOrchestrator<M, L, G, S, N> {
    media: Arc<M>,
    location: Arc<L>,
    geocoder: Arc<G>,
    store: Arc<S>,
    notifier: Arc<N>,
    state: RecordingStateStore,
    device_id: String,
    watch_options: WatchOptions,
    preferred_facing: CameraFacing,
    active: Mutex<Option<ActiveSession>>,
}

impl<M, L, G, S, N> SessionOrchestrator<M, L, G, S, N>
where
    M: MediaSource + 'static,
    L: LocationSource + 'static,
    G: ReverseGeocoder + 'static,
    S: EvidenceStore + 'static,
    N: Notifier + 'static,
{
    pub fn new(
        media: Arc<M>,
        location: Arc<L>,
        geocoder: Arc<G>,
        store: Arc<S>,
        notifier: Arc<N>,
        device_id: String,
        watch_options: WatchOptions,
    ) -> Self {
        Self {
            media,
            location,
            geocoder,
            store,
            notifier,
            state: RecordingStateStore::new(),
            device_id,
            watch_options,
            preferred_facing: CameraFacing::Rear,
            active: Mutex::new(None),
        }
    }

    /// Shared session state, for observers like the CLI presenter
    pub fn state_store(&self) -> &RecordingStateStore {
        &self.state
    }

    /// Start a capture session.
    ///
    /// While a panic session runs, every trigger is refused. While a
    /// feature session runs, any trigger stops the running session
    /// first, persisting whatever it captured, and then starts; a
    /// same-feature retrigger restarts that feature the same way.
    pub async fn trigger(
        self: &Arc<Self>,
        request: CaptureRequest,
    ) -> Result<SessionHandle, SessionError> {
        let mut active = self.active.lock().await;

        if let Some(session) = active.as_ref() {
            if session.kind == CaptureKind::Panic {
                self.notify(
                    NotifyLevel::Warning,
                    &format!("A {} session is already running", session.kind),
                )
                .await;
                return Err(SessionError::AlreadyActive(session.kind));
            }
        }
        if let Some(session) = active.take() {
            info!(
                "{} trigger preempts the running {} session",
                request.kind, session.kind
            );
            self.finalize_session(session, StopCause::Preempted).await;
        }

        // State flips active before acquisition so observers see the
        // attempt; any failure below rolls it back to idle.
        let capabilities = request.kind.capabilities();
        self.state
            .update(StatePatch::activate(request.kind, request.time_limit));

        let mut acquired = match acquire_media(
            self.media.as_ref(),
            capabilities,
            self.preferred_facing,
        )
        .await
        {
            Ok(acquired) => acquired,
            Err(err) => {
                self.state.update(StatePatch::deactivate());
                self.notify(
                    NotifyLevel::Error,
                    &format!("Could not start {}: {err}", request.kind),
                )
                .await;
                return Err(err.into());
            }
        };
        let camera_degraded = acquired.camera_unavailable.is_some();

        let recorder = match acquired.recording.take() {
            Some(stream) => {
                let preferences = match stream.kind() {
                    StreamKind::AudioOnly => AUDIO_PREFERENCES,
                    StreamKind::VideoOnly | StreamKind::VideoWithAudio => VIDEO_PREFERENCES,
                };
                match SessionRecorder::start(stream, preferences) {
                    Ok(recorder) => Some(recorder),
                    Err(err) => {
                        acquired.release_all();
                        self.state.update(StatePatch::deactivate());
                        self.notify(
                            NotifyLevel::Error,
                            &format!("Could not start {}: {err}", request.kind),
                        )
                        .await;
                        return Err(err.into());
                    }
                }
            }
            None => None,
        };

        let tracker = if capabilities.location {
            let geocoder = Arc::clone(&self.geocoder) as Arc<dyn ReverseGeocoder>;
            match LocationTracker::start(
                self.location.as_ref(),
                Some(geocoder),
                self.watch_options,
            )
            .await
            {
                Ok(tracker) => Some(tracker),
                Err(err) if request.kind == CaptureKind::Location => {
                    // A location-only session has nothing left to capture
                    if let Some(recorder) = &recorder {
                        let _ = recorder.stop().await;
                    }
                    acquired.release_all();
                    self.state.update(StatePatch::deactivate());
                    self.notify(
                        NotifyLevel::Error,
                        &format!("Could not start {}: {err}", request.kind),
                    )
                    .await;
                    return Err(err.into());
                }
                Err(err) => {
                    warn!("Location tracking unavailable, continuing without it: {err}");
                    None
                }
            }
        } else {
            None
        };

        let (done_tx, done_rx) = oneshot::channel();
        let AcquiredMedia { auxiliary, .. } = acquired;
        let mut session = ActiveSession {
            kind: request.kind,
            time_limit: request.time_limit,
            started_at: Instant::now(),
            recorder,
            tracker,
            auxiliary,
            timer: None,
            done_tx: Some(done_tx),
        };

        // Armed only now that the session started successfully; expiry
        // is the one normal way a session ends.
        let orchestrator = Arc::clone(self);
        session.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(request.time_limit.as_std()).await;
            orchestrator.finalize(StopCause::Expired).await;
        }));

        info!(
            "{} session started, auto-stop in {}",
            request.kind, request.time_limit
        );
        *active = Some(session);

        Ok(SessionHandle {
            kind: request.kind,
            time_limit: request.time_limit,
            camera_degraded,
            done: done_rx,
        })
    }

    /// Ask to stop the running session.
    /// Always refused: while the auto-stop timer is pending the refusal
    /// reports how long the session will keep running, and with no
    /// session there is nothing to stop. Only `force_stop` ends a
    /// session before its timer does.
    pub async fn request_stop(&self) -> StopError {
        let active = self.active.lock().await;
        match active.as_ref() {
            None => StopError::NotActive,
            Some(session) => {
                let elapsed = session.started_at.elapsed().as_secs();
                let remaining_secs = session.time_limit.as_secs().saturating_sub(elapsed);
                StopError::TimerPending { remaining_secs }
            }
        }
    }

    /// Supervisory teardown, e.g. on process shutdown.
    /// Bypasses the no-cancel rule: releases every resource and still
    /// hands whatever was captured to the store.
    pub async fn force_stop(self: &Arc<Self>) -> Option<SessionOutcome> {
        self.finalize(StopCause::Forced).await
    }

    async fn finalize(&self, cause: StopCause) -> Option<SessionOutcome> {
        let session = self.active.lock().await.take()?;
        Some(self.finalize_session(session, cause).await)
    }

    /// Tear one session down: idempotent stops, unconditional stream
    /// release, state reset, then exactly-once handoff to the store.
    async fn finalize_session(&self, mut session: ActiveSession, cause: StopCause) -> SessionOutcome {
        if cause != StopCause::Expired {
            if let Some(timer) = session.timer.take() {
                timer.abort();
            }
        }

        let duration_secs = session
            .started_at
            .elapsed()
            .as_secs()
            .min(session.time_limit.as_secs());

        let mut deliverables: Vec<Deliverable> = Vec::new();

        if let Some(recorder) = &session.recorder {
            match recorder.stop().await {
                Ok(artifact) => deliverables.push(Deliverable {
                    kind: session.kind,
                    device_id: self.device_id.clone(),
                    duration_secs,
                    payload: DeliverablePayload::Media(artifact),
                }),
                Err(err) => {
                    warn!("{} session produced no media: {err}", session.kind);
                    self.notify(
                        NotifyLevel::Warning,
                        &format!("{} session captured no media", session.kind),
                    )
                    .await;
                }
            }
        }

        for stream in &mut session.auxiliary {
            stream.stop_tracks();
        }

        if let Some(tracker) = &session.tracker {
            let trail = tracker.stop().await;
            if trail.is_empty() {
                warn!("{} session collected no location points", session.kind);
                self.notify(
                    NotifyLevel::Warning,
                    &format!("{} session collected no location points", session.kind),
                )
                .await;
            } else {
                let record = trail.into_record(session.kind, &self.device_id, duration_secs);
                deliverables.push(Deliverable {
                    kind: session.kind,
                    device_id: self.device_id.clone(),
                    duration_secs,
                    payload: DeliverablePayload::Location(record),
                });
            }
        }

        // Local teardown is complete before persistence starts, so a
        // slow or failing store can never keep devices open.
        self.state.update(StatePatch::deactivate());

        let mut saved = Vec::new();
        let mut store_errors = Vec::new();
        for deliverable in deliverables {
            match self.store.save(deliverable).await {
                Ok(evidence) => saved.push(evidence),
                Err(err) => {
                    self.notify(
                        NotifyLevel::Error,
                        &format!("Could not save evidence: {err}"),
                    )
                    .await;
                    store_errors.push(err);
                }
            }
        }

        match cause {
            StopCause::Expired if !saved.is_empty() => {
                self.notify(
                    NotifyLevel::Success,
                    &format!("{} recording saved", session.kind),
                )
                .await;
            }
            StopCause::Preempted | StopCause::Forced => {
                self.notify(
                    NotifyLevel::Warning,
                    &format!("{} session stopped early", session.kind),
                )
                .await;
            }
            _ => {}
        }

        info!(
            "{} session finished after {duration_secs}s: {} saved, {} failed",
            session.kind,
            saved.len(),
            store_errors.len()
        );

        let outcome = SessionOutcome {
            kind: session.kind,
            duration_secs,
            saved,
            store_errors,
        };
        if let Some(done_tx) = session.done_tx.take() {
            let _ = done_tx.send(outcome.clone());
        }
        outcome
    }

    async fn notify(&self, level: NotifyLevel, message: &str) {
        if let Err(err) = self.notifier.notify(level, message).await {
            warn!("Notification failed: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::application::test_support::{
        MockGeocoder, MockLocationSource, MockMediaSource, MockNotifier, MockStore, TrackCounter,
    };
    use crate::domain::evidence::DeliverablePayload;

    type TestOrchestrator = SessionOrchestrator<
        MockMediaSource,
        MockLocationSource,
        MockGeocoder,
        MockStore,
        MockNotifier,
    >;

    struct Harness {
        orchestrator: Arc<TestOrchestrator>,
        store: Arc<MockStore>,
        notifier: Arc<MockNotifier>,
        counter: Arc<TrackCounter>,
    }

    fn harness(media: MockMediaSource, location: MockLocationSource) -> Harness {
        let counter = Arc::clone(&media.counter);
        let store = Arc::new(MockStore::new());
        let notifier = Arc::new(MockNotifier::new());
        let orchestrator = Arc::new(SessionOrchestrator::new(
            Arc::new(media),
            Arc::new(location),
            Arc::new(MockGeocoder::resolving("Av. Paulista, 1578")),
            Arc::clone(&store),
            Arc::clone(&notifier),
            "device-1".to_string(),
            WatchOptions::default(),
        ));
        Harness {
            orchestrator,
            store,
            notifier,
            counter,
        }
    }

    fn default_harness() -> Harness {
        let counter = TrackCounter::new();
        harness(
            MockMediaSource::grant_all(counter),
            MockLocationSource::with_fixes(3),
        )
    }

    fn request(kind: CaptureKind, secs: u64) -> CaptureRequest {
        CaptureRequest {
            kind,
            time_limit: TimeLimit::from_secs(secs),
        }
    }

    #[tokio::test]
    async fn same_kind_retrigger_restarts_the_session() {
        let h = default_harness();
        let first = h
            .orchestrator
            .trigger(request(CaptureKind::Audio, 60))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let second = h
            .orchestrator
            .trigger(request(CaptureKind::Audio, 60))
            .await
            .unwrap();
        assert_eq!(second.kind, CaptureKind::Audio);

        // The first run was stopped and persisted before the restart
        let outcome = first.done().await.unwrap();
        assert_eq!(outcome.kind, CaptureKind::Audio);
        assert_eq!(outcome.saved.len(), 1);
        assert!(h.orchestrator.state_store().snapshot().is_active);

        h.orchestrator.force_stop().await;
    }

    #[tokio::test]
    async fn panic_session_blocks_every_trigger() {
        let h = default_harness();
        let _handle = h
            .orchestrator
            .trigger(request(CaptureKind::Panic, 60))
            .await
            .unwrap();

        for kind in [CaptureKind::Video, CaptureKind::Audio, CaptureKind::Location] {
            let result = h.orchestrator.trigger(request(kind, 60)).await;
            assert!(matches!(
                result.err(),
                Some(SessionError::AlreadyActive(CaptureKind::Panic))
            ));
        }

        h.orchestrator.force_stop().await;
    }

    #[tokio::test]
    async fn different_feature_preempts_the_running_session() {
        let h = default_harness();
        let first = h
            .orchestrator
            .trigger(request(CaptureKind::Audio, 60))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let _second = h
            .orchestrator
            .trigger(request(CaptureKind::Video, 60))
            .await
            .unwrap();

        // The preempted session persisted its partial artifact
        let outcome = first.done().await.unwrap();
        assert_eq!(outcome.kind, CaptureKind::Audio);
        assert_eq!(outcome.saved.len(), 1);
        let saved = h.store.saved_deliverables();
        assert!(matches!(saved[0].payload, DeliverablePayload::Media(_)));
        assert_eq!(saved[0].kind, CaptureKind::Audio);

        h.orchestrator.force_stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn timer_expiry_finalizes_the_session() {
        let h = default_harness();
        let handle = h
            .orchestrator
            .trigger(request(CaptureKind::Audio, 5))
            .await
            .unwrap();

        let outcome = handle.done().await.unwrap();
        assert_eq!(outcome.saved.len(), 1);
        assert!(outcome.store_errors.is_empty());

        assert!(!h.orchestrator.state_store().snapshot().is_active);
        assert_eq!(h.counter.open_count(), 0);
    }

    #[tokio::test]
    async fn stop_requests_are_rejected_while_the_timer_runs() {
        let h = default_harness();
        let _handle = h
            .orchestrator
            .trigger(request(CaptureKind::Audio, 120))
            .await
            .unwrap();

        match h.orchestrator.request_stop().await {
            StopError::TimerPending { remaining_secs } => {
                assert!(remaining_secs > 100);
            }
            other => panic!("expected TimerPending, got {other:?}"),
        }

        h.orchestrator.force_stop().await;
        assert_eq!(h.orchestrator.request_stop().await, StopError::NotActive);
    }

    #[tokio::test]
    async fn panic_force_stop_delivers_media_and_location() {
        let h = default_harness();
        let _handle = h
            .orchestrator
            .trigger(request(CaptureKind::Panic, 300))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let outcome = h.orchestrator.force_stop().await.unwrap();
        assert_eq!(outcome.kind, CaptureKind::Panic);
        assert_eq!(outcome.saved.len(), 2);

        let saved = h.store.saved_deliverables();
        let record = saved
            .iter()
            .find_map(|d| match &d.payload {
                DeliverablePayload::Location(record) => Some(record),
                _ => None,
            })
            .unwrap();
        assert_eq!(record.record_type, "panic_location_recording");
        assert_eq!(record.total_points, 3);

        assert_eq!(h.counter.open_count(), 0);
        assert!(!h.orchestrator.state_store().snapshot().is_active);
    }

    #[tokio::test]
    async fn microphone_denial_rolls_back_to_idle() {
        let counter = TrackCounter::new();
        let media = MockMediaSource {
            mic: Some(AcquireError::PermissionDenied),
            ..MockMediaSource::grant_all(Arc::clone(&counter))
        };
        let h = harness(media, MockLocationSource::with_fixes(1));

        let result = h.orchestrator.trigger(request(CaptureKind::Audio, 60)).await;
        assert!(matches!(
            result.err(),
            Some(SessionError::Acquire(AcquireError::PermissionDenied))
        ));

        assert!(!h.orchestrator.state_store().snapshot().is_active);
        assert_eq!(h.counter.open_count(), 0);
        assert!(h
            .notifier
            .recorded()
            .iter()
            .any(|(level, _)| *level == NotifyLevel::Error));
    }

    #[tokio::test]
    async fn location_watch_failure_fails_a_location_session() {
        let counter = TrackCounter::new();
        let location = MockLocationSource {
            fixes: Vec::new(),
            watch_fails: Some(FixError::PermissionRevoked),
        };
        let h = harness(MockMediaSource::grant_all(counter), location);

        let result = h
            .orchestrator
            .trigger(request(CaptureKind::Location, 60))
            .await;
        assert!(matches!(result.err(), Some(SessionError::Location(_))));
        assert!(!h.orchestrator.state_store().snapshot().is_active);
    }

    #[tokio::test]
    async fn location_watch_failure_degrades_a_panic_session() {
        let counter = TrackCounter::new();
        let location = MockLocationSource {
            fixes: Vec::new(),
            watch_fails: Some(FixError::Unavailable("no provider".into())),
        };
        let h = harness(MockMediaSource::grant_all(counter), location);

        let _handle = h
            .orchestrator
            .trigger(request(CaptureKind::Panic, 300))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let outcome = h.orchestrator.force_stop().await.unwrap();
        // Media still captured and saved, only the trail is missing
        assert_eq!(outcome.saved.len(), 1);
        let saved = h.store.saved_deliverables();
        assert!(matches!(saved[0].payload, DeliverablePayload::Media(_)));
    }

    #[tokio::test]
    async fn store_failure_never_blocks_teardown() {
        let counter = TrackCounter::new();
        let media = MockMediaSource::grant_all(Arc::clone(&counter));
        let store = Arc::new(MockStore {
            fail_with: Some(StoreError::Network("offline".into())),
            ..MockStore::new()
        });
        let notifier = Arc::new(MockNotifier::new());
        let orchestrator: Arc<TestOrchestrator> = Arc::new(SessionOrchestrator::new(
            Arc::new(media),
            Arc::new(MockLocationSource::with_fixes(1)),
            Arc::new(MockGeocoder::failing()),
            Arc::clone(&store),
            Arc::clone(&notifier),
            "device-1".to_string(),
            WatchOptions::default(),
        ));

        let _handle = orchestrator
            .trigger(request(CaptureKind::Audio, 60))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let outcome = orchestrator.force_stop().await.unwrap();
        assert!(outcome.saved.is_empty());
        assert_eq!(outcome.store_errors.len(), 1);

        assert_eq!(counter.open_count(), 0);
        assert!(!orchestrator.state_store().snapshot().is_active);
    }

    #[tokio::test]
    async fn empty_trail_produces_no_deliverable() {
        let counter = TrackCounter::new();
        let h = harness(
            MockMediaSource::grant_all(counter),
            MockLocationSource::with_fixes(0),
        );

        let _handle = h
            .orchestrator
            .trigger(request(CaptureKind::Location, 60))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let outcome = h.orchestrator.force_stop().await.unwrap();
        assert!(outcome.saved.is_empty());
        assert!(h.store.saved_deliverables().is_empty());
        assert!(h
            .notifier
            .recorded()
            .iter()
            .any(|(level, message)| *level == NotifyLevel::Warning
                && message.contains("no location points")));
    }
}
