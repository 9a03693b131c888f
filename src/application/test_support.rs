//! Scripted port implementations for unit tests

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use chrono::Utc;

use crate::application::ports::{
    AcquireError, CameraFacing, FixError, GeocodeError, LocationSource, LocationWatch,
    MediaSource, MediaStream, NotificationError, Notifier, NotifyLevel, PositionFix,
    ReverseGeocoder, StoreError, StreamConstraints, StreamKind, WatchOptions,
};
use crate::application::ports::store::EvidenceStore;
use crate::domain::evidence::{Deliverable, Evidence, EvidenceContent, SavedEvidence};
use crate::domain::mime::MimeType;

/// Counts open track sets so tests can assert release-on-all-paths
#[derive(Debug, Default)]
pub struct TrackCounter {
    open: AtomicUsize,
}

impl TrackCounter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn open_count(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }

    fn opened(&self) {
        self.open.fetch_add(1, Ordering::SeqCst);
    }

    fn closed(&self) {
        self.open.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A stream that plays back scripted chunks, then stays open silently
pub struct ScriptedStream {
    kind: StreamKind,
    supported: Vec<MimeType>,
    chunks: VecDeque<Vec<u8>>,
    /// When false, the stream ends after the last chunk instead of idling
    stay_open: bool,
    live: bool,
    counter: Arc<TrackCounter>,
    owned: Vec<Box<dyn MediaStream>>,
}

impl ScriptedStream {
    pub fn new(
        kind: StreamKind,
        supported: Vec<MimeType>,
        chunks: Vec<Vec<u8>>,
        counter: Arc<TrackCounter>,
    ) -> Self {
        counter.opened();
        Self {
            kind,
            supported,
            chunks: chunks.into(),
            stay_open: true,
            live: true,
            counter,
            owned: Vec::new(),
        }
    }

    pub fn ending(mut self) -> Self {
        self.stay_open = false;
        self
    }
}

impl Drop for ScriptedStream {
    fn drop(&mut self) {
        self.stop_tracks();
    }
}

#[async_trait]
impl MediaStream for ScriptedStream {
    fn kind(&self) -> StreamKind {
        self.kind
    }

    fn supports(&self, mime: MimeType) -> bool {
        self.supported.contains(&mime)
    }

    async fn next_chunk(&mut self) -> Option<Vec<u8>> {
        if !self.live {
            return None;
        }
        match self.chunks.pop_front() {
            Some(chunk) => Some(chunk),
            None if self.stay_open => std::future::pending().await,
            None => None,
        }
    }

    fn stop_tracks(&mut self) {
        if self.live {
            self.live = false;
            self.counter.closed();
            for stream in &mut self.owned {
                stream.stop_tracks();
            }
        }
    }

    fn is_live(&self) -> bool {
        self.live
    }
}

/// Media source with scripted per-constraint outcomes
pub struct MockMediaSource {
    pub mic: Option<AcquireError>,
    pub rear: Option<AcquireError>,
    pub front: Option<AcquireError>,
    pub any: Option<AcquireError>,
    pub combine_fails: bool,
    pub supported: Vec<MimeType>,
    pub chunks: Vec<Vec<u8>>,
    pub streams_end: bool,
    pub counter: Arc<TrackCounter>,
}

impl MockMediaSource {
    /// Everything grantable, opus/webm supported, one scripted chunk
    pub fn grant_all(counter: Arc<TrackCounter>) -> Self {
        Self {
            mic: None,
            rear: None,
            front: None,
            any: None,
            combine_fails: false,
            supported: vec![
                MimeType::AudioWebmOpus,
                MimeType::VideoWebm,
                MimeType::AudioWav,
            ],
            chunks: vec![vec![1, 2, 3]],
            streams_end: false,
            counter,
        }
    }

    fn stream(&self, kind: StreamKind) -> Box<dyn MediaStream> {
        let stream = ScriptedStream::new(
            kind,
            self.supported.clone(),
            self.chunks.clone(),
            Arc::clone(&self.counter),
        );
        if self.streams_end {
            Box::new(stream.ending())
        } else {
            Box::new(stream)
        }
    }
}

#[async_trait]
impl MediaSource for MockMediaSource {
    async fn open(
        &self,
        constraints: StreamConstraints,
    ) -> Result<Box<dyn MediaStream>, AcquireError> {
        let outcome = match constraints.video {
            None => (&self.mic, StreamKind::AudioOnly),
            Some(CameraFacing::Rear) => (&self.rear, StreamKind::VideoOnly),
            Some(CameraFacing::Front) => (&self.front, StreamKind::VideoOnly),
            Some(CameraFacing::Any) => (&self.any, StreamKind::VideoOnly),
        };
        match outcome {
            (Some(err), _) => Err(*err),
            (None, kind) => Ok(self.stream(kind)),
        }
    }

    fn combine(
        &self,
        mut video: Box<dyn MediaStream>,
        mut audio: Box<dyn MediaStream>,
    ) -> Result<Box<dyn MediaStream>, AcquireError> {
        if self.combine_fails {
            return Err(AcquireError::Unsupported);
        }
        video.stop_tracks();
        audio.stop_tracks();
        Ok(self.stream(StreamKind::VideoWithAudio))
    }
}

/// Location watch replaying scripted fixes, then idling until cleared
pub struct ScriptedWatch {
    fixes: VecDeque<Result<PositionFix, FixError>>,
    cleared: bool,
}

#[async_trait]
impl LocationWatch for ScriptedWatch {
    async fn next_fix(&mut self) -> Option<Result<PositionFix, FixError>> {
        if self.cleared {
            return None;
        }
        match self.fixes.pop_front() {
            Some(fix) => Some(fix),
            None => std::future::pending().await,
        }
    }

    fn clear(&mut self) {
        self.cleared = true;
    }
}

/// Location source handing out scripted watches
pub struct MockLocationSource {
    pub fixes: Vec<Result<PositionFix, FixError>>,
    pub watch_fails: Option<FixError>,
}

impl MockLocationSource {
    pub fn with_fixes(count: usize) -> Self {
        Self {
            fixes: (0..count).map(|n| Ok(fix_at(n as f64))).collect(),
            watch_fails: None,
        }
    }
}

pub fn fix_at(offset: f64) -> PositionFix {
    PositionFix {
        latitude: -23.5505 + offset * 0.0001,
        longitude: -46.6333,
        accuracy: 15.0,
        altitude: None,
        heading: None,
        speed: None,
    }
}

#[async_trait]
impl LocationSource for MockLocationSource {
    async fn watch(&self, _options: WatchOptions) -> Result<Box<dyn LocationWatch>, FixError> {
        if let Some(err) = &self.watch_fails {
            return Err(err.clone());
        }
        Ok(Box::new(ScriptedWatch {
            fixes: self.fixes.clone().into(),
            cleared: false,
        }))
    }
}

/// Geocoder returning a fixed address or failing
pub struct MockGeocoder {
    pub address: Option<String>,
}

impl MockGeocoder {
    pub fn resolving(address: &str) -> Self {
        Self {
            address: Some(address.to_string()),
        }
    }

    pub fn failing() -> Self {
        Self { address: None }
    }
}

#[async_trait]
impl ReverseGeocoder for MockGeocoder {
    async fn resolve(&self, _latitude: f64, _longitude: f64) -> Result<String, GeocodeError> {
        match &self.address {
            Some(address) => Ok(address.clone()),
            None => Err(GeocodeError::NoAddress),
        }
    }
}

/// Store recording every saved deliverable
#[derive(Default)]
pub struct MockStore {
    pub saved: Arc<StdMutex<Vec<Deliverable>>>,
    pub fail_with: Option<StoreError>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saved_deliverables(&self) -> Vec<Deliverable> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl EvidenceStore for MockStore {
    async fn save(&self, deliverable: Deliverable) -> Result<SavedEvidence, StoreError> {
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        self.saved.lock().unwrap().push(deliverable);
        Ok(SavedEvidence {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: Utc::now(),
        })
    }

    async fn list(&self) -> Result<Vec<Evidence>, StoreError> {
        Ok(Vec::new())
    }

    async fn download(&self, id: &str) -> Result<EvidenceContent, StoreError> {
        Err(StoreError::NotFound(id.to_string()))
    }

    async fn delete(&self, _id: &str) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Notifier recording every toast
#[derive(Default)]
pub struct MockNotifier {
    pub messages: Arc<StdMutex<Vec<(NotifyLevel, String)>>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded(&self) -> Vec<(NotifyLevel, String)> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn notify(&self, level: NotifyLevel, message: &str) -> Result<(), NotificationError> {
        self.messages
            .lock()
            .unwrap()
            .push((level, message.to_string()));
        Ok(())
    }
}
