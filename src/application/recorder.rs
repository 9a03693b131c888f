//! Session recorder
//!
//! Wraps one live media stream into a start/stop state machine that
//! buffers delivered chunks and finalizes them into a single artifact.

use std::sync::{Arc, Mutex as StdMutex};
use std::time::Instant;

use thiserror::Error;
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;

use crate::application::ports::MediaStream;
use crate::domain::evidence::MediaArtifact;
use crate::domain::mime::MimeType;

/// Recorder failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecorderError {
    #[error("None of the preferred media formats is supported")]
    UnsupportedFormat,

    #[error("Recording produced no data")]
    EmptyArtifact,
}

/// Recorder lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderPhase {
    Recording,
    Stopped,
}

struct Inner {
    pump: Option<JoinHandle<()>>,
    outcome: Option<Result<MediaArtifact, RecorderError>>,
}

/// One active stream + recorder pairing.
///
/// Created already recording; `stop` finalizes exactly once and is a
/// no-op afterwards, returning the cached outcome. The underlying
/// stream's tracks are released on every exit path.
pub struct SessionRecorder {
    mime: MimeType,
    started_at: Instant,
    chunks: Arc<StdMutex<Vec<Vec<u8>>>>,
    stop_signal: Arc<Notify>,
    inner: Mutex<Inner>,
}

impl SessionRecorder {
    /// Start recording the given stream.
    ///
    /// Picks the first supported format from the ordered preference
    /// list; if the stream supports none of them the stream is released
    /// and `UnsupportedFormat` is returned.
    pub fn start(
        mut stream: Box<dyn MediaStream>,
        preferences: &[MimeType],
    ) -> Result<Self, RecorderError> {
        let Some(mime) = preferences.iter().copied().find(|m| stream.supports(*m)) else {
            stream.stop_tracks();
            return Err(RecorderError::UnsupportedFormat);
        };

        let chunks: Arc<StdMutex<Vec<Vec<u8>>>> = Arc::new(StdMutex::new(Vec::new()));
        let stop_signal = Arc::new(Notify::new());

        let pump_chunks = Arc::clone(&chunks);
        let pump_stop = Arc::clone(&stop_signal);
        let pump = tokio::spawn(async move {
            // The stream branch comes first so a stop request is only
            // honored once every chunk the stream already delivered has
            // been drained; stopping must never shed buffered data.
            loop {
                tokio::select! {
                    biased;
                    chunk = stream.next_chunk() => match chunk {
                        // Zero-length chunks carry nothing worth keeping
                        Some(chunk) if chunk.is_empty() => continue,
                        Some(chunk) => pump_chunks.lock().unwrap().push(chunk),
                        None => break,
                    },
                    _ = pump_stop.notified() => break,
                }
            }
            // Released here no matter how the loop ended
            stream.stop_tracks();
        });

        Ok(Self {
            mime,
            started_at: Instant::now(),
            chunks,
            stop_signal,
            inner: Mutex::new(Inner {
                pump: Some(pump),
                outcome: None,
            }),
        })
    }

    /// The format fixed for this session's lifetime
    pub fn mime_type(&self) -> MimeType {
        self.mime
    }

    /// Current lifecycle phase
    pub async fn phase(&self) -> RecorderPhase {
        if self.inner.lock().await.outcome.is_some() {
            RecorderPhase::Stopped
        } else {
            RecorderPhase::Recording
        }
    }

    /// Seconds elapsed since the recorder started
    pub fn elapsed_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    /// Stop recording and finalize the buffered chunks.
    ///
    /// Idempotent: the first call finalizes and releases the stream's
    /// tracks; later calls return the cached outcome. An empty buffer
    /// yields `EmptyArtifact` rather than a zero-byte deliverable.
    pub async fn stop(&self) -> Result<MediaArtifact, RecorderError> {
        let mut inner = self.inner.lock().await;
        if let Some(outcome) = &inner.outcome {
            return outcome.clone();
        }

        self.stop_signal.notify_one();
        if let Some(pump) = inner.pump.take() {
            let _ = pump.await;
        }

        let buffered = std::mem::take(&mut *self.chunks.lock().unwrap());
        let bytes: Vec<u8> = buffered.concat();

        let outcome = if bytes.is_empty() {
            Err(RecorderError::EmptyArtifact)
        } else {
            Ok(MediaArtifact::new(self.mime, bytes, self.elapsed_secs()))
        };

        inner.outcome = Some(outcome.clone());
        outcome
    }
}
