//! Microphone media source using cpal
//!
//! Desktop machines have no always-on camera pipeline, so this adapter
//! serves the audio capability only: camera constraints report
//! `NotFound` and sessions degrade to audio plus location. Captured PCM
//! is delivered as one streaming WAV header chunk followed by raw
//! sample chunks.
//!
//! The cpal stream is not Send, so each open stream lives on its own
//! dedicated thread and is controlled through atomics.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::SampleFormat;
use log::warn;
use tokio::sync::{mpsc, oneshot};

use crate::application::ports::{
    AcquireError, MediaSource, MediaStream, StreamConstraints, StreamKind,
};
use crate::domain::mime::MimeType;

const BITS_PER_SAMPLE: u16 = 16;

/// Media source backed by the default cpal input device
pub struct CpalMediaSource;

impl CpalMediaSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CpalMediaSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaSource for CpalMediaSource {
    async fn open(
        &self,
        constraints: StreamConstraints,
    ) -> Result<Box<dyn MediaStream>, AcquireError> {
        if constraints.video.is_some() {
            // No camera hardware behind this adapter
            return Err(AcquireError::NotFound);
        }
        if !constraints.audio {
            return Err(AcquireError::Unsupported);
        }

        let (chunk_tx, chunk_rx) = mpsc::unbounded_channel();
        let (ready_tx, ready_rx) = oneshot::channel();
        let stop_flag = Arc::new(AtomicBool::new(false));

        let thread_stop = Arc::clone(&stop_flag);
        thread::spawn(move || run_capture(chunk_tx, ready_tx, thread_stop));

        // The capture thread reports whether the device opened
        match ready_rx.await {
            Ok(Ok(())) => Ok(Box::new(CpalMicStream {
                chunks: chunk_rx,
                stop_flag,
                live: true,
            })),
            Ok(Err(err)) => Err(err),
            Err(_) => Err(AcquireError::DeviceBusy),
        }
    }

    fn combine(
        &self,
        mut video: Box<dyn MediaStream>,
        mut audio: Box<dyn MediaStream>,
    ) -> Result<Box<dyn MediaStream>, AcquireError> {
        video.stop_tracks();
        audio.stop_tracks();
        Err(AcquireError::Unsupported)
    }
}

struct CpalMicStream {
    chunks: mpsc::UnboundedReceiver<Vec<u8>>,
    stop_flag: Arc<AtomicBool>,
    live: bool,
}

#[async_trait]
impl MediaStream for CpalMicStream {
    fn kind(&self) -> StreamKind {
        StreamKind::AudioOnly
    }

    fn supports(&self, mime: MimeType) -> bool {
        mime == MimeType::AudioWav
    }

    async fn next_chunk(&mut self) -> Option<Vec<u8>> {
        self.chunks.recv().await
    }

    fn stop_tracks(&mut self) {
        if self.live {
            self.live = false;
            self.stop_flag.store(true, Ordering::SeqCst);
            self.chunks.close();
        }
    }

    fn is_live(&self) -> bool {
        self.live
    }
}

impl Drop for CpalMicStream {
    fn drop(&mut self) {
        self.stop_tracks();
    }
}

/// Runs on the dedicated capture thread; owns the cpal stream for its
/// whole lifetime and exits once the stop flag is raised.
fn run_capture(
    chunk_tx: mpsc::UnboundedSender<Vec<u8>>,
    ready_tx: oneshot::Sender<Result<(), AcquireError>>,
    stop_flag: Arc<AtomicBool>,
) {
    let host = cpal::default_host();
    let Some(device) = host.default_input_device() else {
        let _ = ready_tx.send(Err(AcquireError::NotFound));
        return;
    };

    let supported = match device.default_input_config() {
        Ok(config) => config,
        Err(err) => {
            warn!("No usable input config: {err}");
            let _ = ready_tx.send(Err(AcquireError::Unsupported));
            return;
        }
    };

    let sample_format = supported.sample_format();
    let config: cpal::StreamConfig = supported.into();
    let sample_rate = config.sample_rate.0;
    let channels = config.channels;

    // Header first, so the byte stream is a valid WAV file prefix
    if chunk_tx
        .send(streaming_wav_header(sample_rate, channels))
        .is_err()
    {
        return;
    }

    let build_result = match sample_format {
        SampleFormat::I16 => {
            let tx = chunk_tx.clone();
            device.build_input_stream(
                &config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    let _ = tx.send(pcm_bytes(data));
                },
                |err| warn!("Audio stream error: {err}"),
                None,
            )
        }
        SampleFormat::F32 => {
            let tx = chunk_tx.clone();
            device.build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let samples: Vec<i16> = data.iter().map(|&s| (s * 32767.0) as i16).collect();
                    let _ = tx.send(pcm_bytes(&samples));
                },
                |err| warn!("Audio stream error: {err}"),
                None,
            )
        }
        other => {
            warn!("Unsupported sample format: {other:?}");
            let _ = ready_tx.send(Err(AcquireError::Unsupported));
            return;
        }
    };

    let stream = match build_result {
        Ok(stream) => stream,
        Err(err) => {
            warn!("Could not open the input stream: {err}");
            let _ = ready_tx.send(Err(AcquireError::DeviceBusy));
            return;
        }
    };

    if let Err(err) = stream.play() {
        warn!("Could not start the input stream: {err}");
        let _ = ready_tx.send(Err(AcquireError::DeviceBusy));
        return;
    }

    let _ = ready_tx.send(Ok(()));

    while !stop_flag.load(Ordering::SeqCst) {
        thread::sleep(Duration::from_millis(50));
    }
    drop(stream);
}

fn pcm_bytes(samples: &[i16]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(samples.len() * 2);
    for sample in samples {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    bytes
}

/// 44-byte WAV header with unknown-length (streaming) chunk sizes
fn streaming_wav_header(sample_rate: u32, channels: u16) -> Vec<u8> {
    let byte_rate = sample_rate * u32::from(channels) * u32::from(BITS_PER_SAMPLE) / 8;
    let block_align = channels * BITS_PER_SAMPLE / 8;

    let mut header = Vec::with_capacity(44);
    header.extend_from_slice(b"RIFF");
    header.extend_from_slice(&u32::MAX.to_le_bytes());
    header.extend_from_slice(b"WAVE");
    header.extend_from_slice(b"fmt ");
    header.extend_from_slice(&16u32.to_le_bytes());
    header.extend_from_slice(&1u16.to_le_bytes()); // PCM
    header.extend_from_slice(&channels.to_le_bytes());
    header.extend_from_slice(&sample_rate.to_le_bytes());
    header.extend_from_slice(&byte_rate.to_le_bytes());
    header.extend_from_slice(&block_align.to_le_bytes());
    header.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());
    header.extend_from_slice(b"data");
    header.extend_from_slice(&u32::MAX.to_le_bytes());
    header
}
