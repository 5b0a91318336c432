//! Cross-platform audio input using cpal
//!
//! Runs a continuous capture stream on a dedicated thread (cpal::Stream is
//! not Send) and hands the sample bytes out in fixed-size blocks, mono,
//! 16-bit little-endian, mirroring a DMA-buffered digital microphone.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex as StdMutex};
use std::thread;
use std::time::Duration;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, StreamConfig};
use tokio::sync::Notify;
use tracing::{info, warn};

use crate::application::ports::{AudioInput, AudioInputError};
use crate::domain::format::{BLOCK_SIZE, DEFAULT_SAMPLE_RATE};

/// Buffered bytes kept before the oldest are dropped (64 blocks,
/// matching the reference peripheral's DMA depth)
const BUFFER_CAPACITY: usize = 64 * BLOCK_SIZE;

/// Bounded byte queue between the capture callback and block readers
struct BlockBuffer {
    bytes: VecDeque<u8>,
    capacity: usize,
}

impl BlockBuffer {
    fn new(capacity: usize) -> Self {
        Self {
            bytes: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append sample bytes, discarding the oldest on overflow
    fn push(&mut self, chunk: &[u8]) {
        let total = self.bytes.len() + chunk.len();
        if total > self.capacity {
            let excess = total - self.capacity;
            self.bytes.drain(..excess.min(self.bytes.len()));
        }
        self.bytes.extend(chunk);
    }

    /// Take one full block if enough bytes are buffered
    fn pop_block(&mut self, block_size: usize) -> Option<Vec<u8>> {
        if self.bytes.len() < block_size {
            return None;
        }
        Some(self.bytes.drain(..block_size).collect())
    }
}

/// Audio input adapter over the default cpal capture device
pub struct CpalAudioInput {
    buffer: Arc<StdMutex<BlockBuffer>>,
    notify: Arc<Notify>,
    running: Arc<AtomicBool>,
}

impl CpalAudioInput {
    /// Open the default input device and start the capture stream.
    ///
    /// Returns once the stream is playing; the capture thread keeps it
    /// alive until the adapter is dropped.
    pub fn start() -> Result<Self, AudioInputError> {
        let buffer = Arc::new(StdMutex::new(BlockBuffer::new(BUFFER_CAPACITY)));
        let notify = Arc::new(Notify::new());
        let running = Arc::new(AtomicBool::new(true));

        let (startup_tx, startup_rx) = mpsc::channel::<Result<u32, AudioInputError>>();
        let thread_buffer = Arc::clone(&buffer);
        let thread_notify = Arc::clone(&notify);
        let thread_running = Arc::clone(&running);

        thread::spawn(move || {
            Self::capture_thread(thread_buffer, thread_notify, thread_running, startup_tx);
        });

        match startup_rx.recv() {
            Ok(Ok(sample_rate)) => {
                info!(sample_rate, "audio capture stream started");
                Ok(Self {
                    buffer,
                    notify,
                    running,
                })
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(AudioInputError::StartFailed(
                "capture thread exited during startup".to_string(),
            )),
        }
    }

    /// Owns the cpal stream for the adapter's lifetime
    fn capture_thread(
        buffer: Arc<StdMutex<BlockBuffer>>,
        notify: Arc<Notify>,
        running: Arc<AtomicBool>,
        startup_tx: mpsc::Sender<Result<u32, AudioInputError>>,
    ) {
        let stream = match Self::build_stream(buffer, Arc::clone(&notify)) {
            Ok((stream, sample_rate)) => {
                let _ = startup_tx.send(Ok(sample_rate));
                stream
            }
            Err(e) => {
                let _ = startup_tx.send(Err(e));
                return;
            }
        };

        while running.load(Ordering::SeqCst) {
            thread::sleep(Duration::from_millis(100));
        }
        drop(stream);
    }

    fn build_stream(
        buffer: Arc<StdMutex<BlockBuffer>>,
        notify: Arc<Notify>,
    ) -> Result<(cpal::Stream, u32), AudioInputError> {
        let device = Self::get_input_device()?;
        let (config, sample_format) = Self::get_input_config(&device)?;
        let channels = config.channels;
        let sample_rate = config.sample_rate.0;

        let on_error = |err| warn!(error = %err, "audio stream error");

        let stream = match sample_format {
            SampleFormat::I16 => {
                device
                    .build_input_stream(
                        &config,
                        move |data: &[i16], _: &cpal::InputCallbackInfo| {
                            let mono = Self::stereo_to_mono(data, channels);
                            if let Ok(mut buffer) = buffer.lock() {
                                buffer.push(&Self::samples_to_le_bytes(&mono));
                            }
                            notify.notify_waiters();
                        },
                        on_error,
                        None,
                    )
                    .map_err(|e| AudioInputError::StartFailed(e.to_string()))?
            }

            SampleFormat::F32 => {
                device
                    .build_input_stream(
                        &config,
                        move |data: &[f32], _: &cpal::InputCallbackInfo| {
                            let i16_data: Vec<i16> =
                                data.iter().map(|&s| (s * 32767.0) as i16).collect();
                            let mono = Self::stereo_to_mono(&i16_data, channels);
                            if let Ok(mut buffer) = buffer.lock() {
                                buffer.push(&Self::samples_to_le_bytes(&mono));
                            }
                            notify.notify_waiters();
                        },
                        on_error,
                        None,
                    )
                    .map_err(|e| AudioInputError::StartFailed(e.to_string()))?
            }

            _ => {
                return Err(AudioInputError::StartFailed(
                    "Unsupported sample format".into(),
                ))
            }
        };

        stream
            .play()
            .map_err(|e| AudioInputError::StartFailed(e.to_string()))?;

        Ok((stream, sample_rate))
    }

    /// Get the default input device
    fn get_input_device() -> Result<cpal::Device, AudioInputError> {
        let host = cpal::default_host();
        host.default_input_device()
            .ok_or(AudioInputError::NoAudioDevice)
    }

    /// Pick an input configuration, preferring mono at the capture rate
    fn get_input_config(
        device: &cpal::Device,
    ) -> Result<(StreamConfig, SampleFormat), AudioInputError> {
        let supported_configs = device
            .supported_input_configs()
            .map_err(|e| AudioInputError::StartFailed(format!("Failed to get configs: {}", e)))?;

        let mut best_config: Option<cpal::SupportedStreamConfigRange> = None;

        for config in supported_configs {
            if config.sample_format() != SampleFormat::I16
                && config.sample_format() != SampleFormat::F32
            {
                continue;
            }

            let includes_target = config.min_sample_rate().0 <= DEFAULT_SAMPLE_RATE
                && config.max_sample_rate().0 >= DEFAULT_SAMPLE_RATE;

            let is_better = match &best_config {
                None => true,
                Some(current) => {
                    let fewer_channels = config.channels() < current.channels();
                    let better_rate =
                        includes_target && current.min_sample_rate().0 > DEFAULT_SAMPLE_RATE;
                    fewer_channels || better_rate
                }
            };
            if is_better {
                best_config = Some(config);
            }
        }

        let config_range = best_config.ok_or(AudioInputError::StartFailed(
            "No suitable config found".into(),
        ))?;

        let sample_rate = if config_range.min_sample_rate().0 <= DEFAULT_SAMPLE_RATE
            && config_range.max_sample_rate().0 >= DEFAULT_SAMPLE_RATE
        {
            SampleRate(DEFAULT_SAMPLE_RATE)
        } else {
            config_range.min_sample_rate()
        };

        let sample_format = config_range.sample_format();
        let config = StreamConfig {
            channels: config_range.channels(),
            sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        Ok((config, sample_format))
    }

    /// Mix interleaved multi-channel samples down to mono
    fn stereo_to_mono(samples: &[i16], channels: u16) -> Vec<i16> {
        if channels == 1 {
            return samples.to_vec();
        }

        samples
            .chunks(channels as usize)
            .map(|chunk| {
                let sum: i32 = chunk.iter().map(|&s| s as i32).sum();
                (sum / channels as i32) as i16
            })
            .collect()
    }

    fn samples_to_le_bytes(samples: &[i16]) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(samples.len() * 2);
        for sample in samples {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
        bytes
    }
}

impl Drop for CpalAudioInput {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

#[async_trait]
impl AudioInput for CpalAudioInput {
    async fn read_block(&self) -> Result<Vec<u8>, AudioInputError> {
        loop {
            // Enable the waiter before checking, so a push between the
            // check and the await is not missed. Creating the future alone
            // is not enough; it only registers once polled.
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            let block = self
                .buffer
                .lock()
                .map_err(|_| AudioInputError::ReadFailed("buffer poisoned".to_string()))?
                .pop_block(BLOCK_SIZE);

            if let Some(block) = block {
                return Ok(block);
            }

            notified.await;
        }
    }
}
