//! Recording session use case
//!
//! Coordinates one vibration-gated recording: header-first file creation,
//! streaming capture from the audio peripheral, a bounded post-capture
//! vibration sensing window, and a best-effort collector notification.

use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::{watch, Semaphore};
use tokio::time::{timeout, Instant};
use tracing::{debug, error, info, warn};

use crate::domain::acceleration::{AxisOffsets, CalibratedSample};
use crate::domain::format::RecordingFormat;
use crate::domain::scale::scale_block;
use crate::domain::vibration::VibrationDetector;
use crate::domain::wav::wav_header;

use super::ports::{
    Accelerometer, AudioInput, AudioInputError, CollectorNotifier, RecordingSink, RecordingStore,
    SensorError, StorageError,
};

/// Attempts per accelerometer read before the session gives up
const SENSOR_READ_ATTEMPTS: u32 = 3;

/// Errors surfaced to the trigger caller
#[derive(Debug, Error)]
pub enum StartError {
    #[error("A recording is already in progress")]
    AlreadyRecording,

    #[error("Failed to start recording: {0}")]
    Storage(#[from] StorageError),
}

/// Errors local to one recording attempt.
/// These never escape the worker; they end up in the session outcome.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Audio capture failed: {0}")]
    Audio(#[from] AudioInputError),

    #[error("No audio data within {0:?}")]
    CaptureTimeout(Duration),

    #[error("Recording storage failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Accelerometer failed: {0}")]
    Sensor(#[from] SensorError),
}

/// Where the orchestrator currently is in its state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecorderState {
    Idle,
    HeaderWritten,
    Capturing,
    PostCaptureSensing,
    Notifying,
}

/// How the most recent session ended
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum RecordingOutcome {
    Completed { vibration_detected: bool },
    Failed { reason: String },
}

/// Tunable parameters for the recording pipeline.
/// Defaults match the reference deployment.
#[derive(Debug, Clone)]
pub struct RecorderSettings {
    pub format: RecordingFormat,
    pub offsets: AxisOffsets,
    pub threshold_g: f32,
    /// Bound on each audio block read
    pub read_timeout: Duration,
    /// Wall-clock length of the post-capture sensing window
    pub sensing_window: Duration,
    /// Delay between accelerometer polls inside the window
    pub poll_interval: Duration,
}

impl Default for RecorderSettings {
    fn default() -> Self {
        Self {
            format: RecordingFormat::default(),
            offsets: AxisOffsets::default(),
            threshold_g: crate::domain::vibration::DEFAULT_THRESHOLD_G,
            read_timeout: Duration::from_secs(10),
            sensing_window: Duration::from_secs(2),
            poll_interval: Duration::from_millis(100),
        }
    }
}

/// Everything one worker task needs; cloned into the spawned session.
#[derive(Clone)]
struct SessionContext {
    accelerometer: Arc<dyn Accelerometer>,
    audio: Arc<dyn AudioInput>,
    store: Arc<dyn RecordingStore>,
    collector: Arc<dyn CollectorNotifier>,
    settings: RecorderSettings,
    /// Detector state lives for the process lifetime; it is deliberately
    /// not reset between recordings.
    detector: Arc<StdMutex<VibrationDetector>>,
    state_tx: Arc<watch::Sender<RecorderState>>,
    last_outcome: Arc<StdMutex<Option<RecordingOutcome>>>,
}

/// One-recording-at-a-time session use case.
///
/// `start` performs the `Idle -> HeaderWritten` transition synchronously
/// (so file-creation failures reach the trigger caller), then hands the
/// rest of the pipeline to a worker task and returns.
pub struct RecordSessionUseCase {
    ctx: SessionContext,
    state_rx: watch::Receiver<RecorderState>,
    permits: Arc<Semaphore>,
}

impl RecordSessionUseCase {
    /// Create a new use case instance over the given adapters
    pub fn new(
        accelerometer: Arc<dyn Accelerometer>,
        audio: Arc<dyn AudioInput>,
        store: Arc<dyn RecordingStore>,
        collector: Arc<dyn CollectorNotifier>,
        settings: RecorderSettings,
    ) -> Self {
        let (state_tx, state_rx) = watch::channel(RecorderState::Idle);
        let detector = VibrationDetector::new(settings.threshold_g);

        Self {
            ctx: SessionContext {
                accelerometer,
                audio,
                store,
                collector,
                settings,
                detector: Arc::new(StdMutex::new(detector)),
                state_tx: Arc::new(state_tx),
                last_outcome: Arc::new(StdMutex::new(None)),
            },
            state_rx,
            permits: Arc::new(Semaphore::new(1)),
        }
    }

    /// Begin a new recording.
    ///
    /// Replaces the prior artifact, writes the WAV header, and spawns the
    /// capture worker. Returns as soon as the header is on disk; a second
    /// trigger while a session is active is rejected.
    pub async fn start(&self) -> Result<(), StartError> {
        let permit = Arc::clone(&self.permits)
            .try_acquire_owned()
            .map_err(|_| StartError::AlreadyRecording)?;

        let mut sink = self.ctx.store.begin().await?;

        let format = self.ctx.settings.format;
        let header = wav_header(format.target_bytes(), &format);
        if let Err(e) = sink.append(&header).await {
            if let Err(remove_err) = self.ctx.store.discard().await {
                warn!(error = %remove_err, "failed to remove unusable recording file");
            }
            return Err(e.into());
        }
        self.ctx.set_state(RecorderState::HeaderWritten);

        let ctx = self.ctx.clone();
        tokio::spawn(async move {
            ctx.run(sink).await;
            drop(permit);
        });

        Ok(())
    }

    /// The orchestrator's current state
    pub fn state(&self) -> RecorderState {
        *self.state_rx.borrow()
    }

    /// Watch state transitions (used by tests and the status route)
    pub fn subscribe(&self) -> watch::Receiver<RecorderState> {
        self.state_rx.clone()
    }

    /// How the most recent session ended, if any has run
    pub fn last_outcome(&self) -> Option<RecordingOutcome> {
        self.ctx
            .last_outcome
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
    }
}

impl SessionContext {
    fn set_state(&self, state: RecorderState) {
        let _ = self.state_tx.send(state);
    }

    /// Drive one session to its end and record the outcome
    async fn run(self, sink: Box<dyn RecordingSink>) {
        let outcome = match self.record(sink).await {
            Ok(vibration_detected) => {
                info!(vibration_detected, "recording session complete");
                RecordingOutcome::Completed { vibration_detected }
            }
            Err(e) => {
                error!(error = %e, "recording session failed");
                RecordingOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };

        if let Ok(mut last) = self.last_outcome.lock() {
            *last = Some(outcome);
        }
        self.set_state(RecorderState::Idle);
    }

    async fn record(&self, mut sink: Box<dyn RecordingSink>) -> Result<bool, SessionError> {
        self.set_state(RecorderState::Capturing);
        if let Err(e) = self.capture(sink.as_mut()).await {
            // A partial artifact must never be served
            if let Err(remove_err) = self.store.discard().await {
                warn!(error = %remove_err, "failed to remove partial recording");
            }
            return Err(e);
        }
        sink.close().await?;

        self.set_state(RecorderState::PostCaptureSensing);
        let sample = self.read_calibrated().await?;
        info!(x = sample.x, y = sample.y, z = sample.z, "post-capture acceleration (g)");

        let vibration_detected = self.poll_window().await?;
        if vibration_detected {
            info!("vibration detected");
        } else {
            info!("no vibration");
        }

        self.set_state(RecorderState::Notifying);
        if let Err(e) = self.collector.recording_complete(vibration_detected).await {
            // Best-effort only; the recording itself is already complete
            warn!(error = %e, "collector notification failed");
        }

        Ok(vibration_detected)
    }

    /// Pull blocks from the peripheral until the target size is reached
    async fn capture(&self, sink: &mut dyn RecordingSink) -> Result<(), SessionError> {
        let target = self.settings.format.target_bytes();

        // The peripheral needs a moment to settle; the first two blocks
        // are discarded unseen.
        self.read_block().await?;
        self.read_block().await?;

        info!(target_bytes = target, "recording start");
        let mut written: u32 = 0;
        while written < target {
            let block = self.read_block().await?;
            let scaled = scale_block(&block);
            // An undersized block would make no progress and loop forever
            if scaled.is_empty() {
                return Err(SessionError::Audio(AudioInputError::ReadFailed(format!(
                    "block of {} bytes from peripheral",
                    block.len()
                ))));
            }
            // Clamp the final block so the payload matches the header's
            // declared data size exactly.
            let remaining = (target - written) as usize;
            let take = remaining.min(scaled.len());
            sink.append(&scaled[..take]).await?;
            written += take as u32;
            debug!(
                percent = written as u64 * 100 / target as u64,
                "capture progress"
            );
        }

        Ok(())
    }

    async fn read_block(&self) -> Result<Vec<u8>, SessionError> {
        match timeout(self.settings.read_timeout, self.audio.read_block()).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(SessionError::CaptureTimeout(self.settings.read_timeout)),
        }
    }

    /// Poll the detector at a fixed interval for the sensing window.
    /// Returns true if any sample in the window triggered.
    async fn poll_window(&self) -> Result<bool, SessionError> {
        let mut vibration = false;
        let started = Instant::now();

        while started.elapsed() < self.settings.sensing_window {
            let sample = self.read_calibrated().await?;
            if let Ok(mut detector) = self.detector.lock() {
                if detector.update(sample) {
                    vibration = true;
                }
            }
            tokio::time::sleep(self.settings.poll_interval).await;
        }

        Ok(vibration)
    }

    /// Read and calibrate one sample, retrying transient sensor failures
    async fn read_calibrated(&self) -> Result<CalibratedSample, SessionError> {
        let mut attempt = 1;
        loop {
            match self.accelerometer.read_axes().await {
                Ok(raw) => return Ok(self.settings.offsets.calibrate(raw)),
                Err(e) if attempt < SENSOR_READ_ATTEMPTS => {
                    warn!(error = %e, attempt, "accelerometer read failed, retrying");
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::CollectorError;
    use crate::domain::acceleration::RawAcceleration;
    use crate::domain::format::BLOCK_SIZE;
    use crate::domain::wav::WAV_HEADER_SIZE;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

    // Mock implementations for testing

    struct ScriptedAccelerometer {
        readings: StdMutex<VecDeque<RawAcceleration>>,
        fallback: RawAcceleration,
        calls: AtomicU32,
    }

    impl ScriptedAccelerometer {
        fn steady(raw: RawAcceleration) -> Self {
            Self {
                readings: StdMutex::new(VecDeque::new()),
                fallback: raw,
                calls: AtomicU32::new(0),
            }
        }

        fn with_script(script: Vec<RawAcceleration>, fallback: RawAcceleration) -> Self {
            Self {
                readings: StdMutex::new(script.into()),
                fallback,
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl Accelerometer for ScriptedAccelerometer {
        async fn read_axes(&self) -> Result<RawAcceleration, SensorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self.readings.lock().unwrap().pop_front();
            Ok(next.unwrap_or(self.fallback))
        }
    }

    struct FailingAccelerometer {
        calls: AtomicU32,
    }

    #[async_trait]
    impl Accelerometer for FailingAccelerometer {
        async fn read_axes(&self) -> Result<RawAcceleration, SensorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(SensorError::ReadFailed("bus stuck".to_string()))
        }
    }

    struct ZeroAudio;

    #[async_trait]
    impl AudioInput for ZeroAudio {
        async fn read_block(&self) -> Result<Vec<u8>, AudioInputError> {
            Ok(vec![0u8; BLOCK_SIZE])
        }
    }

    struct StalledAudio;

    #[async_trait]
    impl AudioInput for StalledAudio {
        async fn read_block(&self) -> Result<Vec<u8>, AudioInputError> {
            std::future::pending().await
        }
    }

    struct EmptyAudio;

    #[async_trait]
    impl AudioInput for EmptyAudio {
        async fn read_block(&self) -> Result<Vec<u8>, AudioInputError> {
            Ok(Vec::new())
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        buffer: Arc<StdMutex<Vec<u8>>>,
        appends: Arc<AtomicU32>,
        discarded: Arc<AtomicBool>,
        fail_begin: bool,
    }

    struct MemorySink {
        buffer: Arc<StdMutex<Vec<u8>>>,
        appends: Arc<AtomicU32>,
    }

    #[async_trait]
    impl RecordingSink for MemorySink {
        async fn append(&mut self, chunk: &[u8]) -> Result<(), StorageError> {
            self.appends.fetch_add(1, Ordering::SeqCst);
            self.buffer.lock().unwrap().extend_from_slice(chunk);
            Ok(())
        }

        async fn close(self: Box<Self>) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[async_trait]
    impl RecordingStore for MemoryStore {
        async fn begin(&self) -> Result<Box<dyn RecordingSink>, StorageError> {
            if self.fail_begin {
                return Err(StorageError::CreateFailed("store full".to_string()));
            }
            self.buffer.lock().unwrap().clear();
            Ok(Box::new(MemorySink {
                buffer: Arc::clone(&self.buffer),
                appends: Arc::clone(&self.appends),
            }))
        }

        async fn discard(&self) -> Result<(), StorageError> {
            self.discarded.store(true, Ordering::SeqCst);
            self.buffer.lock().unwrap().clear();
            Ok(())
        }

        async fn read_latest(&self) -> Result<Vec<u8>, StorageError> {
            let buffer = self.buffer.lock().unwrap();
            if buffer.is_empty() {
                return Err(StorageError::NotFound);
            }
            Ok(buffer.clone())
        }
    }

    #[derive(Default)]
    struct MockCollector {
        calls: StdMutex<Vec<bool>>,
    }

    #[async_trait]
    impl CollectorNotifier for MockCollector {
        async fn recording_complete(&self, vibration_detected: bool) -> Result<(), CollectorError> {
            self.calls.lock().unwrap().push(vibration_detected);
            Ok(())
        }
    }

    fn fast_settings() -> RecorderSettings {
        RecorderSettings {
            // Raw counts map 1:1 to milli-g in tests
            offsets: AxisOffsets::new(0.0, 0.0, 0.0),
            ..RecorderSettings::default()
        }
    }

    fn use_case(
        accelerometer: Arc<dyn Accelerometer>,
        audio: Arc<dyn AudioInput>,
        store: Arc<dyn RecordingStore>,
        collector: Arc<dyn CollectorNotifier>,
        settings: RecorderSettings,
    ) -> RecordSessionUseCase {
        RecordSessionUseCase::new(accelerometer, audio, store, collector, settings)
    }

    async fn run_to_completion(use_case: &RecordSessionUseCase) {
        use_case.start().await.unwrap();
        // Subscribe after start: the state is already HeaderWritten, so
        // waiting for Idle means waiting for the worker to finish.
        let mut rx = use_case.subscribe();
        rx.wait_for(|s| *s == RecorderState::Idle).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn session_writes_header_then_exact_payload() {
        let store = Arc::new(MemoryStore::default());
        let collector = Arc::new(MockCollector::default());
        let uc = use_case(
            Arc::new(ScriptedAccelerometer::steady(RawAcceleration { x: 0, y: 0, z: 0 })),
            Arc::new(ZeroAudio),
            Arc::clone(&store) as Arc<dyn RecordingStore>,
            Arc::clone(&collector) as Arc<dyn CollectorNotifier>,
            fast_settings(),
        );

        run_to_completion(&uc).await;

        let bytes = store.buffer.lock().unwrap().clone();
        assert_eq!(bytes.len(), WAV_HEADER_SIZE + 160_000);

        let format = RecordingFormat::default();
        assert_eq!(&bytes[..WAV_HEADER_SIZE], &wav_header(160_000, &format));
        // Scaled silence is all zeros
        assert!(bytes[WAV_HEADER_SIZE..].iter().all(|&b| b == 0));

        assert!(matches!(
            uc.last_outcome(),
            Some(RecordingOutcome::Completed {
                vibration_detected: false
            })
        ));
        assert_eq!(*collector.calls.lock().unwrap(), vec![false]);
    }

    #[tokio::test(start_paused = true)]
    async fn append_count_is_exact_when_target_divides_evenly() {
        // byte_rate 16384 -> target 32768 = exactly two blocks
        let mut settings = fast_settings();
        settings.format = RecordingFormat {
            sample_rate: 8192,
            bits_per_sample: 16,
            channels: 1,
            record_secs: 2,
        };

        let store = Arc::new(MemoryStore::default());
        let uc = use_case(
            Arc::new(ScriptedAccelerometer::steady(RawAcceleration { x: 0, y: 0, z: 0 })),
            Arc::new(ZeroAudio),
            Arc::clone(&store) as Arc<dyn RecordingStore>,
            Arc::new(MockCollector::default()),
            settings,
        );

        run_to_completion(&uc).await;

        // One header append plus exactly target / block_size payload appends
        assert_eq!(store.appends.load(Ordering::SeqCst), 1 + 2);
        assert_eq!(
            store.buffer.lock().unwrap().len(),
            WAV_HEADER_SIZE + 32_768
        );
    }

    #[tokio::test]
    async fn second_trigger_while_active_is_rejected() {
        let uc = use_case(
            Arc::new(ScriptedAccelerometer::steady(RawAcceleration { x: 0, y: 0, z: 0 })),
            Arc::new(StalledAudio),
            Arc::new(MemoryStore::default()),
            Arc::new(MockCollector::default()),
            fast_settings(),
        );

        uc.start().await.unwrap();
        let second = uc.start().await;
        assert!(matches!(second, Err(StartError::AlreadyRecording)));
    }

    #[tokio::test(start_paused = true)]
    async fn poll_window_reports_vibration_from_any_sample() {
        // Logged sample, then one big X jump early in the window, then
        // sub-threshold drift for the rest of it.
        let script = vec![
            RawAcceleration { x: 0, y: 0, z: 0 },   // post-capture logged sample
            RawAcceleration { x: 300, y: 0, z: 0 }, // delta 0.30 g -> trigger
            RawAcceleration { x: 250, y: 0, z: 0 }, // delta 0.05 g
        ];
        let collector = Arc::new(MockCollector::default());
        let uc = use_case(
            Arc::new(ScriptedAccelerometer::with_script(
                script,
                RawAcceleration { x: 250, y: 0, z: 0 },
            )),
            Arc::new(ZeroAudio),
            Arc::new(MemoryStore::default()),
            Arc::clone(&collector) as Arc<dyn CollectorNotifier>,
            fast_settings(),
        );

        run_to_completion(&uc).await;

        assert!(matches!(
            uc.last_outcome(),
            Some(RecordingOutcome::Completed {
                vibration_detected: true
            })
        ));
        assert_eq!(*collector.calls.lock().unwrap(), vec![true]);
    }

    #[tokio::test(start_paused = true)]
    async fn z_axis_jumps_do_not_report_vibration() {
        let script = vec![
            RawAcceleration { x: 0, y: 0, z: 0 },
            RawAcceleration { x: 0, y: 0, z: 5000 },
            RawAcceleration { x: 0, y: 0, z: -5000 },
        ];
        let collector = Arc::new(MockCollector::default());
        let uc = use_case(
            Arc::new(ScriptedAccelerometer::with_script(
                script,
                RawAcceleration { x: 0, y: 0, z: 0 },
            )),
            Arc::new(ZeroAudio),
            Arc::new(MemoryStore::default()),
            Arc::clone(&collector) as Arc<dyn CollectorNotifier>,
            fast_settings(),
        );

        run_to_completion(&uc).await;

        assert_eq!(*collector.calls.lock().unwrap(), vec![false]);
    }

    #[tokio::test(start_paused = true)]
    async fn capture_timeout_aborts_and_discards_partial_file() {
        let mut settings = fast_settings();
        settings.read_timeout = Duration::from_millis(50);

        let store = Arc::new(MemoryStore::default());
        let collector = Arc::new(MockCollector::default());
        let uc = use_case(
            Arc::new(ScriptedAccelerometer::steady(RawAcceleration { x: 0, y: 0, z: 0 })),
            Arc::new(StalledAudio),
            Arc::clone(&store) as Arc<dyn RecordingStore>,
            Arc::clone(&collector) as Arc<dyn CollectorNotifier>,
            settings,
        );

        run_to_completion(&uc).await;

        assert!(matches!(
            uc.last_outcome(),
            Some(RecordingOutcome::Failed { .. })
        ));
        assert!(store.discarded.load(Ordering::SeqCst));
        assert!(collector.calls.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn empty_audio_blocks_fail_the_session() {
        let store = Arc::new(MemoryStore::default());
        let collector = Arc::new(MockCollector::default());
        let uc = use_case(
            Arc::new(ScriptedAccelerometer::steady(RawAcceleration { x: 0, y: 0, z: 0 })),
            Arc::new(EmptyAudio),
            Arc::clone(&store) as Arc<dyn RecordingStore>,
            Arc::clone(&collector) as Arc<dyn CollectorNotifier>,
            fast_settings(),
        );

        run_to_completion(&uc).await;

        // Zero-length blocks must abort the capture, not spin on it
        assert!(matches!(
            uc.last_outcome(),
            Some(RecordingOutcome::Failed { .. })
        ));
        assert!(store.discarded.load(Ordering::SeqCst));
        assert!(collector.calls.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn sensor_failure_aborts_after_bounded_retries() {
        let accelerometer = Arc::new(FailingAccelerometer {
            calls: AtomicU32::new(0),
        });
        let collector = Arc::new(MockCollector::default());
        let uc = use_case(
            Arc::clone(&accelerometer) as Arc<dyn Accelerometer>,
            Arc::new(ZeroAudio),
            Arc::new(MemoryStore::default()),
            Arc::clone(&collector) as Arc<dyn CollectorNotifier>,
            fast_settings(),
        );

        run_to_completion(&uc).await;

        assert!(matches!(
            uc.last_outcome(),
            Some(RecordingOutcome::Failed { .. })
        ));
        // The first post-capture read gave up after the retry bound
        assert_eq!(accelerometer.calls.load(Ordering::SeqCst), SENSOR_READ_ATTEMPTS);
        assert!(collector.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn file_open_failure_surfaces_and_releases_the_permit() {
        let store = Arc::new(MemoryStore {
            fail_begin: true,
            ..MemoryStore::default()
        });
        let uc = use_case(
            Arc::new(ScriptedAccelerometer::steady(RawAcceleration { x: 0, y: 0, z: 0 })),
            Arc::new(ZeroAudio),
            store,
            Arc::new(MockCollector::default()),
            fast_settings(),
        );

        assert!(matches!(
            uc.start().await,
            Err(StartError::Storage(StorageError::CreateFailed(_)))
        ));
        // Not AlreadyRecording: the failed attempt released its slot
        assert!(matches!(
            uc.start().await,
            Err(StartError::Storage(StorageError::CreateFailed(_)))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn retriggering_replaces_the_prior_artifact() {
        let store = Arc::new(MemoryStore::default());
        let uc = use_case(
            Arc::new(ScriptedAccelerometer::steady(RawAcceleration { x: 0, y: 0, z: 0 })),
            Arc::new(ZeroAudio),
            Arc::clone(&store) as Arc<dyn RecordingStore>,
            Arc::new(MockCollector::default()),
            fast_settings(),
        );

        run_to_completion(&uc).await;
        let first_len = store.buffer.lock().unwrap().len();

        run_to_completion(&uc).await;
        let second_len = store.buffer.lock().unwrap().len();

        // Same shape, not appended to
        assert_eq!(first_len, WAV_HEADER_SIZE + 160_000);
        assert_eq!(second_len, first_len);
    }
}
