//! Recording format value object

/// Bytes pulled from the audio peripheral per read operation
pub const BLOCK_SIZE: usize = 16 * 1024;

/// Default capture sample rate in Hz
pub const DEFAULT_SAMPLE_RATE: u32 = 16_000;

/// Default declared bit depth
pub const DEFAULT_BITS_PER_SAMPLE: u16 = 16;

/// Default recording length in seconds
pub const DEFAULT_RECORD_SECS: u32 = 5;

/// Fixed parameters of one recording.
/// Immutable once a session has started; the WAV header is derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordingFormat {
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    pub channels: u16,
    pub record_secs: u32,
}

impl RecordingFormat {
    /// Mono 16 kHz / 16-bit format with a custom duration
    pub const fn with_duration(record_secs: u32) -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            bits_per_sample: DEFAULT_BITS_PER_SAMPLE,
            channels: 1,
            record_secs,
        }
    }

    /// Bytes per sample frame across all channels
    pub const fn block_align(&self) -> u16 {
        self.channels * self.bits_per_sample / 8
    }

    /// Bytes of payload per second of audio
    pub const fn byte_rate(&self) -> u32 {
        self.sample_rate * self.channels as u32 * self.bits_per_sample as u32 / 8
    }

    /// Total payload bytes one recording must produce.
    /// Capture terminates exactly when this many bytes have been written.
    pub const fn target_bytes(&self) -> u32 {
        self.byte_rate() * self.record_secs
    }
}

impl Default for RecordingFormat {
    fn default() -> Self {
        Self::with_duration(DEFAULT_RECORD_SECS)
    }
}
