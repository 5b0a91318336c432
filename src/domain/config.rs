//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::acceleration::AxisOffsets;
use crate::domain::format::{RecordingFormat, DEFAULT_RECORD_SECS};
use crate::domain::vibration::DEFAULT_THRESHOLD_G;

/// Default address the HTTP surface binds to
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Default collector base URL (the machine that receives completion pings)
pub const DEFAULT_COLLECTOR_URL: &str = "http://127.0.0.1:5000";

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub bind_addr: Option<String>,
    pub collector_url: Option<String>,
    pub storage_dir: Option<String>,
    pub iio_device: Option<String>,
    pub record_secs: Option<u32>,
    pub threshold_g: Option<f32>,
    pub offsets: Option<OffsetConfig>,
}

/// Per-axis calibration offsets as they appear in the config file
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OffsetConfig {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        let offsets = AxisOffsets::default();
        Self {
            bind_addr: Some(DEFAULT_BIND_ADDR.to_string()),
            collector_url: Some(DEFAULT_COLLECTOR_URL.to_string()),
            storage_dir: None,
            iio_device: None,
            record_secs: Some(DEFAULT_RECORD_SECS),
            threshold_g: Some(DEFAULT_THRESHOLD_G),
            offsets: Some(OffsetConfig {
                x: offsets.x,
                y: offsets.y,
                z: offsets.z,
            }),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            bind_addr: other.bind_addr.or(self.bind_addr),
            collector_url: other.collector_url.or(self.collector_url),
            storage_dir: other.storage_dir.or(self.storage_dir),
            iio_device: other.iio_device.or(self.iio_device),
            record_secs: other.record_secs.or(self.record_secs),
            threshold_g: other.threshold_g.or(self.threshold_g),
            offsets: other.offsets.or(self.offsets),
        }
    }

    /// Get the bind address, or the default if not set
    pub fn bind_addr_or_default(&self) -> String {
        self.bind_addr
            .clone()
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
    }

    /// Get the collector base URL, or the default if not set
    pub fn collector_url_or_default(&self) -> String {
        self.collector_url
            .clone()
            .unwrap_or_else(|| DEFAULT_COLLECTOR_URL.to_string())
    }

    /// Get the recording format with the configured duration applied
    pub fn format_or_default(&self) -> RecordingFormat {
        RecordingFormat::with_duration(self.record_secs.unwrap_or(DEFAULT_RECORD_SECS))
    }

    /// Get the vibration threshold in g, or the default if not set
    pub fn threshold_or_default(&self) -> f32 {
        self.threshold_g.unwrap_or(DEFAULT_THRESHOLD_G)
    }

    /// Get the calibration offsets, or the defaults if not set
    pub fn offsets_or_default(&self) -> AxisOffsets {
        self.offsets
            .map(|o| AxisOffsets::new(o.x, o.y, o.z))
            .unwrap_or_default()
    }
}
