//! Linux IIO sysfs accelerometer adapter
//!
//! Reads raw axis counts from an industrial-I/O device directory, e.g.
//! `/sys/bus/iio/devices/iio:device0/in_accel_x_raw`. The kernel driver
//! owns the bus; each read returns the sensor's live register value.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::application::ports::{Accelerometer, SensorError};
use crate::domain::acceleration::RawAcceleration;

/// Default IIO device directory for the onboard accelerometer
pub const DEFAULT_IIO_DEVICE: &str = "/sys/bus/iio/devices/iio:device0";

/// Accelerometer backed by the Linux IIO sysfs interface
pub struct IioAccelerometer {
    device_dir: PathBuf,
}

impl IioAccelerometer {
    /// Create an adapter for the default device directory
    pub fn new() -> Self {
        Self::with_device(DEFAULT_IIO_DEVICE)
    }

    /// Create an adapter for a specific IIO device directory
    pub fn with_device(device_dir: impl Into<PathBuf>) -> Self {
        Self {
            device_dir: device_dir.into(),
        }
    }

    /// The device directory this adapter reads from
    pub fn device_dir(&self) -> &Path {
        &self.device_dir
    }

    async fn read_axis(&self, attribute: &str) -> Result<i16, SensorError> {
        let path = self.device_dir.join(attribute);
        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| SensorError::ReadFailed(format!("{}: {}", path.display(), e)))?;

        content
            .trim()
            .parse::<i16>()
            .map_err(|e| SensorError::InvalidData(format!("{}: {}", attribute, e)))
    }
}

impl Default for IioAccelerometer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Accelerometer for IioAccelerometer {
    async fn read_axes(&self) -> Result<RawAcceleration, SensorError> {
        let x = self.read_axis("in_accel_x_raw").await?;
        let y = self.read_axis("in_accel_y_raw").await?;
        let z = self.read_axis("in_accel_z_raw").await?;
        Ok(RawAcceleration { x, y, z })
    }
}
