//! Accelerometer port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::acceleration::RawAcceleration;

/// Sensor transport errors
#[derive(Debug, Clone, Error)]
pub enum SensorError {
    #[error("Failed to read accelerometer: {0}")]
    ReadFailed(String),

    #[error("Accelerometer returned malformed data: {0}")]
    InvalidData(String),
}

/// Port for the 3-axis motion sensor
#[async_trait]
pub trait Accelerometer: Send + Sync {
    /// Read the raw axis counts from the sensor's live registers
    async fn read_axes(&self) -> Result<RawAcceleration, SensorError>;
}
