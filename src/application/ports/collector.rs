//! Collector notification port interface

use async_trait::async_trait;
use thiserror::Error;

/// Notification delivery errors
#[derive(Debug, Clone, Error)]
pub enum CollectorError {
    #[error("Failed to reach collector: {0}")]
    RequestFailed(String),

    #[error("Collector responded with HTTP {0}")]
    BadStatus(u16),
}

/// Port for the remote collector that learns about finished recordings.
///
/// Delivery is best-effort: a failed notification never changes the
/// outcome of the recording itself.
#[async_trait]
pub trait CollectorNotifier: Send + Sync {
    /// Report that a recording completed, and whether vibration was seen
    async fn recording_complete(&self, vibration_detected: bool) -> Result<(), CollectorError>;
}
