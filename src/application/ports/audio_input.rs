//! Audio input port interface

use async_trait::async_trait;
use thiserror::Error;

/// Audio peripheral errors
#[derive(Debug, Clone, Error)]
pub enum AudioInputError {
    #[error("Failed to start audio input: {0}")]
    StartFailed(String),

    #[error("Failed to read audio block: {0}")]
    ReadFailed(String),

    #[error("No audio input device available")]
    NoAudioDevice,
}

/// Port for the synchronous digital audio peripheral.
///
/// Blocks deliver raw little-endian sample bytes; one call waits until a
/// full block is available. The caller bounds the wait with a timeout.
#[async_trait]
pub trait AudioInput: Send + Sync {
    /// Read one fixed-size block of raw sample bytes
    /// (see [`crate::domain::format::BLOCK_SIZE`])
    async fn read_block(&self) -> Result<Vec<u8>, AudioInputError>;
}
