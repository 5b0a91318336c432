//! Recording store port interface

use async_trait::async_trait;
use thiserror::Error;

/// Persistent store errors
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Failed to create recording file: {0}")]
    CreateFailed(String),

    #[error("Failed to write recording data: {0}")]
    WriteFailed(String),

    #[error("Failed to remove recording file: {0}")]
    RemoveFailed(String),

    #[error("Failed to read recording file: {0}")]
    ReadFailed(String),

    #[error("No recording found")]
    NotFound,
}

/// An open output stream for one in-progress recording.
///
/// Exclusively owned by the active session; dropped or closed when the
/// recording finishes or is aborted.
#[async_trait]
pub trait RecordingSink: Send {
    /// Append a chunk of bytes to the recording
    async fn append(&mut self, chunk: &[u8]) -> Result<(), StorageError>;

    /// Flush and close the recording
    async fn close(self: Box<Self>) -> Result<(), StorageError>;
}

/// Port for the persistent byte store holding the latest recording.
///
/// The store keeps at most one artifact; starting a new recording
/// replaces the previous one.
#[async_trait]
pub trait RecordingStore: Send + Sync {
    /// Delete any prior artifact and open a fresh one for writing
    async fn begin(&self) -> Result<Box<dyn RecordingSink>, StorageError>;

    /// Remove the current artifact (cleanup after a failed session)
    async fn discard(&self) -> Result<(), StorageError>;

    /// Read back the latest completed artifact
    async fn read_latest(&self) -> Result<Vec<u8>, StorageError>;
}
