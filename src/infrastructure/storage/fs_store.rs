//! Filesystem recording store adapter
//!
//! Keeps the single latest recording at a fixed path inside the storage
//! directory. Starting a new recording deletes the previous artifact
//! before creating a fresh file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;

use crate::application::ports::{RecordingSink, RecordingStore, StorageError};

/// Fixed name of the recording artifact
pub const RECORDING_FILENAME: &str = "recording.wav";

/// Recording store over a directory on the local filesystem
pub struct FsRecordingStore {
    path: PathBuf,
}

impl FsRecordingStore {
    /// Create a store rooted at the given directory.
    /// The directory is created on first use if it does not exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: dir.into().join(RECORDING_FILENAME),
        }
    }

    /// Full path of the recording artifact
    pub fn recording_path(&self) -> &Path {
        &self.path
    }

    async fn remove_artifact(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::RemoveFailed(e.to_string())),
        }
    }
}

/// Open file handle for one in-progress recording
struct FsRecordingSink {
    file: File,
}

#[async_trait]
impl RecordingSink for FsRecordingSink {
    async fn append(&mut self, chunk: &[u8]) -> Result<(), StorageError> {
        self.file
            .write_all(chunk)
            .await
            .map_err(|e| StorageError::WriteFailed(e.to_string()))
    }

    async fn close(mut self: Box<Self>) -> Result<(), StorageError> {
        self.file
            .flush()
            .await
            .map_err(|e| StorageError::WriteFailed(e.to_string()))
    }
}

#[async_trait]
impl RecordingStore for FsRecordingStore {
    async fn begin(&self) -> Result<Box<dyn RecordingSink>, StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::CreateFailed(e.to_string()))?;
        }

        self.remove_artifact().await?;

        let file = File::create(&self.path)
            .await
            .map_err(|e| StorageError::CreateFailed(e.to_string()))?;

        Ok(Box::new(FsRecordingSink { file }))
    }

    async fn discard(&self) -> Result<(), StorageError> {
        self.remove_artifact().await
    }

    async fn read_latest(&self) -> Result<Vec<u8>, StorageError> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound),
            Err(e) => Err(StorageError::ReadFailed(e.to_string())),
        }
    }
}
