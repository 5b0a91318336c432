//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod accelerometer;
pub mod audio_input;
pub mod collector;
pub mod config;
pub mod store;

// Re-export common types
pub use accelerometer::{Accelerometer, SensorError};
pub use audio_input::{AudioInput, AudioInputError};
pub use collector::{CollectorError, CollectorNotifier};
pub use config::ConfigStore;
pub use store::{RecordingSink, RecordingStore, StorageError};
