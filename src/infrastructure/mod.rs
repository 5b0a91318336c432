//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with cpal, the Linux IIO sysfs tree, the filesystem,
//! and the remote collector.

pub mod accelerometer;
pub mod audio;
pub mod collector;
pub mod config;
pub mod storage;

// Re-export adapters
pub use accelerometer::IioAccelerometer;
pub use audio::CpalAudioInput;
pub use collector::HttpCollectorNotifier;
pub use config::FileConfigStore;
pub use storage::FsRecordingStore;
