//! Vibecap - vibration-gated audio capture service
//!
//! Records a fixed-length audio clip into a WAV artifact when triggered over
//! HTTP, samples an accelerometer for vibration immediately after the clip,
//! and reports the boolean outcome to a remote collector.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Value objects and pure logic (calibration, vibration
//!   detection, WAV header construction, sample rescaling)
//! - **Application**: The recording session use case and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal, IIO sysfs, filesystem, reqwest)
//! - **Server**: HTTP trigger/download surface (axum)

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod server;
