//! Accelerometer adapters

mod iio;

pub use iio::IioAccelerometer;
