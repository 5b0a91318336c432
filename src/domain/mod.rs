//! Domain layer - Value objects and pure logic

pub mod acceleration;
pub mod config;
pub mod error;
pub mod format;
pub mod scale;
pub mod vibration;
pub mod wav;
