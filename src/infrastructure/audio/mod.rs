//! Audio input adapters

mod cpal_input;

pub use cpal_input::CpalAudioInput;
