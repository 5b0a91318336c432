//! Accelerometer sample value objects

/// Scale factor applied after offset correction, in g per raw count
/// (1 mg/LSB on the reference sensor).
pub const G_PER_COUNT: f32 = 0.001;

/// Raw axis counts as read from the sensor's data registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawAcceleration {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

/// Fixed per-axis calibration offsets, in raw counts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisOffsets {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl AxisOffsets {
    /// Create offsets from per-axis raw-count corrections
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Convert a raw reading to calibrated g-force values.
    /// Each axis is offset-corrected independently, then scaled.
    pub fn calibrate(&self, raw: RawAcceleration) -> CalibratedSample {
        CalibratedSample {
            x: (raw.x as f32 - self.x) * G_PER_COUNT,
            y: (raw.y as f32 - self.y) * G_PER_COUNT,
            z: (raw.z as f32 - self.z) * G_PER_COUNT,
        }
    }
}

impl Default for AxisOffsets {
    /// Bench-measured offsets for the reference sensor mounting
    fn default() -> Self {
        Self::new(-120.0, -104.0, 1148.0)
    }
}

/// An accelerometer reading after offset correction, in units of g.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibratedSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl CalibratedSample {
    /// The all-zero sample, used as the detector's initial state
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
}
