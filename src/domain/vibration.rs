//! Vibration detection from consecutive accelerometer samples

use crate::domain::acceleration::CalibratedSample;

/// Default g-force delta above which an axis counts as vibrating
pub const DEFAULT_THRESHOLD_G: f32 = 0.15;

/// Stateful detector comparing each sample against the previous one.
///
/// Only the X and Y deltas feed the trigger condition. The Z delta is
/// computed for diagnostics but excluded: the sensor mounting leaves Z
/// dominated by gravity and tilt rather than vibration.
#[derive(Debug, Clone)]
pub struct VibrationDetector {
    threshold: f32,
    previous: CalibratedSample,
}

impl VibrationDetector {
    /// Create a detector with the given trigger threshold in g
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            previous: CalibratedSample::ZERO,
        }
    }

    /// Feed one calibrated sample; returns whether it counts as vibration.
    ///
    /// The previous-sample state always advances, whether or not the
    /// threshold was crossed.
    pub fn update(&mut self, sample: CalibratedSample) -> bool {
        let delta_x = (sample.x - self.previous.x).abs();
        let delta_y = (sample.y - self.previous.y).abs();
        let delta_z = (sample.z - self.previous.z).abs();
        tracing::trace!(delta_x, delta_y, delta_z, "axis deltas");

        self.previous = sample;
        delta_x > self.threshold || delta_y > self.threshold
    }

    /// The last sample the detector compared against
    pub fn previous(&self) -> CalibratedSample {
        self.previous
    }
}

impl Default for VibrationDetector {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD_G)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(x: f32, y: f32, z: f32) -> CalibratedSample {
        CalibratedSample { x, y, z }
    }

    #[test]
    fn small_deltas_do_not_trigger() {
        let mut detector = VibrationDetector::default();
        assert!(!detector.update(sample(0.1, 0.1, 0.0)));
        assert!(!detector.update(sample(0.2, 0.05, 0.0)));
    }

    #[test]
    fn x_delta_above_threshold_triggers() {
        let mut detector = VibrationDetector::default();
        detector.update(sample(0.0, 0.0, 0.0));
        assert!(detector.update(sample(0.2, 0.0, 0.0)));
    }

    #[test]
    fn y_delta_above_threshold_triggers() {
        let mut detector = VibrationDetector::default();
        detector.update(sample(0.0, 0.0, 0.0));
        assert!(detector.update(sample(0.0, -0.2, 0.0)));
    }

    #[test]
    fn z_delta_is_excluded_from_trigger() {
        let mut detector = VibrationDetector::default();
        detector.update(sample(0.0, 0.0, 0.0));
        // Large Z jump alone must not trigger
        assert!(!detector.update(sample(0.0, 0.0, 5.0)));
        // But X still does even with an extreme Z
        assert!(detector.update(sample(0.2, 0.0, 10.0)));
    }

    #[test]
    fn state_advances_even_without_trigger() {
        let mut detector = VibrationDetector::default();
        assert!(!detector.update(sample(0.1, 0.0, 0.0)));
        assert_eq!(detector.previous(), sample(0.1, 0.0, 0.0));
        // 0.1 -> 0.22 is only a 0.12 delta; no trigger because state moved
        assert!(!detector.update(sample(0.22, 0.0, 0.0)));
    }

    #[test]
    fn threshold_is_exclusive() {
        let mut detector = VibrationDetector::new(0.15);
        detector.update(sample(0.0, 0.0, 0.0));
        assert!(!detector.update(sample(0.15, 0.0, 0.0)));
    }
}
