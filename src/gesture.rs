//! Wrist-flick detection
//!
//! Turns polled accelerometer samples into tap events, one axis and a
//! direction per event. A tap is a sharp change between two consecutive
//! samples that is dominated by a single axis.

use crate::{
    event::{Axis, TapEvent},
    peripherals::accelerometer::AccelSample,
    system::config::WatchfaceConfig,
};

pub struct FlickDetector {
    /// Minimum change between samples on the dominant axis
    threshold: i32,
    /// Dominant axis must exceed each other axis by this factor
    axis_ratio: i32,
    cooldown_ms: u32,
    last_sample: Option<[i16; 3]>,
    last_trigger_ms: Option<u64>,
}

impl FlickDetector {
    pub fn new(threshold: i16, cooldown_ms: u32) -> Self {
        Self {
            threshold: threshold.into(),
            axis_ratio: 2,
            cooldown_ms,
            last_sample: None,
            last_trigger_ms: None,
        }
    }

    pub fn from_config(config: &WatchfaceConfig) -> Self {
        Self::new(config.flick_threshold, config.flick_cooldown_ms)
    }

    /// Feed one sample; returns a tap when one is detected.
    ///
    /// The first sample only primes the detector.
    pub fn update(&mut self, now_ms: u64, sample: &AccelSample) -> Option<TapEvent> {
        let previous = self.last_sample.replace(sample.accel)?;

        if let Some(last) = self.last_trigger_ms {
            if now_ms.saturating_sub(last) < u64::from(self.cooldown_ms) {
                return None;
            }
        }

        let mut jerk = [0i32; 3];
        for (i, delta) in jerk.iter_mut().enumerate() {
            *delta = i32::from(sample.accel[i]) - i32::from(previous[i]);
        }

        let dominant = Axis::ALL
            .into_iter()
            .max_by_key(|axis| jerk[axis.index()].abs())?;
        let peak = jerk[dominant.index()];

        if peak.abs() < self.threshold {
            return None;
        }

        let isolated = Axis::ALL
            .into_iter()
            .filter(|axis| *axis != dominant)
            .all(|axis| jerk[axis.index()].abs() * self.axis_ratio <= peak.abs());
        if !isolated {
            return None;
        }

        self.last_trigger_ms = Some(now_ms);

        let tap = TapEvent {
            axis: dominant,
            direction: if peak > 0 { 1 } else { -1 },
        };

        #[cfg(feature = "defmt")]
        defmt::debug!("Flick detected: {} (jerk {})", tap, peak);

        Some(tap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(x: i16, y: i16, z: i16) -> AccelSample {
        AccelSample { accel: [x, y, z] }
    }

    // Watch lying flat: gravity on Z
    const REST: AccelSample = AccelSample { accel: [0, 0, 512] };

    #[test]
    fn test_first_sample_only_primes() {
        let mut detector = FlickDetector::new(768, 300);
        assert_eq!(detector.update(0, &sample(0, 1000, 512)), None);
    }

    #[test]
    fn test_flick_on_y_axis() {
        let mut detector = FlickDetector::new(768, 300);
        assert_eq!(detector.update(0, &REST), None);
        assert_eq!(
            detector.update(10, &sample(50, 900, 500)),
            Some(TapEvent {
                axis: Axis::Y,
                direction: 1
            })
        );
    }

    #[test]
    fn test_direction_follows_sign() {
        let mut detector = FlickDetector::new(768, 300);
        detector.update(0, &REST);
        assert_eq!(
            detector.update(10, &sample(-1000, 0, 512)),
            Some(TapEvent {
                axis: Axis::X,
                direction: -1
            })
        );
    }

    #[test]
    fn test_slow_motion_ignored() {
        let mut detector = FlickDetector::new(768, 300);
        detector.update(0, &REST);
        assert_eq!(detector.update(10, &sample(0, 300, 480)), None);
        assert_eq!(detector.update(20, &sample(0, 600, 420)), None);
    }

    #[test]
    fn test_multi_axis_shake_ignored() {
        let mut detector = FlickDetector::new(768, 300);
        detector.update(0, &REST);
        assert_eq!(detector.update(10, &sample(700, 900, 512)), None);
    }

    #[test]
    fn test_cooldown() {
        let mut detector = FlickDetector::new(768, 300);
        detector.update(0, &REST);
        assert!(detector.update(10, &sample(0, 900, 512)).is_some());
        // Swing back inside the cooldown window
        assert_eq!(detector.update(20, &REST), None);
        assert_eq!(detector.update(30, &sample(0, 900, 512)), None);
        // After the cooldown
        assert_eq!(
            detector.update(400, &REST),
            Some(TapEvent {
                axis: Axis::Y,
                direction: -1
            })
        );
    }
}
