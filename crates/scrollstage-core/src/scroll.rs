//! # Scroll Progress
//!
//! Converts the page scroll offset into normalized progress and damps it
//! once per frame so fast wheel deltas don't make the scene jitter.

use crate::config::StageConfig;
use crate::errors::EngineError;
use serde::Serialize;
use tracing::debug;

/// Below this distance the smoothed value snaps onto the raw one.
const SETTLE_EPSILON: f64 = 1e-4;

/// Raw and smoothed scroll progress.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct ProgressSample {
    pub raw: f64,
    pub smoothed: f64,
}

/// Maps scroll position to timeline progress with exponential smoothing.
#[derive(Clone, Debug)]
pub struct ScrollProgressSource {
    sample: ProgressSample,
    scrub_factor: f64,
}

impl ScrollProgressSource {
    /// `scrub_factor` is the share of the remaining distance covered per
    /// frame; `1.0` follows the scroll position exactly.
    pub fn new(scrub_factor: f64) -> Self {
        let scrub_factor = if scrub_factor.is_finite() {
            scrub_factor.clamp(f64::EPSILON, 1.0)
        } else {
            1.0
        };
        Self {
            sample: ProgressSample::default(),
            scrub_factor,
        }
    }

    pub fn from_config(config: &StageConfig) -> Self {
        Self::new(config.scrub_factor())
    }

    /// Normalizes a scroll offset against the scrollable range.
    pub fn measure(offset: f64, range: f64) -> Result<f64, EngineError> {
        if !(range.is_finite() && range > 0.0) {
            return Err(EngineError::DegenerateScrollRange(range));
        }
        if offset.is_nan() {
            return Ok(0.0);
        }
        Ok((offset / range).clamp(0.0, 1.0))
    }

    /// Records a scroll event. A page shorter than the viewport holds progress at 0.
    pub fn on_scroll(&mut self, offset: f64, range: f64) {
        self.sample.raw = match Self::measure(offset, range) {
            Ok(progress) => progress,
            Err(e) => {
                debug!("{}, holding progress at 0", e);
                0.0
            }
        };
    }

    /// Advances the smoothed value by one frame and returns it.
    pub fn step(&mut self) -> f64 {
        let ProgressSample { raw, smoothed } = self.sample;
        let next = smoothed + (raw - smoothed) * self.scrub_factor;
        self.sample.smoothed = if (raw - next).abs() < SETTLE_EPSILON {
            raw
        } else {
            next
        };
        self.sample.smoothed
    }

    /// Makes the smoothed value catch up immediately (e.g. after a jump link).
    pub fn settle(&mut self) {
        self.sample.smoothed = self.sample.raw;
    }

    pub fn sample(&self) -> ProgressSample {
        self.sample
    }

    pub fn scrub_factor(&self) -> f64 {
        self.scrub_factor
    }

    pub fn is_settled(&self) -> bool {
        self.sample.raw == self.sample.smoothed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_progress_is_clamped() {
        assert_eq!(ScrollProgressSource::measure(250.0, 1000.0).unwrap(), 0.25);
        assert_eq!(ScrollProgressSource::measure(-40.0, 1000.0).unwrap(), 0.0);
        assert_eq!(ScrollProgressSource::measure(4000.0, 1000.0).unwrap(), 1.0);
    }

    #[test]
    fn degenerate_range_holds_zero() {
        assert!(matches!(
            ScrollProgressSource::measure(10.0, 0.0),
            Err(EngineError::DegenerateScrollRange(_))
        ));
        let mut source = ScrollProgressSource::new(1.0);
        source.on_scroll(500.0, 1000.0);
        source.on_scroll(500.0, 0.0);
        assert_eq!(source.sample().raw, 0.0);
        source.on_scroll(10.0, -5.0);
        assert_eq!(source.step(), 0.0);
    }

    #[test]
    fn smoothing_converges_monotonically() {
        let mut source = ScrollProgressSource::new(0.1);
        source.on_scroll(800.0, 1000.0);
        let mut last = 0.0;
        let mut frames = 0;
        while !source.is_settled() {
            let p = source.step();
            assert!(p > last && p <= 0.8);
            last = p;
            frames += 1;
            assert!(frames < 500, "smoothing never settled");
        }
        assert_eq!(source.sample().smoothed, 0.8);
    }

    #[test]
    fn unit_factor_follows_exactly() {
        let mut source = ScrollProgressSource::new(1.0);
        source.on_scroll(300.0, 1200.0);
        assert_eq!(source.step(), 0.25);
    }

    #[test]
    fn settle_jumps_to_raw() {
        let mut source = ScrollProgressSource::new(0.05);
        source.on_scroll(1000.0, 1000.0);
        source.step();
        source.settle();
        assert!(source.is_settled());
        assert_eq!(source.sample().smoothed, 1.0);
    }
}
