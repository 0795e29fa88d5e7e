//! # Keyframe Tracks
//!
//! One animated quantity (camera position, object rotation, ...) described as
//! an anchor value followed by `(target, duration, easing)` segments on a
//! local time axis.
//!
//! ## Timing
//! All window arithmetic in the engine goes through [`window_fraction`], so
//! keyframe segments and document transitions agree on what "before",
//! "during" and "after" mean.

use crate::animation::EasingType;
use keyframe::{AnimationSequence, CanTween};
use std::fmt;
use tracing::warn;

/// Fraction of the window `[start, start + duration)` covered at time `t`.
///
/// Returns `0.0` before the window, `1.0` at or after its end, and the linear
/// position in between. A zero-length window jumps from 0 to 1 at `start`.
pub fn window_fraction(t: f64, start: f64, duration: f64) -> f64 {
    if t < start {
        return 0.0;
    }
    if duration <= 0.0 || t >= start + duration {
        return 1.0;
    }
    (t - start) / duration
}

/// A single keyframe: the value reached after `duration` time units
/// (measured from the previous keyframe), approached with `easing`.
#[derive(Clone, Debug, PartialEq)]
pub struct Keyframe<T> {
    pub value: T,
    pub duration: f64,
    pub easing: EasingType,
}

/// A jump-free stretch of the track played back by `keyframe`.
///
/// `AnimationSequence` keeps one keyframe per timestamp, so every zero
/// duration keyframe opens a new run starting at the same time.
#[derive(Clone)]
struct Run<T> {
    start: f64,
    sequence: AnimationSequence<T>,
}

/// An ordered keyframe sequence for one property.
///
/// The first keyframe is always the anchor (duration 0); the constructor is
/// the only way to create one, so the invariant cannot be broken.
#[derive(Clone)]
pub struct KeyframeTrack<T> {
    keyframes: Vec<Keyframe<T>>,
    runs: Vec<Run<T>>,
    duration: f64,
}

impl<T> KeyframeTrack<T>
where
    T: CanTween + Clone,
{
    /// Creates a track holding `anchor` at local time 0.
    pub fn new(anchor: T) -> Self {
        let mut track = Self {
            keyframes: vec![Keyframe {
                value: anchor,
                duration: 0.0,
                easing: EasingType::Linear,
            }],
            runs: Vec::new(),
            duration: 0.0,
        };
        track.rebuild();
        track
    }

    /// Builder form of [`KeyframeTrack::push`].
    pub fn to(mut self, value: T, duration: f64, easing: EasingType) -> Self {
        self.push(value, duration, easing);
        self
    }

    /// Appends a keyframe reached `duration` units after the previous one.
    ///
    /// A zero duration is an instantaneous jump; negative or non-finite
    /// durations are treated as zero.
    pub fn push(&mut self, value: T, duration: f64, easing: EasingType) {
        let duration = if duration.is_finite() && duration >= 0.0 {
            duration
        } else {
            warn!(duration, "Invalid keyframe duration, using 0");
            0.0
        };
        self.duration += duration;
        self.keyframes.push(Keyframe {
            value,
            duration,
            easing,
        });
        self.rebuild();
    }

    /// Total local duration (sum of all keyframe durations).
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn keyframes(&self) -> &[Keyframe<T>] {
        &self.keyframes
    }

    /// Local time at which each keyframe is reached.
    pub fn keyframe_times(&self) -> Vec<f64> {
        let mut time = 0.0;
        self.keyframes
            .iter()
            .map(|kf| {
                time += kf.duration;
                time
            })
            .collect()
    }

    /// The interpolated value at local time `t`.
    ///
    /// Times before 0 hold the anchor, times at or past the end hold the final
    /// keyframe; nothing is extrapolated. At a keyframe's own time the result
    /// is exactly that keyframe's value.
    pub fn value_at(&self, t: f64) -> T {
        let t = if t.is_nan() { 0.0 } else { t.max(0.0) };
        if t >= self.duration {
            return self.last_value();
        }

        // Later runs win at a shared start, so a jump takes effect at its own time.
        let Some(run) = self.runs.iter().rev().find(|run| run.start <= t) else {
            return self.last_value();
        };
        let mut sequence = run.sequence.clone();
        sequence.advance_to(t);
        sequence.now_strict().unwrap_or_else(|| self.last_value())
    }

    fn last_value(&self) -> T {
        // Never empty: the anchor is inserted on construction.
        self.keyframes[self.keyframes.len() - 1].value.clone()
    }

    /// Splits the keyframes into jump-free runs.
    ///
    /// A segment's easing belongs to the keyframe it approaches, while
    /// `keyframe` eases from the keyframe that opens the segment, so each
    /// sequence keyframe carries the easing of its successor.
    fn rebuild(&mut self) {
        let mut runs: Vec<(f64, Vec<(T, f64, EasingType)>)> = Vec::new();
        let mut time = 0.0;
        for kf in &self.keyframes {
            time += kf.duration;
            if kf.duration > 0.0 {
                if let Some((_, frames)) = runs.last_mut() {
                    if let Some(previous) = frames.last_mut() {
                        previous.2 = kf.easing;
                    }
                    frames.push((kf.value.clone(), time, EasingType::Linear));
                    continue;
                }
            }
            runs.push((time, vec![(kf.value.clone(), time, EasingType::Linear)]));
        }

        self.runs = runs
            .into_iter()
            .map(|(start, frames)| Run {
                start,
                sequence: AnimationSequence::from(
                    frames
                        .into_iter()
                        .map(|(value, time, easing)| keyframe::Keyframe::new(value, time, easing))
                        .collect::<Vec<_>>(),
                ),
            })
            .collect();
    }
}

impl<T: fmt::Debug> fmt::Debug for KeyframeTrack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyframeTrack")
            .field("keyframes", &self.keyframes)
            .field("duration", &self.duration)
            .finish()
    }
}

impl<T: PartialEq> PartialEq for KeyframeTrack<T> {
    fn eq(&self, other: &Self) -> bool {
        self.keyframes == other.keyframes
    }
}
