//! # Stage Configuration
//!
//! Tunables for a stage. Every field has a default matching the original
//! product page, so a stage file only needs to name what it changes.

use crate::types::Vec3;
use serde::{Deserialize, Serialize};

/// Perspective camera settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Camera position before the timeline is installed.
    pub initial_position: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.1,
            far: 1000.0,
            initial_position: Vec3::new(2.0, 2.0, 4.0),
        }
    }
}

/// Viewport size in pixels.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// Configuration for a [`Stage`](crate::stage::Stage).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Seconds the smoothed progress lags behind the raw scroll position.
    /// `0.0` disables smoothing.
    pub scrub_seconds: f64,
    /// Expected frame rate, used to turn `scrub_seconds` into a per-frame factor.
    pub frame_rate: f64,
    /// Duration of a number counter animation in milliseconds.
    pub counter_duration_ms: f64,
    /// Visible fraction of a counter element that triggers it.
    pub visibility_threshold: f32,
    pub camera: CameraConfig,
    /// Point the camera looks at every frame.
    pub focal_point: Vec3,
    /// Largest dimension of the model after normalization.
    pub model_target_size: f32,
    /// Height of the ground plane the model rests on.
    pub ground_y: f32,
    pub viewport: Viewport,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            scrub_seconds: 0.5,
            frame_rate: 60.0,
            counter_duration_ms: 2000.0,
            visibility_threshold: 0.5,
            camera: CameraConfig::default(),
            focal_point: Vec3::ZERO,
            model_target_size: 3.5,
            ground_y: -0.5,
            viewport: Viewport::default(),
        }
    }
}

impl StageConfig {
    /// Per-frame smoothing factor for the scroll source.
    ///
    /// Chosen so the smoothed value covers ~95% of a step change within
    /// `scrub_seconds`.
    pub fn scrub_factor(&self) -> f64 {
        if self.scrub_seconds <= 0.0 || self.frame_rate <= 0.0 {
            return 1.0;
        }
        1.0 - (-3.0 / (self.frame_rate * self.scrub_seconds)).exp()
    }
}
