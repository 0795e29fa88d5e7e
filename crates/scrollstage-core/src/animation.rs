use keyframe::EasingFunction;
use serde::{Deserialize, Serialize};

/// Supported easing functions for tracks, transitions and counters.
///
/// `Linear` is the "none" ease used by the camera and object tracks;
/// `EaseOutQuad` is the default ease of text transitions and `EaseOutExpo`
/// drives the number counters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseOutExpo,
}

impl EasingFunction for EasingType {
    fn y(&self, x: f64) -> f64 {
        match self {
            EasingType::Linear => keyframe::functions::Linear.y(x),
            EasingType::EaseIn => keyframe::functions::EaseIn.y(x),
            EasingType::EaseOut => keyframe::functions::EaseOut.y(x),
            EasingType::EaseInOut => keyframe::functions::EaseInOut.y(x),
            EasingType::EaseInQuad => x * x,
            EasingType::EaseOutQuad => 1.0 - (1.0 - x) * (1.0 - x),
            EasingType::EaseInOutQuad => {
                if x < 0.5 {
                    2.0 * x * x
                } else {
                    1.0 - (-2.0 * x + 2.0).powi(2) / 2.0
                }
            }
            EasingType::EaseOutExpo => {
                if x >= 1.0 {
                    1.0
                } else {
                    1.0 - 2f64.powf(-10.0 * x)
                }
            }
        }
    }
}

impl EasingType {
    /// Evaluates the easing curve at `x`, clamped to `0.0..=1.0`.
    ///
    /// Both endpoints are exact: `eval(0.0) == 0.0` and `eval(1.0) == 1.0`.
    pub fn eval(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        self.y(x)
    }

    /// Resolves an easing name as written in scripts and stage files.
    ///
    /// Accepts the snake_case names plus the GSAP / anime.js spellings the
    /// page was authored with (`none`, `power1.out`, `outExpo`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        let ease = match name {
            "linear" | "none" => EasingType::Linear,
            "ease_in" | "power2.in" => EasingType::EaseIn,
            "ease_out" | "power2.out" => EasingType::EaseOut,
            "ease_in_out" | "power2.inOut" => EasingType::EaseInOut,
            "ease_in_quad" | "power1.in" | "inQuad" => EasingType::EaseInQuad,
            "ease_out_quad" | "power1.out" | "outQuad" => EasingType::EaseOutQuad,
            "ease_in_out_quad" | "power1.inOut" | "inOutQuad" => EasingType::EaseInOutQuad,
            "ease_out_expo" | "expo.out" | "outExpo" => EasingType::EaseOutExpo,
            _ => return None,
        };
        Some(ease)
    }
}
