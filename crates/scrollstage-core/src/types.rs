//! # Types Module
//!
//! Shared data types used across the engine.
//!
//! ## Key Types
//! - `Vec3`: Tweenable 3-component vector for positions and Euler rotations.
//! - `ElementId`: Index of an element in the `Document` arena.

use keyframe::CanTween;
use serde::{Deserialize, Serialize};

/// A unique identifier for an element in the document.
pub type ElementId = usize;

/// A 3-component vector (position in world units or Euler angles in radians).
///
/// Interpolates each axis independently and linearly; rotations are never
/// wrapped onto the shortest arc.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Largest of the three components.
    pub fn max_element(&self) -> f32 {
        self.x.max(self.y).max(self.z)
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<Vec3> for glam::Vec3 {
    fn from(v: Vec3) -> Self {
        glam::Vec3::new(v.x, v.y, v.z)
    }
}

impl From<glam::Vec3> for Vec3 {
    fn from(v: glam::Vec3) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(v: [f32; 3]) -> Self {
        Vec3::new(v[0], v[1], v[2])
    }
}

impl CanTween for Vec3 {
    fn ease(from: Self, to: Self, time: impl keyframe::num_traits::Float) -> Self {
        let t = time.to_f64().unwrap_or(0.0);
        let lerp = |a: f32, b: f32| (a as f64 + (b as f64 - a as f64) * t) as f32;
        Self {
            x: lerp(from.x, to.x),
            y: lerp(from.y, to.y),
            z: lerp(from.z, to.z),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tween_is_exact_at_endpoints() {
        let a = Vec3::new(2.0, 2.0, 4.0);
        let b = Vec3::new(6.0, 0.5, 2.0);
        assert_eq!(Vec3::ease(a, b, 0.0f64), a);
        assert_eq!(Vec3::ease(a, b, 1.0f64), b);
        assert_eq!(Vec3::ease(a, b, 0.5f64), Vec3::new(4.0, 1.25, 3.0));
    }

    #[test]
    fn glam_round_trip() {
        let v = Vec3::new(-1.0, 0.0, 4.0);
        let g: glam::Vec3 = v.into();
        assert_eq!(Vec3::from(g), v);
    }
}
