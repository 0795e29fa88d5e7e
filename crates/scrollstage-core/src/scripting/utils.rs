//! # Scripting Utilities
//!
//! Parsing helpers for Rhai script bindings.
//!
//! ## Responsibilities
//! - **Numbers**: `to_f64` accepts both Rhai ints and floats
//! - **Easing**: `parse_easing` with a linear fallback
//! - **Keyframes**: `parse_vec3_keys` builds a `KeyframeTrack<Vec3>` from an array of maps

use crate::animation::EasingType;
use crate::track::KeyframeTrack;
use crate::types::Vec3;
use rhai::{Array, Dynamic, EvalAltResult, Map};
use tracing::warn;

/// Reads a number that may have been written as `1` or `1.0`.
pub fn to_f64(value: &Dynamic, what: &str) -> Result<f64, Box<EvalAltResult>> {
    if let Ok(f) = value.as_float() {
        Ok(f)
    } else if let Ok(i) = value.as_int() {
        Ok(i as f64)
    } else {
        Err(format!("{} must be a number, got {}", what, value.type_name()).into())
    }
}

pub fn parse_easing(ease: &str) -> EasingType {
    EasingType::from_name(ease).unwrap_or_else(|| {
        warn!(ease = ease, "Unknown easing, using linear");
        EasingType::Linear
    })
}

fn component(map: &Map, key: &str, fallback: f32) -> Result<f32, Box<EvalAltResult>> {
    match map.get(key) {
        Some(v) => Ok(to_f64(v, key)? as f32),
        None => Ok(fallback),
    }
}

/// Builds a track from `[#{x, y, z, duration, ease}, ...]`.
///
/// The first entry is the anchor; its `duration` is ignored. Missing
/// components carry over from the previous key (0 for the anchor), so a
/// rotation can be written with `y` only. Segments default to linear.
pub fn parse_vec3_keys(keys: &Array) -> Result<KeyframeTrack<Vec3>, Box<EvalAltResult>> {
    let mut maps = Vec::with_capacity(keys.len());
    for (i, key) in keys.iter().enumerate() {
        let map = key
            .clone()
            .try_cast::<Map>()
            .ok_or_else(|| format!("keyframe {} must be a map", i))?;
        maps.push(map);
    }

    let Some((first, rest)) = maps.split_first() else {
        return Err("a track needs at least one keyframe".into());
    };

    let read = |map: &Map, prev: Vec3| -> Result<Vec3, Box<EvalAltResult>> {
        Ok(Vec3::new(
            component(map, "x", prev.x)?,
            component(map, "y", prev.y)?,
            component(map, "z", prev.z)?,
        ))
    };

    let mut value = read(first, Vec3::ZERO)?;
    let mut track = KeyframeTrack::new(value);
    for map in rest {
        value = read(map, value)?;
        let duration = match map.get("duration") {
            Some(d) => to_f64(d, "duration")?,
            None => 1.0,
        };
        let easing = match map.get("ease") {
            Some(e) => parse_easing(&e.to_string()),
            None => EasingType::Linear,
        };
        track.push(value, duration, easing);
    }
    Ok(track)
}
