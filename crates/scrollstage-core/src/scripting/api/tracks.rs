//! # Tracks API
//!
//! Keyframe tracks for the camera and the model.
//!
//! Each function takes an array of `#{x, y, z, duration, ease}` maps and
//! places the track at master time 0.

use crate::timeline::{ObjectProperty, Track};
use rhai::{Array, Engine, EvalAltResult};

use super::super::types::TimelineHandle;
use super::super::utils::parse_vec3_keys;

fn add(tl: &TimelineHandle, track: Track) -> Result<(), Box<EvalAltResult>> {
    tl.lock()?.add_track(track);
    Ok(())
}

/// Register track-related Rhai functions.
pub fn register(engine: &mut Engine) {
    engine.register_fn(
        "camera",
        |tl: &mut TimelineHandle, keys: Array| -> Result<(), Box<EvalAltResult>> {
            add(tl, Track::camera(parse_vec3_keys(&keys)?))
        },
    );

    engine.register_fn(
        "rotation",
        |tl: &mut TimelineHandle, keys: Array| -> Result<(), Box<EvalAltResult>> {
            add(tl, Track::object(ObjectProperty::Rotation, parse_vec3_keys(&keys)?))
        },
    );

    engine.register_fn(
        "position",
        |tl: &mut TimelineHandle, keys: Array| -> Result<(), Box<EvalAltResult>> {
            add(tl, Track::object(ObjectProperty::Position, parse_vec3_keys(&keys)?))
        },
    );
}
