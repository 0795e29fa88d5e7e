//! # API Module
//!
//! Aggregates all Rhai API sub-modules and provides a single registration point.
//!
//! ## Sub-modules
//! - **lifecycle**: Timeline creation and queries
//! - **tracks**: Camera and object keyframe tracks
//! - **transitions**: Document element transitions

pub mod lifecycle;
pub mod tracks;
pub mod transitions;

use rhai::Engine;

/// Register all API functions with the Rhai engine.
pub fn register_all(engine: &mut Engine) {
    lifecycle::register(engine);
    tracks::register(engine);
    transitions::register(engine);
}
