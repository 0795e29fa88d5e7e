//! # Scripting Module
//!
//! Rhai scripting API bindings for authoring scroll timelines.
//!
//! ## Responsibilities
//! - **Engine Setup**: Registers the `Timeline` type and its functions with Rhai.
//! - **Tracks**: `camera`, `rotation`, `position` keyframe tracks.
//! - **Transitions**: `transition` document tweens with optional stagger/ease.
//!
//! ## Pattern
//! All bindings follow: `engine.register_fn("name", |tl, ...| { ... })`
//!
//! ## Module Structure
//! - `types`: Handle types (TimelineHandle)
//! - `utils`: Parsing helpers (numbers, easing, keyframe arrays)
//! - `api/`: Sub-modules for lifecycle, tracks, transitions

mod api;
pub mod types;
pub mod utils;

pub use types::TimelineHandle;

use crate::errors::EngineError;
use crate::timeline::Timeline;
use rhai::Engine;
use tracing::{debug, instrument};

/// Registers the timeline API into the provided Rhai `Engine`.
pub fn register_rhai_api(engine: &mut Engine) {
    api::register_all(engine);
}

/// Evaluates a script whose final expression is a `Timeline`.
#[instrument(level = "debug", skip(script))]
pub fn eval_timeline_script(script: &str) -> Result<Timeline, EngineError> {
    let mut engine = Engine::new();
    register_rhai_api(&mut engine);

    let handle = engine
        .eval::<TimelineHandle>(script)
        .map_err(|e| EngineError::Script(e.to_string()))?;
    let timeline = handle
        .timeline
        .lock()
        .map_err(|_| EngineError::Script("timeline lock poisoned".to_string()))?
        .clone();
    debug!(tracks = timeline.tracks().len(), "Script produced timeline");
    Ok(timeline)
}
