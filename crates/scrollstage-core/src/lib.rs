//! # Scrollstage Core
//!
//! `scrollstage-core` drives a 3D product page from the scroll bar: one
//! normalized scroll progress value moves the camera, turns and slides the
//! model and fades the section copy in and out, all phase-locked to a single
//! master clock. Number counters count up the first time they scroll into
//! view.
//!
//! ## Core Features
//!
//! *   **Keyframe Tracks**: anchor + `(target, duration, easing)` segments, exact at every keyframe.
//! *   **Timeline**: camera, object and document tracks on one master axis; a pure function of progress.
//! *   **Scroll Smoothing**: exponential scrub toward the raw scroll position.
//! *   **Counters**: one-shot, visibility-triggered count-up animations.
//! *   **Render Loop**: matrix refresh, look-at and draw, decoupled from timeline updates.
//! *   **Scripting**: timelines can be authored in [Rhai](https://rhai.rs/).
//!
//! ## Usage
//!
//! ```rust,no_run
//! use scrollstage_core::{showcase, ChannelVisibility, Stage, StageConfig};
//!
//! let (visibility, _reporter) = ChannelVisibility::new();
//! let mut stage = Stage::new(
//!     StageConfig::default(),
//!     showcase::timeline(),
//!     showcase::document(),
//!     Box::new(visibility),
//! );
//! ```

/// Easing functions.
pub mod animation;

/// Stage configuration with serde defaults.
pub mod config;

/// Visibility-triggered number counters.
pub mod counter;

/// In-memory document and selector matching.
pub mod dom;

pub mod errors;

/// Per-frame draw driver.
pub mod render_loop;

/// Camera, model and the engine context.
pub mod scene;

/// Rhai scripting API bindings.
pub mod scripting;

/// Scroll offset to smoothed progress.
pub mod scroll;

/// The original product page's choreography.
pub mod showcase;

/// The frame coordinator.
pub mod stage;

/// The master clock and its tracks.
pub mod timeline;

/// Keyframe tracks and window timing.
pub mod track;

/// Shared data structures.
pub mod types;

/// Viewport visibility capability.
pub mod visibility;

pub use animation::EasingType;
pub use config::StageConfig;
pub use counter::{CounterPhase, CounterState, VisibilityCounterAnimator};
pub use dom::{Document, Element, StyleProperty};
pub use errors::EngineError;
pub use render_loop::{FrameView, RenderLoop, SceneRenderer};
pub use scene::{LoadedModel, ModelBounds, StageContext};
pub use scroll::{ProgressSample, ScrollProgressSource};
pub use stage::{Stage, StageStatus};
pub use timeline::{DomTransition, ObjectProperty, Timeline, TimelineSample, Track};
pub use track::KeyframeTrack;
pub use types::Vec3;
pub use visibility::{ChannelVisibility, ObservesVisibility, VisibilityReporter};

use anyhow::Result;
use tracing::instrument;

/// A trait for abstracting how the 3D model reaches the engine.
///
/// The engine never decodes geometry; a loader only reports what was loaded
/// and its bounds. Hosts plug in their own (glTF, network, archive, ...).
pub trait ModelLoader {
    /// Loads the model identified by `path`.
    fn load_model(&self, path: &str) -> Result<LoadedModel>;
}

/// Reads a [`LoadedModel`] description (name, bounds) from a JSON file,
/// trying `path` first and then `assets/<path>`.
pub struct DefaultModelLoader;

impl ModelLoader for DefaultModelLoader {
    #[instrument(level = "debug", skip(self), fields(path = path))]
    fn load_model(&self, path: &str) -> Result<LoadedModel> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(_) => {
                let alt = format!("assets/{}", path);
                std::fs::read(&alt).map_err(|e| {
                    anyhow::anyhow!(
                        "Model not found: {} (checked '{}' and '{}'): {}",
                        path,
                        path,
                        alt,
                        e
                    )
                })?
            }
        };
        let model: LoadedModel = serde_json::from_slice(&bytes)?;
        Ok(model)
    }
}
