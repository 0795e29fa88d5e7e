//! # Scrollstage Engine
//!
//! Facade over the workspace crates:
//!
//! *   [`core`]: timeline, scroll smoothing, counters, render loop and the `Stage`.
//! *   [`schema`]: serde description of a stage.
//! *   [`pipeline`]: turns a description into a running `Stage`.

pub use scrollstage_core as core;
pub use scrollstage_pipeline as pipeline;
pub use scrollstage_schema as schema;

pub use scrollstage_core::{
    showcase, ChannelVisibility, EngineError, SceneRenderer, Stage, StageConfig, Timeline,
};
