//! # Lifecycle API
//!
//! Timeline creation for Rhai scripts.
//!
//! ## Responsibilities
//! - **Creation**: `new_timeline()` (auto length) and `new_timeline(length)`
//! - **Queries**: `length(tl)`, `track_count(tl)`

use crate::timeline::Timeline;
use rhai::{Dynamic, Engine, EvalAltResult};

use super::super::types::TimelineHandle;
use super::super::utils::to_f64;

/// Register lifecycle-related Rhai functions.
pub fn register(engine: &mut Engine) {
    engine.register_type_with_name::<TimelineHandle>("Timeline");

    engine.register_fn("new_timeline", || TimelineHandle::new(Timeline::auto()));

    engine.register_fn(
        "new_timeline",
        |length: Dynamic| -> Result<TimelineHandle, Box<EvalAltResult>> {
            let length = to_f64(&length, "length")?;
            if !length.is_finite() || length < 0.0 {
                return Err(format!("timeline length must be >= 0, got {}", length).into());
            }
            Ok(TimelineHandle::new(Timeline::new(length)))
        },
    );

    engine.register_fn(
        "length",
        |tl: &mut TimelineHandle| -> Result<f64, Box<EvalAltResult>> { Ok(tl.lock()?.duration()) },
    );

    engine.register_fn(
        "track_count",
        |tl: &mut TimelineHandle| -> Result<i64, Box<EvalAltResult>> {
            Ok(tl.lock()?.tracks().len() as i64)
        },
    );
}
