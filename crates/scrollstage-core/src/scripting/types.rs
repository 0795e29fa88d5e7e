//! Handle types for Rhai scripting integration.

use crate::timeline::Timeline;
use rhai::EvalAltResult;
use std::sync::{Arc, Mutex, MutexGuard};

/// Wrapper around a `Timeline` under construction.
#[derive(Clone)]
pub struct TimelineHandle {
    pub timeline: Arc<Mutex<Timeline>>,
}

impl TimelineHandle {
    pub fn new(timeline: Timeline) -> Self {
        Self {
            timeline: Arc::new(Mutex::new(timeline)),
        }
    }

    pub fn lock(&self) -> Result<MutexGuard<'_, Timeline>, Box<EvalAltResult>> {
        self.timeline
            .lock()
            .map_err(|_| "timeline lock poisoned".into())
    }
}
