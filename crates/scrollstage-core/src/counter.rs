//! # Number Counters
//!
//! One-shot count-up animations for elements carrying `data-target` (and
//! optionally `data-decimals`). Each counter starts the first time at least
//! half of it is visible, counts from 0 with an out-expo curve and then stays
//! put for the rest of the page's life.

use crate::animation::EasingType;
use crate::config::StageConfig;
use crate::dom::Document;
use crate::types::ElementId;
use crate::visibility::ObservesVisibility;
use tracing::{debug, warn};

/// Lifecycle of a counter.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CounterPhase {
    Idle,
    Animating { elapsed_ms: f64 },
    Done,
}

/// Per-element counter state.
#[derive(Clone, Debug, PartialEq)]
pub struct CounterState {
    pub element: ElementId,
    pub target: f64,
    pub decimals: usize,
    pub current: f64,
    pub phase: CounterPhase,
    /// Set once when the counter starts; never cleared.
    pub fired: bool,
    last_text: Option<String>,
}

impl CounterState {
    pub fn new(element: ElementId, target: f64, decimals: usize) -> Self {
        Self {
            element,
            target,
            decimals,
            current: 0.0,
            phase: CounterPhase::Idle,
            fired: false,
            last_text: None,
        }
    }

    /// `current` formatted with the counter's precision.
    pub fn display(&self) -> String {
        format_value(self.current, self.decimals)
    }
}

/// Formats `value` with a fixed number of decimals, never printing `-0`.
pub fn format_value(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, value + 0.0)
}

/// Registry of all counters on the page.
pub struct VisibilityCounterAnimator {
    counters: Vec<CounterState>,
    observer: Box<dyn ObservesVisibility>,
    duration_ms: f64,
    threshold: f32,
    easing: EasingType,
}

impl VisibilityCounterAnimator {
    pub fn new(observer: Box<dyn ObservesVisibility>, duration_ms: f64, threshold: f32) -> Self {
        Self {
            counters: Vec::new(),
            observer,
            duration_ms: duration_ms.max(0.0),
            threshold,
            easing: EasingType::EaseOutExpo,
        }
    }

    pub fn from_config(observer: Box<dyn ObservesVisibility>, config: &StageConfig) -> Self {
        Self::new(
            observer,
            config.counter_duration_ms,
            config.visibility_threshold,
        )
    }

    /// Starts observing `element`.
    pub fn register(&mut self, element: ElementId, target: f64, decimals: usize) {
        if self.counters.iter().any(|c| c.element == element) {
            return;
        }
        self.counters
            .push(CounterState::new(element, target, decimals));
        self.observer.observe(element);
    }

    /// Registers every element with a numeric `data-target` attribute.
    /// Returns how many counters were added.
    pub fn register_document(&mut self, document: &Document) -> usize {
        let before = self.counters.len();
        for (id, element) in document.iter() {
            let Some(raw_target) = element.data.get("target") else {
                continue;
            };
            let target = match raw_target.trim().parse::<f64>() {
                Ok(t) if t.is_finite() => t,
                _ => {
                    warn!(
                        element = id,
                        value = %raw_target,
                        "Ignoring counter with invalid data-target"
                    );
                    continue;
                }
            };
            let decimals = element
                .data
                .get("decimals")
                .and_then(|d| d.trim().parse::<usize>().ok())
                .unwrap_or(0);
            self.register(id, target, decimals);
        }
        let added = self.counters.len() - before;
        debug!(counters = added, "Registered number counters");
        added
    }

    /// Starts counters whose elements crossed the visibility threshold.
    pub fn handle_visibility(&mut self) {
        for change in self.observer.poll() {
            if change.ratio < self.threshold {
                continue;
            }
            let Some(counter) = self
                .counters
                .iter_mut()
                .find(|c| c.element == change.element)
            else {
                continue;
            };
            if counter.fired {
                continue;
            }
            counter.fired = true;
            counter.phase = CounterPhase::Animating { elapsed_ms: 0.0 };
            self.observer.unobserve(change.element);
            debug!(element = change.element, target = counter.target, "Counter started");
        }
    }

    /// Advances running counters by `dt_ms` and writes their text.
    pub fn tick(&mut self, dt_ms: f64, document: &mut Document) {
        let dt_ms = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };
        for counter in &mut self.counters {
            let CounterPhase::Animating { elapsed_ms } = counter.phase else {
                continue;
            };
            let elapsed_ms = elapsed_ms + dt_ms;
            if self.duration_ms <= 0.0 || elapsed_ms >= self.duration_ms {
                counter.current = counter.target;
                counter.phase = CounterPhase::Done;
            } else {
                let eased = self.easing.eval(elapsed_ms / self.duration_ms);
                counter.current = counter.target * eased;
                counter.phase = CounterPhase::Animating { elapsed_ms };
            }

            let text = counter.display();
            if counter.last_text.as_deref() != Some(text.as_str()) {
                document.set_text(counter.element, &text);
                counter.last_text = Some(text);
            }
        }
    }

    pub fn counter(&self, element: ElementId) -> Option<&CounterState> {
        self.counters.iter().find(|c| c.element == element)
    }

    pub fn counters(&self) -> &[CounterState] {
        &self.counters
    }

    /// True while any counter is still counting.
    pub fn is_animating(&self) -> bool {
        self.counters
            .iter()
            .any(|c| matches!(c.phase, CounterPhase::Animating { .. }))
    }

    pub fn observer(&self) -> &dyn ObservesVisibility {
        self.observer.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatting() {
        assert_eq!(format_value(669.6, 0), "670");
        assert_eq!(format_value(2.5, 1), "2.5");
        assert_eq!(format_value(-0.0, 0), "0");
        assert_eq!(format_value(3.14159, 2), "3.14");
    }
}
