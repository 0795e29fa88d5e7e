//! # Transitions API
//!
//! `transition(tl, selector, property, from, to, start, duration [, opts])`
//! tweens one style property on every element the selector matches.
//! `opts` may carry `stagger` (time units per element) and `ease`.

use crate::dom::StyleProperty;
use crate::timeline::DomTransition;
use rhai::{Dynamic, Engine, EvalAltResult, Map};

use super::super::types::TimelineHandle;
use super::super::utils::{parse_easing, to_f64};

fn build(
    selector: &str,
    property: &str,
    from: &Dynamic,
    to: &Dynamic,
    start: &Dynamic,
    duration: &Dynamic,
) -> Result<DomTransition, Box<EvalAltResult>> {
    let property = StyleProperty::from_name(property)
        .ok_or_else(|| format!("unknown style property '{}'", property))?;
    let start = to_f64(start, "start")?;
    let duration = to_f64(duration, "duration")?;
    if start < 0.0 || duration < 0.0 {
        return Err(format!("transition on '{}' has a negative time", selector).into());
    }
    Ok(DomTransition::new(
        selector,
        property,
        to_f64(from, "from")? as f32,
        to_f64(to, "to")? as f32,
        start,
        duration,
    ))
}

/// Register transition-related Rhai functions.
pub fn register(engine: &mut Engine) {
    engine.register_fn(
        "transition",
        |tl: &mut TimelineHandle,
         selector: &str,
         property: &str,
         from: Dynamic,
         to: Dynamic,
         start: Dynamic,
         duration: Dynamic|
         -> Result<(), Box<EvalAltResult>> {
            let transition = build(selector, property, &from, &to, &start, &duration)?;
            tl.lock()?.add_transition(transition);
            Ok(())
        },
    );

    engine.register_fn(
        "transition",
        |tl: &mut TimelineHandle,
         selector: &str,
         property: &str,
         from: Dynamic,
         to: Dynamic,
         start: Dynamic,
         duration: Dynamic,
         opts: Map|
         -> Result<(), Box<EvalAltResult>> {
            let mut transition = build(selector, property, &from, &to, &start, &duration)?;
            if let Some(stagger) = opts.get("stagger") {
                transition = transition.with_stagger(to_f64(stagger, "stagger")?);
            }
            if let Some(ease) = opts.get("ease") {
                transition = transition.with_easing(parse_easing(&ease.to_string()));
            }
            tl.lock()?.add_transition(transition);
            Ok(())
        },
    );
}
