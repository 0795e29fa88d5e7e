//! # Timeline
//!
//! The master clock. Scroll progress `p` in `[0, 1]` is mapped linearly onto
//! `[0, length]` and every track is evaluated at that single master time, so
//! camera, model and text stay phase-locked to the scroll position.
//!
//! ## Key Types
//! - `Track`: tagged variant (camera keyframes, object keyframes, document transition).
//! - `DomTransition`: one style property eased between two values over a window.
//! - `TimelineSample`: everything a master time resolves to, before it is written.
//!
//! Sampling is a pure function of master time: no velocity or direction is
//! remembered between calls.

use crate::animation::EasingType;
use crate::dom::{Document, StyleProperty};
use crate::errors::EngineError;
use crate::scene::StageContext;
use crate::track::{window_fraction, KeyframeTrack};
use crate::types::{ElementId, Vec3};
use std::collections::BTreeMap;
use tracing::{debug, trace, warn};

/// Which transform of the model a keyframe track drives.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ObjectProperty {
    Rotation,
    Position,
}

/// A style transition applied to every element a selector matches.
#[derive(Clone, Debug, PartialEq)]
pub struct DomTransition {
    pub selector: String,
    pub property: StyleProperty,
    pub from: f32,
    pub to: f32,
    /// Master time the (first) element starts moving.
    pub start: f64,
    pub duration: f64,
    pub easing: EasingType,
    /// Extra delay per matched element, in master time units.
    pub stagger: f64,
}

impl DomTransition {
    /// A transition with the default text ease (`power1.out`) and no stagger.
    pub fn new(
        selector: &str,
        property: StyleProperty,
        from: f32,
        to: f32,
        start: f64,
        duration: f64,
    ) -> Self {
        Self {
            selector: selector.to_string(),
            property,
            from,
            to,
            start,
            duration: duration.max(0.0),
            easing: EasingType::EaseOutQuad,
            stagger: 0.0,
        }
    }

    pub fn with_easing(mut self, easing: EasingType) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_stagger(mut self, stagger: f64) -> Self {
        self.stagger = stagger.max(0.0);
        self
    }

    /// Start time for the `index`-th matched element.
    pub fn start_for(&self, index: usize) -> f64 {
        self.start + index as f64 * self.stagger
    }

    /// Value for the `index`-th matched element at master time `t`.
    pub fn value_at(&self, t: f64, index: usize) -> f32 {
        let fraction = window_fraction(t, self.start_for(index), self.duration);
        if fraction <= 0.0 {
            return self.from;
        }
        if fraction >= 1.0 {
            return self.to;
        }
        let eased = self.easing.eval(fraction) as f32;
        self.from + (self.to - self.from) * eased
    }
}

/// One entry of the timeline.
#[derive(Clone, Debug, PartialEq)]
pub enum Track {
    Camera {
        start: f64,
        keyframes: KeyframeTrack<Vec3>,
    },
    Object {
        property: ObjectProperty,
        start: f64,
        keyframes: KeyframeTrack<Vec3>,
    },
    Style(DomTransition),
}

/// A value produced by evaluating a track.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TrackValue {
    Vector(Vec3),
    Scalar(f32),
}

impl Track {
    pub fn camera(keyframes: KeyframeTrack<Vec3>) -> Self {
        Track::Camera {
            start: 0.0,
            keyframes,
        }
    }

    pub fn object(property: ObjectProperty, keyframes: KeyframeTrack<Vec3>) -> Self {
        Track::Object {
            property,
            start: 0.0,
            keyframes,
        }
    }

    /// Master time at which the track begins.
    pub fn start(&self) -> f64 {
        match self {
            Track::Camera { start, .. } | Track::Object { start, .. } => *start,
            Track::Style(transition) => transition.start,
        }
    }

    /// Master time at which the track (for `targets` matched elements) ends.
    pub fn end(&self, targets: usize) -> f64 {
        match self {
            Track::Camera { start, keyframes } | Track::Object { start, keyframes, .. } => {
                start + keyframes.duration()
            }
            Track::Style(t) => t.start_for(targets.saturating_sub(1)) + t.duration,
        }
    }

    /// Evaluates the track at master time `t`. `index` selects the staggered
    /// element for style tracks and is ignored otherwise.
    pub fn evaluate(&self, t: f64, index: usize) -> TrackValue {
        match self {
            Track::Camera { start, keyframes } | Track::Object { start, keyframes, .. } => {
                TrackValue::Vector(keyframes.value_at(t - start))
            }
            Track::Style(transition) => TrackValue::Scalar(transition.value_at(t, index)),
        }
    }
}

/// How long the master axis is.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TimelineLength {
    /// A fixed number of units (sections).
    Fixed(f64),
    /// The latest end time of any track.
    Auto,
}

/// Transitions driving one property of one element, ordered by effective start.
#[derive(Clone, Debug, PartialEq)]
struct StyleBinding {
    element: ElementId,
    property: StyleProperty,
    /// `(track index, stagger index, effective start)`
    drivers: Vec<(usize, usize, f64)>,
}

/// Resolved state of the timeline at one master time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimelineSample {
    pub time: f64,
    pub camera_position: Option<Vec3>,
    pub object_rotation: Option<Vec3>,
    pub object_position: Option<Vec3>,
    pub styles: Vec<(ElementId, StyleProperty, f32)>,
}

impl TimelineSample {
    pub fn style(&self, element: ElementId, property: StyleProperty) -> Option<f32> {
        self.styles
            .iter()
            .find(|(e, p, _)| *e == element && *p == property)
            .map(|(_, _, v)| *v)
    }
}

/// Aggregates tracks on a shared master clock.
#[derive(Clone, Debug)]
pub struct Timeline {
    tracks: Vec<Track>,
    length: TimelineLength,
    bindings: Vec<StyleBinding>,
    /// Matched element count per track; filled by `install`.
    targets: Vec<usize>,
    installed: bool,
    progress: f64,
}

impl Timeline {
    /// A timeline whose master axis is `length` units long.
    pub fn new(length: f64) -> Self {
        Self::with_length(TimelineLength::Fixed(length.max(0.0)))
    }

    /// A timeline as long as its longest track.
    pub fn auto() -> Self {
        Self::with_length(TimelineLength::Auto)
    }

    pub fn with_length(length: TimelineLength) -> Self {
        Self {
            tracks: Vec::new(),
            length,
            bindings: Vec::new(),
            targets: Vec::new(),
            installed: false,
            progress: 0.0,
        }
    }

    pub fn add_track(&mut self, track: Track) -> &mut Self {
        self.tracks.push(track);
        self.targets.push(1);
        self.installed = false;
        self
    }

    pub fn add_transition(&mut self, transition: DomTransition) -> &mut Self {
        self.add_track(Track::Style(transition))
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn length(&self) -> TimelineLength {
        self.length
    }

    pub fn is_installed(&self) -> bool {
        self.installed
    }

    /// Length of the master axis.
    pub fn duration(&self) -> f64 {
        match self.length {
            TimelineLength::Fixed(length) => length,
            TimelineLength::Auto => self
                .tracks
                .iter()
                .zip(&self.targets)
                .filter(|(track, targets)| !matches!(track, Track::Style(_)) || **targets > 0)
                .map(|(track, targets)| track.end(*targets))
                .fold(0.0, f64::max),
        }
    }

    /// Master time for progress `p`; `p` is clamped to `[0, 1]`.
    pub fn master_time(&self, progress: f64) -> f64 {
        clamp_progress(progress) * self.duration()
    }

    /// Last progress passed to [`Timeline::set_progress`].
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Resolves every style track's selector against `document`.
    ///
    /// Selectors matching nothing are skipped; the rest of the timeline is
    /// unaffected.
    pub fn install(&mut self, document: &Document) {
        let mut grouped: BTreeMap<(ElementId, StyleProperty), Vec<(usize, usize, f64)>> =
            BTreeMap::new();

        for (index, track) in self.tracks.iter().enumerate() {
            let Track::Style(transition) = track else {
                continue;
            };
            let elements = match document.query_required(&transition.selector) {
                Ok(elements) => elements,
                Err(EngineError::MissingTrackTarget(selector)) => {
                    trace!(selector = %selector, "Skipping transition without targets");
                    self.targets[index] = 0;
                    continue;
                }
                Err(e) => {
                    warn!("Skipping transition: {}", e);
                    self.targets[index] = 0;
                    continue;
                }
            };
            self.targets[index] = elements.len();
            for (order, element) in elements.into_iter().enumerate() {
                grouped
                    .entry((element, transition.property))
                    .or_default()
                    .push((index, order, transition.start_for(order)));
            }
        }

        self.bindings = grouped
            .into_iter()
            .map(|((element, property), mut drivers)| {
                drivers.sort_by(|a, b| a.2.total_cmp(&b.2).then(a.0.cmp(&b.0)));
                StyleBinding {
                    element,
                    property,
                    drivers,
                }
            })
            .collect();
        self.installed = true;
        debug!(
            tracks = self.tracks.len(),
            bindings = self.bindings.len(),
            duration = self.duration(),
            "Timeline installed"
        );
    }

    /// Resolves all tracks at master time `t` without writing anywhere.
    pub fn sample(&self, t: f64) -> TimelineSample {
        let mut sample = TimelineSample {
            time: t,
            ..Default::default()
        };

        for track in &self.tracks {
            let value = match track.evaluate(t, 0) {
                TrackValue::Vector(v) => v,
                TrackValue::Scalar(_) => continue,
            };
            match track {
                Track::Camera { .. } => sample.camera_position = Some(value),
                Track::Object {
                    property: ObjectProperty::Rotation,
                    ..
                } => sample.object_rotation = Some(value),
                Track::Object {
                    property: ObjectProperty::Position,
                    ..
                } => sample.object_position = Some(value),
                Track::Style(_) => {}
            }
        }

        for binding in &self.bindings {
            // The latest driver that has started owns the value; before any
            // has started, the earliest one's `from` holds.
            let driver = binding
                .drivers
                .iter()
                .rev()
                .find(|(_, _, start)| *start <= t)
                .or_else(|| binding.drivers.first());
            if let Some(&(index, order, _)) = driver {
                if let TrackValue::Scalar(v) = self.tracks[index].evaluate(t, order) {
                    sample.styles.push((binding.element, binding.property, v));
                }
            }
        }

        sample
    }

    /// Resolves the timeline at progress `p` and writes it into `context`.
    pub fn set_progress(&mut self, progress: f64, context: &mut StageContext) -> TimelineSample {
        self.progress = clamp_progress(progress);
        let sample = self.sample(self.master_time(progress));
        Self::apply(&sample, context);
        sample
    }

    /// Writes a sample into the scene and document.
    pub fn apply(sample: &TimelineSample, context: &mut StageContext) {
        if let Some(position) = sample.camera_position {
            context.camera.position = position;
        }
        match context.object.as_mut() {
            Some(object) => {
                if let Some(rotation) = sample.object_rotation {
                    object.rotation = rotation;
                }
                if let Some(position) = sample.object_position {
                    object.position = position;
                }
            }
            None => trace!("No model installed, skipping object transforms"),
        }
        for (element, property, value) in &sample.styles {
            context.document.set_style(*element, *property, *value);
        }
    }
}

fn clamp_progress(progress: f64) -> f64 {
    if progress.is_nan() {
        return 0.0;
    }
    progress.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;

    fn reveal_document(count: usize) -> (Document, Vec<ElementId>) {
        let mut doc = Document::new();
        let section = doc.add_element(Element::new().with_id("features"));
        let ids = (0..count)
            .map(|_| doc.add_child(section, Element::new().with_class("reveal")))
            .collect();
        (doc, ids)
    }

    #[test]
    fn transition_phases() {
        let (doc, ids) = reveal_document(1);
        let mut timeline = Timeline::new(5.0);
        timeline.add_transition(
            DomTransition::new("#features .reveal", StyleProperty::Opacity, 0.0, 1.0, 1.2, 0.8)
                .with_easing(EasingType::Linear),
        );
        timeline.install(&doc);

        assert_eq!(timeline.sample(1.0).style(ids[0], StyleProperty::Opacity), Some(0.0));
        let mid = timeline.sample(1.6).style(ids[0], StyleProperty::Opacity).unwrap();
        assert!(mid > 0.0 && mid < 1.0);
        assert_eq!(timeline.sample(2.0).style(ids[0], StyleProperty::Opacity), Some(1.0));
        assert_eq!(timeline.sample(4.0).style(ids[0], StyleProperty::Opacity), Some(1.0));
    }

    #[test]
    fn stagger_delays_each_element() {
        let (doc, ids) = reveal_document(3);
        let mut timeline = Timeline::new(5.0);
        timeline.add_transition(
            DomTransition::new(".reveal", StyleProperty::TranslateX, -100.0, 0.0, 0.4, 0.8)
                .with_stagger(0.05),
        );
        timeline.install(&doc);

        let at = |t: f64, i: usize| {
            timeline
                .sample(t)
                .style(ids[i], StyleProperty::TranslateX)
                .unwrap()
        };
        assert!(at(0.45, 0) > -100.0);
        assert_eq!(at(0.45, 1), -100.0);
        assert_eq!(at(0.5, 2), -100.0);
        assert!(at(0.51, 2) > -100.0);
        assert_eq!(at(1.2, 0), 0.0);
        assert!(at(1.2, 2) < 0.0);
        assert_eq!(at(1.31, 2), 0.0);
    }

    #[test]
    fn later_transition_owns_property_once_started() {
        let (doc, ids) = reveal_document(1);
        let mut timeline = Timeline::new(5.0);
        let fade = |from, to, start, duration| {
            DomTransition::new(".reveal", StyleProperty::Opacity, from, to, start, duration)
        };
        timeline
            .add_transition(fade(0.0, 1.0, 0.4, 0.6))
            .add_transition(fade(1.0, 0.0, 1.2, 0.8));
        timeline.install(&doc);

        let opacity = |t: f64| timeline.sample(t).style(ids[0], StyleProperty::Opacity).unwrap();
        assert_eq!(opacity(0.0), 0.0);
        assert_eq!(opacity(1.1), 1.0);
        assert_eq!(opacity(1.2), 1.0);
        assert!(opacity(1.5) < 1.0);
        assert_eq!(opacity(2.0), 0.0);
        // Scrubbing back restores the faded-in state.
        assert_eq!(opacity(1.1), 1.0);
        assert!(opacity(0.7) > 0.0 && opacity(0.7) < 1.0);
    }

    #[test]
    fn unmatched_selector_is_skipped() {
        let (doc, ids) = reveal_document(1);
        let mut timeline = Timeline::auto();
        let fade_in = |selector: &str| {
            DomTransition::new(selector, StyleProperty::Opacity, 0.0, 1.0, 0.0, 9.0)
        };
        timeline
            .add_transition(fade_in(".missing"))
            .add_transition(fade_in("#bad >"))
            .add_transition(DomTransition::new(
                ".reveal",
                StyleProperty::Scale,
                0.9,
                1.0,
                0.0,
                1.0,
            ));
        timeline.install(&doc);

        let sample = timeline.sample(0.5);
        assert_eq!(sample.styles.len(), 1);
        assert!(sample.style(ids[0], StyleProperty::Scale).is_some());
        assert_eq!(timeline.duration(), 1.0);
    }

    #[test]
    fn auto_length_includes_stagger() {
        let (doc, _) = reveal_document(4);
        let mut timeline = Timeline::auto();
        timeline.add_track(Track::camera(
            KeyframeTrack::new(Vec3::ZERO).to(Vec3::new(1.0, 0.0, 0.0), 5.0, EasingType::Linear),
        ));
        timeline.add_transition(
            DomTransition::new(".reveal", StyleProperty::Opacity, 0.0, 1.0, 4.4, 0.8)
                .with_stagger(0.05),
        );
        timeline.install(&doc);
        assert!((timeline.duration() - 5.35).abs() < 1e-9);
    }

    #[test]
    fn offset_track_holds_before_its_window() {
        let mut timeline = Timeline::new(4.0);
        timeline.add_track(Track::Object {
            property: ObjectProperty::Position,
            start: 2.0,
            keyframes: KeyframeTrack::new(Vec3::ZERO).to(
                Vec3::new(4.0, 0.0, 0.0),
                2.0,
                EasingType::Linear,
            ),
        });
        assert_eq!(timeline.sample(1.0).object_position, Some(Vec3::ZERO));
        assert_eq!(timeline.sample(3.0).object_position, Some(Vec3::new(2.0, 0.0, 0.0)));
        assert_eq!(timeline.sample(4.0).object_position, Some(Vec3::new(4.0, 0.0, 0.0)));
    }
}
