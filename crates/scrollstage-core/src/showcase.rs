//! The product page choreography: five sections, one camera path around the
//! car, and section copy that hands over from one section to the next.
//!
//! The master axis runs 0..5, one unit per section. Text phases start 0.2
//! into each unit and the incoming section follows 0.2 later.

use crate::animation::EasingType;
use crate::dom::{Document, Element, StyleProperty};
use crate::timeline::{DomTransition, ObjectProperty, Timeline, Track};
use crate::track::KeyframeTrack;
use crate::types::Vec3;

/// Master timeline length in time units.
pub const LENGTH: f64 = 5.0;

/// Duration of every text transition.
pub const TEXT_DURATION: f64 = 0.8;

/// Per-element delay for staggered reveals.
pub const TEXT_STAGGER: f64 = 0.05;

/// Camera position at each section boundary, starting from the hero.
pub const CAMERA_PATH: [Vec3; 6] = [
    Vec3::new(2.0, 2.0, 4.0),
    Vec3::new(6.0, 0.5, 2.0),
    Vec3::new(0.0, 3.5, 1.0),
    Vec3::new(-1.0, 0.0, 4.0),
    Vec3::new(0.0, 2.5, -4.0),
    Vec3::new(0.0, 3.0, -6.0),
];

/// Model yaw (radians) at each section boundary.
pub const ROTATION_Y: [f32; 6] = [0.0, 0.2, -1.57, -2.36, -3.14, -3.5];

/// Model position at each section boundary. `y` stays on the ground.
pub const OBJECT_PATH: [Vec3; 6] = [
    Vec3::new(0.0, -0.5, 0.0),
    Vec3::new(2.0, -0.5, -1.0),
    Vec3::new(0.0, -0.5, 0.0),
    Vec3::new(-0.9, -0.5, 0.0),
    Vec3::new(0.0, -0.5, 0.0),
    Vec3::new(0.0, -0.5, 0.0),
];

fn path_track(path: &[Vec3]) -> KeyframeTrack<Vec3> {
    let mut track = KeyframeTrack::new(path[0]);
    for value in &path[1..] {
        track.push(*value, 1.0, EasingType::Linear);
    }
    track
}

fn fade(selector: &str, from: f32, to: f32, start: f64) -> DomTransition {
    DomTransition::new(selector, StyleProperty::Opacity, from, to, start, TEXT_DURATION)
}

fn slide(selector: &str, property: StyleProperty, from: f32, to: f32, start: f64) -> DomTransition {
    DomTransition::new(selector, property, from, to, start, TEXT_DURATION)
}

/// Builds the page timeline.
pub fn timeline() -> Timeline {
    use StyleProperty::{TranslateX, TranslateY};

    let rotation: Vec<Vec3> = ROTATION_Y.iter().map(|y| Vec3::new(0.0, *y, 0.0)).collect();

    let mut timeline = Timeline::new(LENGTH);
    timeline
        .add_track(Track::camera(path_track(&CAMERA_PATH)))
        .add_track(Track::object(ObjectProperty::Rotation, path_track(&rotation)))
        .add_track(Track::object(ObjectProperty::Position, path_track(&OBJECT_PATH)));

    // Hero -> features
    timeline
        .add_transition(fade(".hero-content, .stats-container", 1.0, 0.0, 0.2))
        .add_transition(slide(".hero-content, .stats-container", TranslateY, 0.0, -50.0, 0.2))
        .add_transition(fade("#features .reveal", 0.0, 1.0, 0.4).with_stagger(TEXT_STAGGER))
        .add_transition(
            slide("#features .reveal", TranslateX, -100.0, 0.0, 0.4).with_stagger(TEXT_STAGGER),
        );

    // Features -> design
    timeline
        .add_transition(fade("#features .reveal", 1.0, 0.0, 1.2))
        .add_transition(slide("#features .reveal", TranslateX, 0.0, -100.0, 1.2))
        .add_transition(fade("#design .split-side.left", 0.0, 1.0, 1.4))
        .add_transition(slide("#design .split-side.left", TranslateX, -100.0, 0.0, 1.4))
        .add_transition(fade("#design .split-side.right", 0.0, 1.0, 1.4))
        .add_transition(slide("#design .split-side.right", TranslateX, 100.0, 0.0, 1.4));

    // Design -> specs
    timeline
        .add_transition(fade("#design .split-side.left", 1.0, 0.0, 2.2))
        .add_transition(slide("#design .split-side.left", TranslateX, 0.0, -100.0, 2.2))
        .add_transition(fade("#design .split-side.right", 1.0, 0.0, 2.2))
        .add_transition(slide("#design .split-side.right", TranslateX, 0.0, 100.0, 2.2))
        .add_transition(fade("#specs .reveal", 0.0, 1.0, 2.4).with_stagger(TEXT_STAGGER))
        .add_transition(
            slide("#specs .reveal", TranslateX, 100.0, 0.0, 2.4).with_stagger(TEXT_STAGGER),
        );

    // Specs -> performance
    timeline
        .add_transition(fade("#specs .reveal", 1.0, 0.0, 3.2))
        .add_transition(slide("#specs .reveal", TranslateX, 0.0, 100.0, 3.2))
        .add_transition(fade("#performance .reveal", 0.0, 1.0, 3.4).with_stagger(TEXT_STAGGER))
        .add_transition(
            slide("#performance .reveal", TranslateY, 50.0, 0.0, 3.4).with_stagger(TEXT_STAGGER),
        );

    // Performance -> call to action
    timeline
        .add_transition(fade("#performance .reveal", 1.0, 0.0, 4.2))
        .add_transition(slide("#performance .reveal", TranslateY, 0.0, -30.0, 4.2))
        .add_transition(fade("#cta .reveal", 0.0, 1.0, 4.4).with_stagger(TEXT_STAGGER))
        .add_transition(
            slide("#cta .reveal", TranslateY, 50.0, 0.0, 4.4).with_stagger(TEXT_STAGGER),
        );

    timeline
}

fn section(document: &mut Document, id: &str) -> usize {
    document.add_element(Element::new().with_id(id).with_class("section"))
}

fn reveals(document: &mut Document, parent: usize, class: &str, titles: &[&str]) {
    for title in titles {
        document.add_child(
            parent,
            Element::new().with_class(class).with_class("reveal").with_text(title),
        );
    }
}

/// Builds the page document the timeline and counters target.
pub fn document() -> Document {
    let mut document = Document::new();

    let hero = section(&mut document, "hero");
    let content = document.add_child(hero, Element::new().with_class("hero-content"));
    document.add_child(content, Element::new().with_class("hero-title").with_text("Revuelto"));
    document.add_child(
        content,
        Element::new().with_class("hero-subtitle").with_text("The first V12 hybrid HPEV"),
    );

    let stats = document.add_child(hero, Element::new().with_class("stats-container"));
    let stat_items = [
        ("1015", None, "CV"),
        ("2.5", Some("1"), "0-100 km/h"),
        ("350", None, "km/h"),
    ];
    for (target, decimals, label) in stat_items {
        let item = document.add_child(stats, Element::new().with_class("stat-item"));
        let mut number = Element::new()
            .with_class("stat-value")
            .with_class("animate-number")
            .with_data("target", target)
            .with_text("0");
        if let Some(decimals) = decimals {
            number = number.with_data("decimals", decimals);
        }
        document.add_child(item, number);
        document.add_child(item, Element::new().with_class("stat-label").with_text(label));
    }

    let features = section(&mut document, "features");
    reveals(
        &mut document,
        features,
        "feature-card",
        &["Hybrid V12", "Carbon Monofuselage", "Active Aero"],
    );

    let design = section(&mut document, "design");
    document.add_child(
        design,
        Element::new().with_class("split-side").with_class("left").with_text("Exterior"),
    );
    document.add_child(
        design,
        Element::new().with_class("split-side").with_class("right").with_text("Interior"),
    );

    let specs = section(&mut document, "specs");
    reveals(&mut document, specs, "spec-row", &["Engine", "Transmission", "Weight"]);

    let performance = section(&mut document, "performance");
    reveals(&mut document, performance, "perf-card", &["Acceleration", "Top Speed"]);

    let cta = section(&mut document, "cta");
    reveals(&mut document, cta, "cta-title", &["Drive the Future"]);
    reveals(&mut document, cta, "cta-button", &["Configure"]);

    document
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_matches_every_transition() {
        let doc = document();
        for track in timeline().tracks() {
            if let Track::Style(t) = track {
                let matched = doc.query(&t.selector).unwrap();
                assert!(!matched.is_empty(), "{} matched nothing", t.selector);
            }
        }
    }

    #[test]
    fn test_section_reveal_counts() {
        let doc = document();
        assert_eq!(doc.query("#features .reveal").unwrap().len(), 3);
        assert_eq!(doc.query("#specs .reveal").unwrap().len(), 3);
        assert_eq!(doc.query("#performance .reveal").unwrap().len(), 2);
        assert_eq!(doc.query("#cta .reveal").unwrap().len(), 2);
        assert_eq!(doc.query(".animate-number").unwrap().len(), 3);
    }

    #[test]
    fn test_paths_span_five_units() {
        assert_eq!(path_track(&CAMERA_PATH).duration(), LENGTH);
        assert_eq!(timeline().duration(), LENGTH);
    }
}
