//! Rhai timeline authoring.

use rhai::Engine;
use scrollstage_core::scripting::{eval_timeline_script, register_rhai_api, TimelineHandle};
use scrollstage_core::{showcase, EngineError, StyleProperty, Vec3};

#[test]
fn smoke_test_rhai_engine() {
    let mut engine = Engine::new();
    register_rhai_api(&mut engine);

    let script = r#"
let tl = new_timeline(2);
tl.camera([#{ x: 0, y: 1, z: 5 }, #{ x: 4, duration: 2 }]);
tl
"#;
    let result = engine.eval::<TimelineHandle>(script);
    assert!(result.is_ok(), "Basic script should execute without error");
}

#[test]
fn script_builds_tracks_and_transitions() {
    let script = r##"
let tl = new_timeline(5.0);
tl.camera([
    #{ x: 2, y: 2, z: 4 },
    #{ x: 6, y: 0.5, z: 2, duration: 1 },
    #{ x: 0, y: 3.5, z: 1, duration: 1, ease: "none" }
]);
tl.rotation([#{ y: 0 }, #{ y: 0.2 }, #{ y: -1.57 }]);
tl.position([#{ y: -0.5 }, #{ x: 2, z: -1 }]);
tl.transition(".hero-content", "opacity", 1, 0, 0.2, 0.8);
tl.transition("#features .reveal", "x", -100, 0, 0.4, 0.8, #{ stagger: 0.05, ease: "power1.out" });
tl
"##;
    let mut timeline = eval_timeline_script(script).unwrap();
    assert_eq!(timeline.tracks().len(), 5);
    assert_eq!(timeline.duration(), 5.0);

    let document = showcase::document();
    timeline.install(&document);

    let sample = timeline.sample(2.0);
    assert_eq!(sample.camera_position, Some(Vec3::new(0.0, 3.5, 1.0)));
    assert_eq!(sample.object_rotation.map(|r| r.y), Some(-1.57));
    assert_eq!(sample.object_position, Some(Vec3::new(2.0, -0.5, -1.0)));

    let reveals = document.query("#features .reveal").unwrap();
    let early = timeline.sample(0.42);
    assert_eq!(early.style(reveals[1], StyleProperty::TranslateX), Some(-100.0));
    assert_eq!(timeline.sample(1.5).style(reveals[2], StyleProperty::TranslateX), Some(0.0));
}

#[test]
fn auto_length_follows_tracks() {
    let script = r#"
let tl = new_timeline();
tl.camera([#{ x: 0 }, #{ x: 1, duration: 3 }]);
tl.transition(".x", "scale", 0.9, 1, 2, 2.5);
print(tl.length());
tl
"#;
    let mut timeline = eval_timeline_script(script).unwrap();
    let mut document = scrollstage_core::Document::new();
    document.add_element(scrollstage_core::Element::new().with_class("x"));
    timeline.install(&document);
    assert_eq!(timeline.duration(), 4.5);
}

#[test]
fn script_errors_are_reported() {
    let bad_property = r#"
let tl = new_timeline(1);
tl.transition(".a", "colour", 0, 1, 0, 1);
tl
"#;
    assert!(matches!(
        eval_timeline_script(bad_property),
        Err(EngineError::Script(_))
    ));

    let bad_key = r#"
let tl = new_timeline(1);
tl.camera([1, 2]);
tl
"#;
    assert!(matches!(eval_timeline_script(bad_key), Err(EngineError::Script(_))));

    assert!(matches!(
        eval_timeline_script("new_timeline(-1)"),
        Err(EngineError::Script(_))
    ));
}
