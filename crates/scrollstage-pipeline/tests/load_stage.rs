use scrollstage_core::{ChannelVisibility, StageStatus, StyleProperty, Vec3};
use scrollstage_pipeline::{build_document, load_stage, load_stage_json};
use scrollstage_schema::{ElementDef, StageRequest};

const STAGE: &str = r##"{
    "config": { "scrub_seconds": 0 },
    "length": 2,
    "camera": { "keyframes": [ { "x": 0, "y": 1, "z": 5 }, { "x": 4 }, { "z": 1, "easing": "ease_in" } ] },
    "rotation": { "keyframes": [ { "y": 0 }, { "y": -1.57, "duration": 2 } ] },
    "transitions": [
        { "selector": "#intro .line", "property": "opacity", "from": 0, "to": 1, "start": 0.5, "duration": 0.5, "stagger": 0.25 }
    ],
    "document": [
        { "compound": "#intro", "children": [
            { "compound": ".line", "text": "one" },
            { "compound": ".line", "text": "two" },
            { "compound": ".count", "text": "0", "data": { "target": "42" } }
        ] }
    ],
    "model": { "name": "crate", "bounds": { "center": { "x": 0, "y": 0.5, "z": 0 }, "size": { "x": 2, "y": 1, "z": 1 } } }
}"##;

#[test]
fn json_stage_starts_running() {
    let (visibility, _reporter) = ChannelVisibility::new();
    let stage = load_stage_json(STAGE, Box::new(visibility)).unwrap();

    assert!(stage.is_running());
    assert_eq!(stage.config().scrub_seconds, 0.0);
    assert_eq!(stage.counters().counters().len(), 1);
    assert_eq!(stage.context().camera.position, Vec3::new(0.0, 1.0, 5.0));
    assert_eq!(stage.context().object.as_ref().unwrap().scale, 1.75);

    let timeline = stage.timeline();
    assert_eq!(timeline.duration(), 2.0);
    let end = timeline.sample(2.0);
    assert_eq!(end.camera_position, Some(Vec3::new(4.0, 1.0, 1.0)));
    assert_eq!(end.object_rotation, Some(Vec3::new(0.0, -1.57, 0.0)));

    let lines = stage.document().query("#intro .line").unwrap();
    let mid = timeline.sample(0.9);
    assert!(mid.style(lines[0], StyleProperty::Opacity).unwrap() > 0.0);
    assert!(mid.style(lines[1], StyleProperty::Opacity).unwrap() > 0.0);
    assert_eq!(timeline.sample(0.7).style(lines[1], StyleProperty::Opacity), Some(0.0));
}

#[test]
fn stage_without_model_waits() {
    let request = StageRequest::default();
    let (visibility, _reporter) = ChannelVisibility::new();
    let stage = load_stage(request, Box::new(visibility)).unwrap();
    assert_eq!(stage.status(), &StageStatus::Loading);
}

#[test]
fn bad_model_bounds_fail_the_load() {
    let json = r#"{ "model": { "bounds": { "center": {}, "size": {} } } }"#;
    let (visibility, _reporter) = ChannelVisibility::new();
    assert!(load_stage_json(json, Box::new(visibility)).is_err());
}

#[test]
fn invalid_compound_is_rejected() {
    let defs = vec![ElementDef {
        compound: "section#x".to_string(),
        ..Default::default()
    }];
    assert!(build_document(&defs).is_err());
}

#[test]
fn empty_track_is_rejected() {
    let json = r#"{ "camera": { "keyframes": [] } }"#;
    let (visibility, _reporter) = ChannelVisibility::new();
    assert!(load_stage_json(json, Box::new(visibility)).is_err());
}
