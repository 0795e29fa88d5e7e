//! The bundled showcase stage file and script reproduce the built-in choreography.

use scrollstage_engine::core::scripting::eval_timeline_script;
use scrollstage_engine::pipeline::load_stage_json;
use scrollstage_engine::{showcase, ChannelVisibility, Timeline};

fn installed(mut timeline: Timeline) -> Timeline {
    timeline.install(&showcase::document());
    timeline
}

fn assert_same_choreography(a: &Timeline, b: &Timeline) {
    assert_eq!(a.duration(), b.duration());
    for i in 0..=500 {
        let t = i as f64 / 100.0;
        assert_eq!(a.sample(t), b.sample(t), "diverged at t={}", t);
    }
}

#[test]
fn json_stage_matches_builtin_showcase() {
    let json = include_str!("../demos/showcase.json");
    let (visibility, _reporter) = ChannelVisibility::new();
    let stage = load_stage_json(json, Box::new(visibility)).unwrap();
    assert!(stage.is_running());

    let builtin = installed(showcase::timeline());
    assert_same_choreography(stage.timeline(), &builtin);

    let builtin_doc = showcase::document();
    assert_eq!(stage.document().len(), builtin_doc.len());
    for (id, element) in builtin_doc.iter() {
        let loaded = stage.document().element(id).unwrap();
        assert_eq!(loaded.id, element.id);
        assert_eq!(loaded.classes, element.classes);
        assert_eq!(loaded.parent, element.parent);
        assert_eq!(loaded.data, element.data);
    }
}

#[test]
fn rhai_script_matches_builtin_showcase() {
    let script = include_str!("../demos/showcase.rhai");
    let scripted = installed(eval_timeline_script(script).unwrap());
    let builtin = installed(showcase::timeline());
    assert_same_choreography(&scripted, &builtin);
}
