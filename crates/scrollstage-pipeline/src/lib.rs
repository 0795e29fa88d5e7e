use anyhow::{Context, Result};
use scrollstage_core::dom::{Document, Element};
use scrollstage_core::timeline::{DomTransition, ObjectProperty, Timeline, Track};
use scrollstage_core::track::KeyframeTrack;
use scrollstage_core::types::{ElementId, Vec3};
use scrollstage_core::visibility::ObservesVisibility;
use scrollstage_core::Stage;
use scrollstage_schema::{ElementDef, StageRequest, Transition, VectorTrack};
use tracing::{debug, info};

/// Converts a Schema Request into a Stage.
///
/// When the request carries a model the stage is started right away;
/// otherwise it stays `Loading` until the host calls `install_model`.
pub fn load_stage(request: StageRequest, visibility: Box<dyn ObservesVisibility>) -> Result<Stage> {
    let timeline = build_timeline(&request)?;
    let document = build_document(&request.document)?;
    debug!(
        tracks = timeline.tracks().len(),
        elements = document.len(),
        "Stage request converted"
    );

    let mut stage = Stage::new(request.config, timeline, document, visibility);
    if let Some(model) = request.model {
        stage.install_model(Ok(model))?;
        info!("Stage started from request");
    }
    Ok(stage)
}

/// Parses a JSON stage description and loads it.
pub fn load_stage_json(json: &str, visibility: Box<dyn ObservesVisibility>) -> Result<Stage> {
    let request: StageRequest =
        serde_json::from_str(json).context("Invalid stage description")?;
    load_stage(request, visibility)
}

/// Builds the (not yet installed) timeline of a request.
pub fn build_timeline(request: &StageRequest) -> Result<Timeline> {
    let mut timeline = match request.length {
        Some(length) => {
            if !(length.is_finite() && length >= 0.0) {
                anyhow::bail!("Timeline length must be >= 0, got {}", length);
            }
            Timeline::new(length)
        }
        None => Timeline::auto(),
    };

    if let Some(camera) = &request.camera {
        let keyframes = build_track(camera).context("camera track")?;
        timeline.add_track(Track::Camera {
            start: camera.start,
            keyframes,
        });
    }
    for (property, def) in [
        (ObjectProperty::Rotation, &request.rotation),
        (ObjectProperty::Position, &request.position),
    ] {
        if let Some(def) = def {
            let keyframes = build_track(def).with_context(|| format!("{:?} track", property))?;
            timeline.add_track(Track::Object {
                property,
                start: def.start,
                keyframes,
            });
        }
    }
    for transition in &request.transitions {
        timeline.add_transition(build_transition(transition));
    }
    Ok(timeline)
}

fn build_track(def: &VectorTrack) -> Result<KeyframeTrack<Vec3>> {
    let Some((anchor, rest)) = def.keyframes.split_first() else {
        anyhow::bail!("A track needs at least one keyframe");
    };

    let carry = |prev: Vec3, x: Option<f32>, y: Option<f32>, z: Option<f32>| {
        Vec3::new(x.unwrap_or(prev.x), y.unwrap_or(prev.y), z.unwrap_or(prev.z))
    };
    let mut value = carry(Vec3::ZERO, anchor.x, anchor.y, anchor.z);
    let mut track = KeyframeTrack::new(value);
    for key in rest {
        value = carry(value, key.x, key.y, key.z);
        track.push(value, key.duration, key.easing);
    }
    Ok(track)
}

fn build_transition(def: &Transition) -> DomTransition {
    DomTransition::new(
        &def.selector,
        def.property,
        def.from,
        def.to,
        def.start,
        def.duration,
    )
    .with_easing(def.easing)
    .with_stagger(def.stagger)
}

/// Builds the document from nested element definitions, depth first.
pub fn build_document(defs: &[ElementDef]) -> Result<Document> {
    let mut document = Document::new();
    for def in defs {
        add_element_recursive(&mut document, None, def)?;
    }
    Ok(document)
}

fn add_element_recursive(
    document: &mut Document,
    parent: Option<ElementId>,
    def: &ElementDef,
) -> Result<ElementId> {
    let mut element = if def.compound.is_empty() {
        Element::new()
    } else {
        Element::compound(&def.compound)?
    };
    element.text = def.text.clone();
    element.data = def.data.clone();

    let id = match parent {
        Some(parent) => document.add_child(parent, element),
        None => document.add_element(element),
    };
    for child in &def.children {
        add_element_recursive(document, Some(id), child)?;
    }
    Ok(id)
}
