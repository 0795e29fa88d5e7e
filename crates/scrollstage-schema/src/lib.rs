//! Serializable description of a scroll stage: configuration, keyframe
//! tracks, document transitions, the page elements and (optionally) the
//! model bounds. `scrollstage-pipeline` turns a [`StageRequest`] into a
//! running `Stage`.

use scrollstage_core::animation::EasingType;
use scrollstage_core::config::StageConfig;
use scrollstage_core::dom::StyleProperty;
use scrollstage_core::scene::LoadedModel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct StageRequest {
    #[serde(default)]
    pub config: StageConfig,
    /// Master axis length; `None` uses the longest track.
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub camera: Option<VectorTrack>,
    #[serde(default)]
    pub rotation: Option<VectorTrack>,
    #[serde(default)]
    pub position: Option<VectorTrack>,
    #[serde(default)]
    pub transitions: Vec<Transition>,
    /// Top-level page elements.
    #[serde(default)]
    pub document: Vec<ElementDef>,
    /// Model description, if it is already known. Without it the stage
    /// waits in `Loading` until the host installs one.
    #[serde(default)]
    pub model: Option<LoadedModel>,
}

/// A keyframe track for a 3-vector.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct VectorTrack {
    /// Master time at which the track begins.
    #[serde(default)]
    pub start: f64,
    /// The first entry is the anchor.
    pub keyframes: Vec<VectorKeyframe>,
}

/// One keyframe. Missing components carry over from the previous keyframe.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct VectorKeyframe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f32>,
    /// Time units since the previous keyframe (ignored for the anchor).
    #[serde(default = "default_duration")]
    pub duration: f64,
    #[serde(default)]
    pub easing: EasingType,
}

fn default_duration() -> f64 {
    1.0
}

/// A style transition on every element matching `selector`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Transition {
    pub selector: String,
    pub property: StyleProperty,
    pub from: f32,
    pub to: f32,
    pub start: f64,
    pub duration: f64,
    /// Easing function (default: EaseOutQuad)
    #[serde(default = "default_text_easing")]
    pub easing: EasingType,
    /// Delay per matched element.
    #[serde(default)]
    pub stagger: f64,
}

fn default_text_easing() -> EasingType {
    EasingType::EaseOutQuad
}

/// A page element. `compound` is written like a selector compound:
/// `#features`, `.split-side.left`, `.stat-value.animate-number`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ElementDef {
    #[serde(default)]
    pub compound: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    /// `data-*` attributes without the prefix (`target`, `decimals`).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementDef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_request_uses_defaults() {
        let request: StageRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.config, StageConfig::default());
        assert!(request.length.is_none());
        assert!(request.model.is_none());
        assert!(request.transitions.is_empty());
    }

    #[test]
    fn transition_defaults() {
        let t: Transition = serde_json::from_str(
            r#"{ "selector": ".reveal", "property": "translate_x", "from": -100, "to": 0, "start": 0.4, "duration": 0.8 }"#,
        )
        .unwrap();
        assert_eq!(t.property, StyleProperty::TranslateX);
        assert_eq!(t.easing, EasingType::EaseOutQuad);
        assert_eq!(t.stagger, 0.0);
    }

    #[test]
    fn keyframe_defaults() {
        let k: VectorKeyframe = serde_json::from_str(r#"{ "y": -1.57 }"#).unwrap();
        assert_eq!(k.x, None);
        assert_eq!(k.y, Some(-1.57));
        assert_eq!(k.duration, 1.0);
        assert_eq!(k.easing, EasingType::Linear);
    }

    #[test]
    fn nested_elements() {
        let e: ElementDef = serde_json::from_str(
            r##"{ "compound": "#hero", "children": [ { "compound": ".animate-number", "text": "0", "data": { "target": "1015" } } ] }"##,
        )
        .unwrap();
        assert_eq!(e.children.len(), 1);
        assert_eq!(e.children[0].data["target"], "1015");
    }
}
