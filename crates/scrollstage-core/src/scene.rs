//! # Scene Module
//!
//! The explicit engine context: camera, the (optional) model and the
//! document. Everything the timeline writes and the render loop reads lives
//! in [`StageContext`]; there is no global scene.

use crate::config::{CameraConfig, StageConfig};
use crate::dom::Document;
use crate::errors::EngineError;
use crate::types::Vec3;
use glam::{EulerRot, Mat4, Quat};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box of a loaded model, as reported by the loader.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelBounds {
    pub center: Vec3,
    pub size: Vec3,
}

/// A model handed over by the external loader.
///
/// Geometry stays with the host renderer; the engine only needs the bounds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoadedModel {
    #[serde(default)]
    pub name: String,
    pub bounds: ModelBounds,
    #[serde(default)]
    pub mesh_count: usize,
}

impl LoadedModel {
    pub fn new(name: &str, bounds: ModelBounds) -> Self {
        Self {
            name: name.to_string(),
            bounds,
            mesh_count: 0,
        }
    }
}

/// Uniform scale and offset that fit a model to the stage.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Normalization {
    pub scale: f32,
    pub offset: Vec3,
}

impl Normalization {
    /// Scales the largest dimension to `target_size`, centers the model on
    /// X/Z and rests it at `ground_y`.
    pub fn fit(bounds: &ModelBounds, target_size: f32, ground_y: f32) -> Result<Self, EngineError> {
        let max_dim = bounds.size.max_element();
        if !(max_dim.is_finite() && max_dim > 0.0) {
            return Err(EngineError::AssetLoadFailure(format!(
                "model bounds have no extent (size = {:?})",
                bounds.size
            )));
        }
        let scale = target_size / max_dim;
        Ok(Self {
            scale,
            offset: Vec3::new(-bounds.center.x * scale, ground_y, -bounds.center.z * scale),
        })
    }
}

/// Perspective camera state.
#[derive(Clone, Debug, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub projection: Mat4,
    pub view: Mat4,
}

impl PerspectiveCamera {
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        let mut camera = Self {
            position: config.initial_position,
            fov_degrees: config.fov_degrees,
            aspect,
            near: config.near,
            far: config.far,
            projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
        };
        camera.update_projection();
        camera
    }

    pub fn update_projection(&mut self) {
        self.projection = Mat4::perspective_rh_gl(
            self.fov_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        );
    }

    /// Points the camera at `target` from its current position.
    ///
    /// Looking straight up or down swaps the up axis for Z. A camera sitting
    /// on its target has no direction, so the previous view is kept.
    pub fn look_at(&mut self, target: Vec3) {
        let eye: glam::Vec3 = self.position.into();
        let target: glam::Vec3 = target.into();
        let Some(forward) = (target - eye).try_normalize() else {
            return;
        };
        let up = if forward.cross(glam::Vec3::Y).length_squared() < 1e-12 {
            glam::Vec3::Z
        } else {
            glam::Vec3::Y
        };
        self.view = Mat4::look_at_rh(eye, target, up);
    }
}

/// The animated model root.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneObject {
    pub name: String,
    pub position: Vec3,
    /// Euler angles in radians, XYZ order.
    pub rotation: Vec3,
    pub scale: f32,
    pub world_matrix: Mat4,
    /// Always false: the render loop refreshes `world_matrix` itself.
    pub matrix_auto_update: bool,
}

impl SceneObject {
    pub fn from_model(model: &LoadedModel, normalization: Normalization) -> Self {
        let mut object = Self {
            name: model.name.clone(),
            position: normalization.offset,
            rotation: Vec3::ZERO,
            scale: normalization.scale,
            world_matrix: Mat4::IDENTITY,
            matrix_auto_update: false,
        };
        object.update_matrix_world();
        object
    }

    pub fn update_matrix_world(&mut self) {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        self.world_matrix = Mat4::from_scale_rotation_translation(
            glam::Vec3::splat(self.scale),
            rotation,
            self.position.into(),
        );
    }
}

/// Everything a frame reads and the timeline writes.
#[derive(Clone, Debug)]
pub struct StageContext {
    pub camera: PerspectiveCamera,
    /// `None` until the model has been installed.
    pub object: Option<SceneObject>,
    pub document: Document,
}

impl StageContext {
    pub fn new(config: &StageConfig, document: Document) -> Self {
        let viewport = config.viewport;
        let aspect = if viewport.height > 0 {
            viewport.width as f32 / viewport.height as f32
        } else {
            1.0
        };
        Self {
            camera: PerspectiveCamera::new(&config.camera, aspect),
            object: None,
            document,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_fits_largest_dimension() {
        let bounds = ModelBounds {
            center: Vec3::new(1.0, 0.7, -2.0),
            size: Vec3::new(7.0, 2.0, 3.5),
        };
        let n = Normalization::fit(&bounds, 3.5, -0.5).unwrap();
        assert_eq!(n.scale, 0.5);
        assert_eq!(n.offset, Vec3::new(-0.5, -0.5, 1.0));
    }

    #[test]
    fn zero_extent_is_a_load_failure() {
        let bounds = ModelBounds {
            center: Vec3::ZERO,
            size: Vec3::ZERO,
        };
        assert!(matches!(
            Normalization::fit(&bounds, 3.5, -0.5),
            Err(EngineError::AssetLoadFailure(_))
        ));
    }

    fn camera_at(position: Vec3) -> PerspectiveCamera {
        let mut camera = PerspectiveCamera::new(&CameraConfig::default(), 16.0 / 9.0);
        camera.position = position;
        camera
    }

    #[test]
    fn look_at_from_directly_above_is_finite() {
        let mut camera = camera_at(Vec3::new(0.0, 5.0, 0.0));
        camera.look_at(Vec3::ZERO);
        assert!(camera.view.is_finite());
        let origin = camera.view.transform_point3(glam::Vec3::ZERO);
        assert!(origin.x.abs() < 1e-5 && origin.y.abs() < 1e-5);
        assert!((origin.z + 5.0).abs() < 1e-5);

        camera.position = Vec3::new(0.0, -3.0, 0.0);
        camera.look_at(Vec3::ZERO);
        assert!(camera.view.is_finite());
    }

    #[test]
    fn look_at_own_position_keeps_previous_view() {
        let mut camera = camera_at(Vec3::new(2.0, 2.0, 4.0));
        camera.look_at(Vec3::ZERO);
        let previous = camera.view;
        camera.look_at(Vec3::new(2.0, 2.0, 4.0));
        assert_eq!(camera.view, previous);
    }

    #[test]
    fn world_matrix_tracks_transform() {
        let model = LoadedModel::new(
            "car",
            ModelBounds {
                center: Vec3::ZERO,
                size: Vec3::new(3.5, 1.0, 1.0),
            },
        );
        let normalization = Normalization::fit(&model.bounds, 3.5, -0.5).unwrap();
        let mut object = SceneObject::from_model(&model, normalization);
        object.position = Vec3::new(2.0, -0.5, -1.0);
        object.update_matrix_world();
        let translation = object.world_matrix.w_axis;
        assert_eq!((translation.x, translation.y, translation.z), (2.0, -0.5, -1.0));
        assert!(!object.matrix_auto_update);
    }
}
