//! # Render Loop
//!
//! Per-frame draw driver. Reads whatever the timeline wrote before this
//! frame, refreshes derived matrices and hands the frame to the host
//! renderer. It never touches timeline state and never fails.

use crate::dom::Document;
use crate::scene::{PerspectiveCamera, SceneObject, StageContext};
use crate::types::Vec3;
use tracing::{error, warn};

/// Read-only view of one frame.
#[derive(Debug)]
pub struct FrameView<'a> {
    pub frame: u64,
    pub camera: &'a PerspectiveCamera,
    pub object: Option<&'a SceneObject>,
    pub document: &'a Document,
}

/// Host renderer receiving each frame.
pub trait SceneRenderer {
    fn draw(&mut self, view: &FrameView<'_>) -> anyhow::Result<()>;
}

/// Drives one draw per frame.
#[derive(Clone, Debug)]
pub struct RenderLoop {
    focal_point: Vec3,
    frames: u64,
    failed_draws: u64,
}

impl RenderLoop {
    pub fn new(focal_point: Vec3) -> Self {
        Self {
            focal_point,
            frames: 0,
            failed_draws: 0,
        }
    }

    /// Renders one frame.
    pub fn frame(&mut self, context: &mut StageContext, renderer: &mut dyn SceneRenderer) {
        // World matrices are not updated automatically.
        if let Some(object) = context.object.as_mut() {
            object.update_matrix_world();
        }
        context.camera.look_at(self.focal_point);

        let view = FrameView {
            frame: self.frames,
            camera: &context.camera,
            object: context.object.as_ref(),
            document: &context.document,
        };
        if let Err(e) = renderer.draw(&view) {
            self.failed_draws += 1;
            error!(frame = self.frames, "Draw failed: {:#}", e);
        }
        self.frames += 1;
    }

    /// Recomputes the camera projection for a new viewport size.
    pub fn resize(&self, context: &mut StageContext, width: u32, height: u32) {
        if width == 0 || height == 0 {
            warn!(width, height, "Ignoring resize to an empty viewport");
            return;
        }
        context.camera.aspect = width as f32 / height as f32;
        context.camera.update_projection();
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames
    }

    pub fn failed_draws(&self) -> u64 {
        self.failed_draws
    }

    pub fn focal_point(&self) -> Vec3 {
        self.focal_point
    }
}
