use crate::config::StageConfig;
use crate::counter::VisibilityCounterAnimator;
use crate::dom::Document;
use crate::errors::EngineError;
use crate::render_loop::{RenderLoop, SceneRenderer};
use crate::scene::{LoadedModel, Normalization, SceneObject, StageContext};
use crate::scroll::{ProgressSample, ScrollProgressSource};
use crate::timeline::{Timeline, TimelineSample};
use crate::visibility::ObservesVisibility;
use crate::ModelLoader;
use tracing::{error, info, instrument, warn};

/// Startup state of a stage.
#[derive(Clone, Debug, PartialEq)]
pub enum StageStatus {
    /// Waiting for the model; nothing animates or draws yet.
    Loading,
    Running,
    /// The model failed to load. Terminal.
    Failed(String),
}

/// The central engine coordinator.
///
/// `Stage` owns the context (camera, model, document) and every component
/// that reads or writes it, and sequences them within a frame: scroll
/// smoothing, timeline, counters, then the draw.
pub struct Stage {
    context: StageContext,
    timeline: Timeline,
    scroll: ScrollProgressSource,
    counters: VisibilityCounterAnimator,
    render_loop: RenderLoop,
    config: StageConfig,
    status: StageStatus,
    last_sample: Option<TimelineSample>,
}

impl Stage {
    /// Creates a stage in the `Loading` state.
    ///
    /// # Arguments
    /// * `config` - Stage tunables.
    /// * `timeline` - The scroll timeline; installed once the model arrives.
    /// * `document` - Elements targeted by transitions and counters.
    /// * `visibility` - Viewport visibility source for the counters.
    pub fn new(
        config: StageConfig,
        timeline: Timeline,
        document: Document,
        visibility: Box<dyn ObservesVisibility>,
    ) -> Self {
        Self {
            context: StageContext::new(&config, document),
            timeline,
            scroll: ScrollProgressSource::from_config(&config),
            counters: VisibilityCounterAnimator::from_config(visibility, &config),
            render_loop: RenderLoop::new(config.focal_point),
            config,
            status: StageStatus::Loading,
            last_sample: None,
        }
    }

    /// Hands over the result of the external model load and starts the stage.
    ///
    /// A failed load is fatal: the stage moves to `Failed` and neither the
    /// timeline nor the render loop ever starts.
    pub fn install_model(&mut self, model: anyhow::Result<LoadedModel>) -> Result<(), EngineError> {
        match &self.status {
            StageStatus::Running => {
                warn!("Model already installed, ignoring");
                return Ok(());
            }
            StageStatus::Failed(message) => {
                return Err(EngineError::AssetLoadFailure(message.clone()));
            }
            StageStatus::Loading => {}
        }

        let model = match model {
            Ok(model) => model,
            Err(e) => return Err(self.fail(format!("{:#}", e))),
        };
        let normalization = match Normalization::fit(
            &model.bounds,
            self.config.model_target_size,
            self.config.ground_y,
        ) {
            Ok(n) => n,
            Err(EngineError::AssetLoadFailure(message)) => return Err(self.fail(message)),
            Err(e) => return Err(self.fail(e.to_string())),
        };

        self.context.object = Some(SceneObject::from_model(&model, normalization));
        self.timeline.install(&self.context.document);
        self.counters.register_document(&self.context.document);

        // Initial states are visible before the first frame.
        let progress = self.scroll.sample().smoothed;
        self.last_sample = Some(self.timeline.set_progress(progress, &mut self.context));
        self.status = StageStatus::Running;
        info!(
            model = %model.name,
            scale = normalization.scale,
            "Stage running"
        );
        Ok(())
    }

    /// Loads the model through `loader` and installs it.
    #[instrument(level = "debug", skip(self, loader))]
    pub fn load_model(&mut self, loader: &dyn ModelLoader, path: &str) -> Result<(), EngineError> {
        let model = loader.load_model(path);
        self.install_model(model)
    }

    fn fail(&mut self, message: String) -> EngineError {
        error!("Error loading model: {}", message);
        self.status = StageStatus::Failed(message.clone());
        EngineError::AssetLoadFailure(message)
    }

    /// Records a scroll event (offset and scrollable range in pixels).
    pub fn on_scroll(&mut self, offset: f64, range: f64) {
        self.scroll.on_scroll(offset, range);
    }

    /// Updates the camera projection for a new viewport.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        self.render_loop.resize(&mut self.context, width, height);
    }

    /// Runs one frame. Does nothing until the model is installed.
    pub fn frame(&mut self, dt_ms: f64, renderer: &mut dyn SceneRenderer) {
        if self.status != StageStatus::Running {
            return;
        }

        let progress = self.scroll.step();
        self.last_sample = Some(self.timeline.set_progress(progress, &mut self.context));

        self.counters.handle_visibility();
        self.counters.tick(dt_ms, &mut self.context.document);

        self.render_loop.frame(&mut self.context, renderer);
    }

    /// The scene and document the frame is built from.
    ///
    /// Read-only: transforms are written by the timeline alone.
    pub fn context(&self) -> &StageContext {
        &self.context
    }

    pub fn document(&self) -> &Document {
        &self.context.document
    }

    pub fn status(&self) -> &StageStatus {
        &self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == StageStatus::Running
    }

    pub fn progress(&self) -> ProgressSample {
        self.scroll.sample()
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn counters(&self) -> &VisibilityCounterAnimator {
        &self.counters
    }

    pub fn render_loop(&self) -> &RenderLoop {
        &self.render_loop
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    /// The timeline state written by the latest frame.
    pub fn last_sample(&self) -> Option<&TimelineSample> {
        self.last_sample.as_ref()
    }
}
