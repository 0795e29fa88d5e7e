use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use scrollstage_core::scene::ModelBounds;
use scrollstage_core::scripting::eval_timeline_script;
use scrollstage_core::{
    showcase, ChannelVisibility, DefaultModelLoader, FrameView, LoadedModel, ObservesVisibility,
    ProgressSample, SceneRenderer, Stage, StageConfig, Vec3, VisibilityReporter,
};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Stage description (.json) or timeline script (.rhai)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Model description (JSON with name and bounds)
    #[arg(long)]
    model: Option<PathBuf>,

    /// Number of frames to run
    #[arg(long, default_value_t = 300)]
    frames: u32,

    /// Frames per second
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Scrollable range in pixels
    #[arg(long, default_value_t = 4000.0)]
    range: f64,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum LogFormat {
    Pretty,
    Json,
}

/// One NDJSON line per drawn frame.
#[derive(Serialize, Debug)]
struct FrameRecord {
    frame: u64,
    progress: ProgressSample,
    camera: [f32; 3],
    rotation: Option<[f32; 3]>,
    position: Option<[f32; 3]>,
    counters: Vec<String>,
}

/// Headless renderer: captures what would be drawn.
#[derive(Default)]
struct RecordingRenderer {
    counters: Vec<usize>,
    last: Option<FrameRecord>,
}

impl SceneRenderer for RecordingRenderer {
    fn draw(&mut self, view: &FrameView<'_>) -> Result<()> {
        self.last = Some(FrameRecord {
            frame: view.frame,
            progress: ProgressSample::default(),
            camera: view.camera.position.to_array(),
            rotation: view.object.map(|o| o.rotation.to_array()),
            position: view.object.map(|o| o.position.to_array()),
            counters: self
                .counters
                .iter()
                .filter_map(|id| view.document.text(*id))
                .map(str::to_string)
                .collect(),
        });
        Ok(())
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize Logging
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from(cli.log_level).into())
        .from_env_lossy();

    let subscriber_builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match cli.log_format {
        LogFormat::Json => subscriber_builder.json().init(),
        LogFormat::Pretty => subscriber_builder.pretty().init(),
    }

    if let Err(e) = run(&cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    info!("Input: {:?}", cli.input);
    let (visibility, reporter) = ChannelVisibility::new();
    let mut stage = load(cli, Box::new(visibility))?;

    if !stage.is_running() {
        match &cli.model {
            Some(path) => {
                let path = path.to_string_lossy();
                stage.load_model(&DefaultModelLoader, &path)?;
            }
            None => {
                warn!("No model given, using a unit placeholder");
                stage.install_model(Ok(placeholder_model()))?;
            }
        }
    }

    sweep(cli, &mut stage, &reporter)
}

fn load(cli: &Cli, visibility: Box<dyn ObservesVisibility>) -> Result<Stage> {
    let source = fs::read_to_string(&cli.input)
        .with_context(|| format!("Error reading {:?}", cli.input))?;

    if is_rhai(&cli.input) {
        let timeline = eval_timeline_script(&source)?;
        let config = StageConfig {
            frame_rate: cli.fps,
            ..Default::default()
        };
        info!("Script evaluated successfully");
        Ok(Stage::new(config, timeline, showcase::document(), visibility))
    } else {
        scrollstage_pipeline::load_stage_json(&source, visibility)
    }
}

fn placeholder_model() -> LoadedModel {
    LoadedModel::new(
        "placeholder",
        ModelBounds {
            center: Vec3::ZERO,
            size: Vec3::new(1.0, 1.0, 1.0),
        },
    )
}

/// Scrolls linearly from top to bottom, one frame per step.
fn sweep(cli: &Cli, stage: &mut Stage, reporter: &VisibilityReporter) -> Result<()> {
    let mut renderer = RecordingRenderer {
        counters: stage.counters().counters().iter().map(|c| c.element).collect(),
        last: None,
    };
    // Counters sit in the hero section, visible on the first frame.
    for id in &renderer.counters {
        reporter.report(*id, 1.0);
    }

    let dt_ms = if cli.fps > 0.0 { 1000.0 / cli.fps } else { 0.0 };
    let steps = cli.frames.saturating_sub(1).max(1) as f64;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for i in 0..cli.frames {
        stage.on_scroll(cli.range * i as f64 / steps, cli.range);
        stage.frame(dt_ms, &mut renderer);
        if let Some(mut record) = renderer.last.take() {
            record.progress = stage.progress();
            serde_json::to_writer(&mut out, &record)?;
            writeln!(out)?;
        }
    }
    out.flush()?;

    info!(
        frames = stage.render_loop().frames_drawn(),
        progress = stage.progress().smoothed,
        "Sweep complete"
    );
    Ok(())
}

fn is_rhai(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("rhai")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    fn demo_cli(name: &str) -> Cli {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../demos")
            .join(name);
        Cli::parse_from([OsString::from("scrollstage"), path.into_os_string()])
    }

    #[test]
    fn rhai_demo_loads_through_the_script_engine() {
        let cli = demo_cli("showcase.rhai");
        assert!(is_rhai(&cli.input));

        let (visibility, _reporter) = ChannelVisibility::new();
        let stage = load(&cli, Box::new(visibility)).unwrap();
        assert!(!stage.is_running());
        assert_eq!(stage.timeline().duration(), showcase::LENGTH);
        assert_eq!(
            stage.timeline().tracks().len(),
            showcase::timeline().tracks().len()
        );
        assert_eq!(stage.config().frame_rate, 60.0);
    }

    #[test]
    fn json_demo_uses_the_pipeline() {
        let cli = demo_cli("showcase.json");
        assert!(!is_rhai(&cli.input));

        let (visibility, _reporter) = ChannelVisibility::new();
        let stage = load(&cli, Box::new(visibility)).unwrap();
        assert_eq!(stage.timeline().duration(), showcase::LENGTH);
    }
}
