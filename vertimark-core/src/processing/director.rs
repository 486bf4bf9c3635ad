// ============================================================================
// vertimark-core/src/processing/director.rs
// ============================================================================
//
// COMPOSITION DIRECTOR: One Video From Probe to Rendered Output
//
// Runs the per-video pipeline in a fixed order and hands the result to
// ffmpeg. Each stage consumes the output of the previous one; a failure in
// any stage stops the video and is returned to the batch runner.
//
// STAGES:
// Probing -> Planning -> TransformingWatermark -> Resolving -> Rendering -> Done
// Any stage may move to Failed.
//
// KEY COMPONENTS:
// - CompositeGraph: tagged filter graph (padded or direct overlay)
// - CompositionDirective: everything the renderer needs for one video
// - build_render_command: ffmpeg arguments for a directive
// - CompositionDirector: stage driver generic over spawner and probe

// ---- External crate imports ----
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use image::ImageFormat;
use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

// ---- Internal crate imports ----
use crate::config::{CoreConfig, EncodeSettings};
use crate::error::{CoreError, CoreResult};
use crate::external::{FfmpegCommandBuilder, FfmpegProcess, FfmpegSpawner, FfprobeExecutor};
use crate::processing::geometry::{self, CanvasPlan};
use crate::processing::placement::{self, OverlayPosition};
use crate::processing::watermark::{self, TransformedWatermark};
use crate::temp_files;
use crate::utils::get_filename_safe;

// ---- Standard library imports ----
use std::collections::VecDeque;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Label of the composited video stream inside the filter graph.
pub const VIDEO_OUTPUT_LABEL: &str = "[vout]";

/// Number of trailing ffmpeg log lines kept for error reports.
const DIAGNOSTIC_TAIL_LINES: usize = 40;

/// Where the director currently is in the per-video pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectorStage {
    Idle,
    Probing,
    Planning,
    TransformingWatermark,
    Resolving,
    Rendering,
    Done,
    Failed,
}

impl fmt::Display for DirectorStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DirectorStage::Idle => "idle",
            DirectorStage::Probing => "probing",
            DirectorStage::Planning => "planning",
            DirectorStage::TransformingWatermark => "transforming watermark",
            DirectorStage::Resolving => "resolving placement",
            DirectorStage::Rendering => "rendering",
            DirectorStage::Done => "done",
            DirectorStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Filter graph for the overlay, with or without letterboxing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeGraph {
    Padded {
        width: u32,
        height: u32,
        pad_top: u32,
        x: u32,
        y: u32,
    },
    Direct {
        x: u32,
        y: u32,
    },
}

impl CompositeGraph {
    /// Selects the padded graph only when the plan adds padding.
    #[must_use]
    pub fn new(canvas: &CanvasPlan, position: &OverlayPosition) -> Self {
        if canvas.is_padded() {
            CompositeGraph::Padded {
                width: canvas.width,
                height: canvas.target_height,
                pad_top: canvas.pad_top,
                x: position.x,
                y: position.y,
            }
        } else {
            CompositeGraph::Direct {
                x: position.x,
                y: position.y,
            }
        }
    }

    /// Renders the graph as an ffmpeg `-filter_complex` value.
    #[must_use]
    pub fn to_filter_complex(&self) -> String {
        match *self {
            CompositeGraph::Padded {
                width,
                height,
                pad_top,
                x,
                y,
            } => format!(
                "[0:v]pad={width}:{height}:0:{pad_top}:color=black[bg];\
                 [1:v]format=rgba[wm];\
                 [bg][wm]overlay={x}:{y}:format=auto{VIDEO_OUTPUT_LABEL}"
            ),
            CompositeGraph::Direct { x, y } => format!(
                "[0:v]format=rgba[bg];\
                 [1:v]format=rgba[wm];\
                 [bg][wm]overlay={x}:{y}:format=auto{VIDEO_OUTPUT_LABEL}"
            ),
        }
    }
}

/// Everything needed to render one video. Built once, consumed by [`render`].
#[derive(Debug, Clone)]
pub struct CompositionDirective {
    pub canvas: CanvasPlan,
    pub watermark: TransformedWatermark,
    pub position: OverlayPosition,
}

impl CompositionDirective {
    #[must_use]
    pub fn graph(&self) -> CompositeGraph {
        CompositeGraph::new(&self.canvas, &self.position)
    }
}

/// Outcome of a successfully watermarked video.
#[derive(Debug, Clone, serde::Serialize)]
pub struct WatermarkResult {
    pub filename: String,
    pub output_path: PathBuf,
    pub canvas: CanvasPlan,
    pub watermark_width: u32,
    pub watermark_height: u32,
    pub angle_degrees: f64,
    pub position: OverlayPosition,
    #[serde(rename = "elapsed_secs", serialize_with = "serialize_secs")]
    pub elapsed: Duration,
    pub output_size: u64,
}

fn serialize_secs<S: serde::Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(value.as_secs_f64())
}

/// Builds the ffmpeg invocation: source as input 0, watermark PNG as input 1,
/// composited video mapped from the graph and audio passed through if present.
#[must_use]
pub fn build_render_command(
    input: &Path,
    watermark_png: &Path,
    output: &Path,
    graph: &CompositeGraph,
    encode: &EncodeSettings,
) -> FfmpegCommand {
    let mut cmd = FfmpegCommandBuilder::new().build();
    cmd.input(input.to_string_lossy().as_ref())
        .input(watermark_png.to_string_lossy().as_ref())
        .args(["-filter_complex", &graph.to_filter_complex()])
        .args(["-map", VIDEO_OUTPUT_LABEL])
        .args(["-map", "0:a?"])
        .args(["-c:v", &encode.video_codec])
        .args(["-preset", &encode.preset])
        .args(["-crf", &encode.crf.to_string()])
        .args(["-c:a", &encode.audio_codec])
        .args(["-b:a", &encode.audio_bitrate])
        .output(output.to_string_lossy().as_ref());
    cmd
}

fn push_diagnostic(buffer: &mut VecDeque<String>, line: String) {
    if buffer.len() == DIAGNOSTIC_TAIL_LINES {
        buffer.pop_front();
    }
    buffer.push_back(line);
}

/// Writes the watermark to a per-video temp directory and runs ffmpeg.
/// Returns the size of the rendered file in bytes.
///
/// The temp directory is removed when this function returns, on success or
/// failure.
///
/// # Errors
///
/// `CoreError::Render` if the watermark cannot be written, ffmpeg cannot be
/// started, exits non-zero, or leaves no output file. The message carries the
/// tail of ffmpeg's log.
pub fn render<S: FfmpegSpawner>(
    spawner: &S,
    config: &CoreConfig,
    input: &Path,
    output: &Path,
    directive: &CompositionDirective,
) -> CoreResult<u64> {
    let temp_dir = temp_files::create_temp_dir(config, "vertimark_wm_")
        .map_err(|e| CoreError::Render(format!("failed to create temp directory: {e}")))?;
    let watermark_file = temp_files::create_temp_file(temp_dir.path(), "watermark", "png")
        .map_err(|e| CoreError::Render(format!("failed to create watermark file: {e}")))?;

    directive
        .watermark
        .image
        .save_with_format(watermark_file.path(), ImageFormat::Png)
        .map_err(|e| CoreError::Render(format!("failed to write watermark PNG: {e}")))?;

    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            CoreError::Render(format!("failed to create {}: {e}", parent.display()))
        })?;
    }

    let cmd = build_render_command(
        input,
        watermark_file.path(),
        output,
        &directive.graph(),
        &config.encode,
    );
    debug!("Running render command: {cmd:?}");

    let mut process = spawner
        .spawn(cmd)
        .map_err(|e| CoreError::Render(format!("failed to start ffmpeg: {e}")))?;

    let mut diagnostics = VecDeque::new();
    process
        .handle_events(|event| {
            match event {
                FfmpegEvent::Log(_level, line) => push_diagnostic(&mut diagnostics, line),
                FfmpegEvent::Error(line) => push_diagnostic(&mut diagnostics, line),
                _ => {}
            }
            Ok(())
        })
        .map_err(|e| CoreError::Render(format!("failed reading ffmpeg output: {e}")))?;

    let status = process
        .wait()
        .map_err(|e| CoreError::Render(format!("failed waiting for ffmpeg: {e}")))?;

    let log_tail = || Vec::from(diagnostics.clone()).join("\n");

    if !status.success() {
        return Err(CoreError::Render(format!(
            "ffmpeg exited with {status} for {}:\n{}",
            input.display(),
            log_tail()
        )));
    }

    match std::fs::metadata(output) {
        Ok(meta) if meta.is_file() => Ok(meta.len()),
        Ok(_) => Err(CoreError::Render(format!(
            "ffmpeg reported success but {} is not a file:\n{}",
            output.display(),
            log_tail()
        ))),
        Err(e) => Err(CoreError::Render(format!(
            "ffmpeg reported success but {} was not created ({e}):\n{}",
            output.display(),
            log_tail()
        ))),
    }
}

/// Drives one video at a time through the pipeline.
///
/// Holds the batch random source, so successive videos get independent draws
/// and a seeded director reproduces the whole batch.
pub struct CompositionDirector<'a, S: FfmpegSpawner, P: FfprobeExecutor> {
    config: &'a CoreConfig,
    spawner: &'a S,
    probe: &'a P,
    rng: StdRng,
    stage: DirectorStage,
}

impl<'a, S: FfmpegSpawner, P: FfprobeExecutor> CompositionDirector<'a, S, P> {
    /// Seeds the random source from `config.seed`, or from entropy when unset.
    pub fn new(config: &'a CoreConfig, spawner: &'a S, probe: &'a P) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, spawner, probe, rng)
    }

    pub fn with_rng(config: &'a CoreConfig, spawner: &'a S, probe: &'a P, rng: StdRng) -> Self {
        Self {
            config,
            spawner,
            probe,
            rng,
            stage: DirectorStage::Idle,
        }
    }

    /// Stage reached by the most recent [`direct`](Self::direct) call.
    #[must_use]
    pub fn stage(&self) -> DirectorStage {
        self.stage
    }

    #[must_use]
    pub fn config(&self) -> &CoreConfig {
        self.config
    }

    fn enter(&mut self, stage: DirectorStage, filename: &str) {
        debug!("{filename}: {stage}");
        self.stage = stage;
    }

    /// Watermarks `input` into `output`.
    ///
    /// # Errors
    ///
    /// `Probe`, `Dimension`, `AssetLoad` or `Render` depending on the failing
    /// stage. Nothing after the failing stage runs.
    pub fn direct(&mut self, input: &Path, output: &Path) -> CoreResult<WatermarkResult> {
        let started = Instant::now();
        let filename = get_filename_safe(input)?;

        match self.run_stages(input, output, &filename, started) {
            Ok(result) => {
                self.enter(DirectorStage::Done, &filename);
                Ok(result)
            }
            Err(e) => {
                warn!("{filename}: failed while {}", self.stage);
                self.stage = DirectorStage::Failed;
                Err(e)
            }
        }
    }

    fn run_stages(
        &mut self,
        input: &Path,
        output: &Path,
        filename: &str,
        started: Instant,
    ) -> CoreResult<WatermarkResult> {
        let config = self.config;

        self.enter(DirectorStage::Probing, filename);
        let dims = self.probe.get_video_dimensions(input)?;

        self.enter(DirectorStage::Planning, filename);
        let canvas = geometry::plan(dims.width, dims.height)?;
        debug!(
            "{filename}: {}x{} -> {}x{} (pad top {}, bottom {})",
            dims.width, dims.height, canvas.width, canvas.target_height, canvas.pad_top, canvas.pad_bottom
        );

        self.enter(DirectorStage::TransformingWatermark, filename);
        let source = watermark::load_watermark(&config.watermark_path)?;
        let transformed = watermark::transform(&source, canvas.width, &config.watermark, &mut self.rng)?;

        self.enter(DirectorStage::Resolving, filename);
        let position = placement::resolve(
            &transformed,
            canvas.width,
            canvas.target_height,
            &config.placement,
            &mut self.rng,
        );

        let directive = CompositionDirective {
            canvas,
            watermark: transformed,
            position,
        };

        self.enter(DirectorStage::Rendering, filename);
        info!("{filename}: rendering {}", output.display());
        let output_size = render(self.spawner, config, input, output, &directive)?;

        Ok(WatermarkResult {
            filename: filename.to_string(),
            output_path: output.to_path_buf(),
            canvas: directive.canvas,
            watermark_width: directive.watermark.pixel_width,
            watermark_height: directive.watermark.pixel_height,
            angle_degrees: directive.watermark.angle_degrees,
            position: directive.position,
            elapsed: started.elapsed(),
            output_size,
        })
    }
}
