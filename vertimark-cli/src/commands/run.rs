//! Implementation of the 'run' subcommand.
//!
//! Resolves the inputs, builds the core configuration from the flags, checks
//! for ffmpeg/ffprobe and hands the batch to vertimark-core. Ends with a
//! per-file summary and an optional JSON report.

use crate::cli::RunArgs;
use crate::error::{CliErrorContext, CliResult};
use crate::logging;
use crate::terminal;

use vertimark_core::config::{CoreConfig, CoreConfigBuilder};
use vertimark_core::external::{CrateFfprobeExecutor, SidecarSpawner};
use vertimark_core::processing::{BatchReport, BatchRunner, CompositionDirector};
use vertimark_core::{
    CoreError, ProcessingErrorKind, format_bytes, format_duration, has_video_extension,
};

use log::{debug, info};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Finds the videos to process from a file or directory. Returns (files, effective_input_dir).
pub fn discover_input_files(input_path: &Path) -> CliResult<(Vec<PathBuf>, PathBuf)> {
    let input_path = input_path
        .canonicalize()
        .cli_with_context(|| format!("Invalid input path '{}'", input_path.display()))?;

    let metadata = fs::metadata(&input_path)
        .cli_with_context(|| format!("Failed to access input path '{}'", input_path.display()))?;

    if metadata.is_dir() {
        let files = vertimark_core::find_processable_files(&input_path)?;
        Ok((files, input_path))
    } else if metadata.is_file() {
        if !has_video_extension(&input_path) {
            return Err(CoreError::OperationFailed(format!(
                "Input file '{}' does not have a supported video extension",
                input_path.display()
            )));
        }
        let parent_dir = input_path
            .parent()
            .cli_with_context(|| {
                format!(
                    "Could not determine parent directory for file '{}'",
                    input_path.display()
                )
            })?
            .to_path_buf();
        Ok((vec![input_path], parent_dir))
    } else {
        Err(CoreError::OperationFailed(format!(
            "Input path '{}' is neither a file nor a directory",
            input_path.display()
        )))
    }
}

/// Applies every flag on top of the core defaults and validates the result.
pub fn build_config(args: &RunArgs, input_dir: PathBuf) -> CliResult<CoreConfig> {
    let mut builder = CoreConfigBuilder::new()
        .input_dir(input_dir)
        .output_dir(args.output_dir.clone())
        .watermark_path(args.watermark.clone());

    if let Some(dir) = &args.log_dir {
        builder = builder.log_dir(dir.clone());
    }
    if let Some(dir) = &args.temp_dir {
        builder = builder.temp_dir(dir.clone());
    }
    if let Some(v) = args.width_fraction {
        builder = builder.width_fraction(v);
    }
    if let Some(v) = args.opacity {
        builder = builder.opacity(v);
    }
    if let Some(v) = args.rotation {
        builder = builder.rotation_degrees(v);
    }
    if let Some(v) = args.scale_jitter {
        builder = builder.scale_jitter(v);
    }
    if let Some(v) = args.margin_x {
        builder = builder.margin_x(v);
    }
    if let Some(v) = args.margin_y {
        builder = builder.margin_y(v);
    }
    if let Some(codec) = &args.video_codec {
        builder = builder.video_codec(codec);
    }
    if let Some(preset) = &args.preset {
        builder = builder.preset(preset);
    }
    if let Some(crf) = args.crf {
        builder = builder.crf(crf);
    }
    if let Some(codec) = &args.audio_codec {
        builder = builder.audio_codec(codec);
    }
    if let Some(bitrate) = &args.audio_bitrate {
        builder = builder.audio_bitrate(bitrate);
    }
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }

    let config = builder.build();
    config.validate()?;

    if !config.watermark_path.is_file() {
        return Err(CoreError::OperationFailed(format!(
            "Watermark image '{}' not found",
            config.watermark_path.display()
        )));
    }

    Ok(config)
}

fn display_run_info(config: &CoreConfig, files: &[PathBuf], log_path: &Path) {
    terminal::print_section("Vertimark");
    terminal::print_status("Input", &config.input_dir.display().to_string(), false);
    terminal::print_status("Output", &config.output_dir.display().to_string(), false);
    terminal::print_status("Watermark", &config.watermark_path.display().to_string(), false);
    terminal::print_status("Videos", &files.len().to_string(), true);
    terminal::print_status("Run log", &log_path.display().to_string(), false);

    let wm = &config.watermark;
    terminal::print_status(
        "Transform",
        &format!(
            "width {:.0}% ±{:.0}%, opacity {:.2}, rotation ±{}°",
            wm.width_fraction * 100.0,
            wm.scale_jitter * 100.0,
            wm.opacity,
            wm.rotation_degrees
        ),
        false,
    );
    terminal::print_status(
        "Margins",
        &format!("x {:.2}, y {:.2}", config.placement.margin_x, config.placement.margin_y),
        false,
    );
    terminal::print_status(
        "Encoder",
        &format!(
            "{} {} crf {}, {} {}",
            config.encode.video_codec,
            config.encode.preset,
            config.encode.crf,
            config.encode.audio_codec,
            config.encode.audio_bitrate
        ),
        false,
    );
    if let Some(seed) = config.seed {
        terminal::print_status("Seed", &seed.to_string(), false);
    }
}

/// Next step to suggest for a failed file.
fn failure_hint(kind: ProcessingErrorKind, log_path: &Path) -> Option<String> {
    match kind {
        ProcessingErrorKind::Probe => {
            Some("Check that the file is a readable video with a video stream".to_string())
        }
        ProcessingErrorKind::Dimension => {
            Some("ffprobe reported an unusable frame size; try re-muxing the file".to_string())
        }
        ProcessingErrorKind::AssetLoad => {
            Some("Check that the watermark is a valid PNG, JPEG or WebP image".to_string())
        }
        ProcessingErrorKind::Render => Some(format!(
            "See the ffmpeg output in the run log: {}",
            log_path.display()
        )),
        ProcessingErrorKind::Other => None,
    }
}

fn display_summary(report: &BatchReport, total_elapsed: f64, log_path: &Path) {
    terminal::print_section("Summary");

    for result in report.successes() {
        terminal::print_subsection(&result.filename);
        let canvas = &result.canvas;
        let canvas_desc = if canvas.is_padded() {
            format!(
                "{}x{} (padded {} top, {} bottom)",
                canvas.width, canvas.target_height, canvas.pad_top, canvas.pad_bottom
            )
        } else {
            format!("{}x{}", canvas.width, canvas.target_height)
        };
        terminal::print_status("Canvas", &canvas_desc, false);
        terminal::print_status(
            "Watermark",
            &format!(
                "{}x{} at {:+.1}°",
                result.watermark_width, result.watermark_height, result.angle_degrees
            ),
            false,
        );
        terminal::print_status(
            "Position",
            &format!("{} ({}, {})", result.position.corner, result.position.x, result.position.y),
            false,
        );
        terminal::print_status("Time", &format_duration(result.elapsed.as_secs_f64()), false);
        terminal::print_status("Output size", &format_bytes(result.output_size), false);
        terminal::print_status("Output", &result.output_path.display().to_string(), true);
    }

    for (filename, error) in report.failures() {
        let hint = failure_hint(error.kind(), log_path);
        terminal::print_error(
            &format!("{filename}: {}", error.kind()),
            &error.to_string(),
            hint.as_deref(),
        );
    }

    info!("");
    if report.has_failures() {
        terminal::print_warning(&format!(
            "{} of {} files failed",
            report.failed(),
            report.outcomes.len()
        ));
    } else {
        terminal::print_success(&format!("{} files watermarked", report.succeeded()));
    }
    terminal::print_status("Total time", &format_duration(total_elapsed), false);
}

/// Runs the whole batch and returns the process exit code.
///
/// Fatal problems (bad paths, invalid settings, missing ffmpeg/ffprobe)
/// are returned as errors. Per-file failures only affect the exit code when
/// `--strict` is set.
pub fn run_watermark(args: RunArgs) -> CliResult<i32> {
    let started = Instant::now();

    let (files, input_dir) = discover_input_files(&args.input_path)?;
    let config = build_config(&args, input_dir)?;

    fs::create_dir_all(&config.output_dir).cli_with_context(|| {
        format!("Failed to create output directory '{}'", config.output_dir.display())
    })?;
    let log_path = logging::init(&config.log_dir, args.verbose)?;
    debug!("Resolved configuration: {config:?}");

    vertimark_core::check_required_tools()?;

    display_run_info(&config, &files, &log_path);

    let spawner = SidecarSpawner;
    let probe = CrateFfprobeExecutor::new();
    let mut runner = BatchRunner::new(CompositionDirector::new(&config, &spawner, &probe));
    let report = runner.run(&files)?;

    display_summary(&report, started.elapsed().as_secs_f64(), &log_path);

    if let Some(report_path) = &args.report {
        let json = report.to_json()?;
        fs::write(report_path, json).cli_with_context(|| {
            format!("Failed to write report '{}'", report_path.display())
        })?;
        terminal::print_status("Report", &report_path.display().to_string(), false);
    }

    Ok(if args.strict && report.has_failures() { 1 } else { 0 })
}
