// vertimark-core/tests/director_tests.rs

mod common;

use common::{config, create_dummy_file, dir_entries, write_watermark};
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use std::path::PathBuf;
use tempfile::tempdir;
use vertimark_core::error::CoreError;
use vertimark_core::external::mocks::{MockFfmpegSpawner, MockFfprobeExecutor};
use vertimark_core::processing::{CompositionDirector, DirectorStage};

struct Fixture {
    _input_dir: tempfile::TempDir,
    output_dir: tempfile::TempDir,
    _assets: tempfile::TempDir,
    input: PathBuf,
    output: PathBuf,
    watermark: PathBuf,
}

fn fixture() -> Fixture {
    let input_dir = tempdir().unwrap();
    let output_dir = tempdir().unwrap();
    let assets = tempdir().unwrap();
    let watermark = write_watermark(assets.path());
    let input = create_dummy_file(input_dir.path(), "clip.mp4");
    let output = output_dir.path().join("clip_wm.mp4");
    Fixture {
        _input_dir: input_dir,
        output_dir,
        _assets: assets,
        input,
        output,
        watermark,
    }
}

#[test]
fn test_padded_render_arguments() -> Result<(), Box<dyn std::error::Error>> {
    let fx = fixture();
    let probe = MockFfprobeExecutor::new();
    probe.expect_dimensions(&fx.input, 1080, 1350);
    let spawner = MockFfmpegSpawner::new();
    spawner.add_success_expectation("clip_wm.mp4", vec![], true);

    let config = config(fx.input.parent().unwrap(), fx.output_dir.path(), &fx.watermark, 11);
    let mut director = CompositionDirector::new(&config, &spawner, &probe);
    let result = director.direct(&fx.input, &fx.output)?;

    assert_eq!(director.stage(), DirectorStage::Done);
    assert_eq!(result.filename, "clip.mp4");
    assert_eq!(result.output_size, std::fs::metadata(&fx.output)?.len());
    assert!(result.angle_degrees.abs() <= 8.0);

    let calls = spawner.get_received_calls();
    assert_eq!(calls.len(), 1);
    let args = &calls[0];
    let graph = args
        .iter()
        .position(|a| a == "-filter_complex")
        .map(|i| args[i + 1].clone())
        .expect("filter_complex missing");
    assert!(graph.starts_with("[0:v]pad=1080:1920:0:285:color=black[bg];"), "{graph}");
    assert!(graph.ends_with(&format!(
        "overlay={}:{}:format=auto[vout]",
        result.position.x, result.position.y
    )));

    // The watermark PNG lived in a temp directory that is gone now.
    let watermark_input = &args[args.iter().rposition(|a| a == "-i").unwrap() + 1];
    assert!(watermark_input.ends_with(".png"));
    assert!(!std::path::Path::new(watermark_input).exists());
    assert_eq!(dir_entries(fx.output_dir.path()), ["clip_wm.mp4"]);
    Ok(())
}

#[test]
fn test_direct_render_for_vertical_source() -> Result<(), Box<dyn std::error::Error>> {
    let fx = fixture();
    let probe = MockFfprobeExecutor::new();
    probe.expect_dimensions(&fx.input, 1080, 1920);
    let spawner = MockFfmpegSpawner::new();
    spawner.add_success_expectation("[0:v]format=rgba[bg]", vec![], true);

    let config = config(fx.input.parent().unwrap(), fx.output_dir.path(), &fx.watermark, 5);
    let mut director = CompositionDirector::new(&config, &spawner, &probe);
    let result = director.direct(&fx.input, &fx.output)?;

    assert!(!result.canvas.is_padded());
    assert_eq!(spawner.remaining_expectations(), 0);
    Ok(())
}

#[test]
fn test_nonzero_exit_is_render_error_with_diagnostics() {
    let fx = fixture();
    let probe = MockFfprobeExecutor::new();
    probe.expect_dimensions(&fx.input, 1280, 720);
    let spawner = MockFfmpegSpawner::new();
    spawner.add_exit_error_expectation(
        "clip_wm.mp4",
        vec![
            FfmpegEvent::Log(LogLevel::Error, "Unknown encoder 'libx264'".to_string()),
            FfmpegEvent::Error("Conversion failed!".to_string()),
        ],
        1,
    );

    let config = config(fx.input.parent().unwrap(), fx.output_dir.path(), &fx.watermark, 2);
    let mut director = CompositionDirector::new(&config, &spawner, &probe);

    match director.direct(&fx.input, &fx.output) {
        Err(CoreError::Render(msg)) => {
            assert!(msg.contains("Unknown encoder"), "{msg}");
            assert!(msg.contains("Conversion failed!"), "{msg}");
        }
        other => panic!("Unexpected result: {other:?}"),
    }
    assert_eq!(director.stage(), DirectorStage::Failed);
    assert!(dir_entries(fx.output_dir.path()).is_empty());
}

#[test]
fn test_missing_output_is_render_error() {
    let fx = fixture();
    let probe = MockFfprobeExecutor::new();
    probe.expect_dimensions(&fx.input, 1280, 720);
    let spawner = MockFfmpegSpawner::new();
    spawner.add_success_expectation("clip_wm.mp4", vec![], false);

    let config = config(fx.input.parent().unwrap(), fx.output_dir.path(), &fx.watermark, 2);
    let mut director = CompositionDirector::new(&config, &spawner, &probe);

    match director.direct(&fx.input, &fx.output) {
        Err(CoreError::Render(msg)) => assert!(msg.contains("was not created"), "{msg}"),
        other => panic!("Unexpected result: {other:?}"),
    }
}

#[test]
fn test_output_that_is_not_a_file_is_render_error() {
    let fx = fixture();
    std::fs::create_dir(&fx.output).unwrap();
    let probe = MockFfprobeExecutor::new();
    probe.expect_dimensions(&fx.input, 1280, 720);
    let spawner = MockFfmpegSpawner::new();
    spawner.add_success_expectation("clip_wm.mp4", vec![], false);

    let config = config(fx.input.parent().unwrap(), fx.output_dir.path(), &fx.watermark, 2);
    let mut director = CompositionDirector::new(&config, &spawner, &probe);

    match director.direct(&fx.input, &fx.output) {
        Err(CoreError::Render(msg)) => assert!(msg.contains("is not a file"), "{msg}"),
        other => panic!("Unexpected result: {other:?}"),
    }
    assert_eq!(director.stage(), DirectorStage::Failed);
}

#[test]
fn test_spawn_failure_is_render_error() {
    let fx = fixture();
    let probe = MockFfprobeExecutor::new();
    probe.expect_dimensions(&fx.input, 1280, 720);
    let spawner = MockFfmpegSpawner::new();
    spawner.add_spawn_error_expectation(
        "clip_wm.mp4",
        CoreError::CommandStart(
            "ffmpeg".to_string(),
            std::io::Error::new(std::io::ErrorKind::NotFound, "no ffmpeg"),
        ),
    );

    let config = config(fx.input.parent().unwrap(), fx.output_dir.path(), &fx.watermark, 2);
    let mut director = CompositionDirector::new(&config, &spawner, &probe);

    assert!(matches!(
        director.direct(&fx.input, &fx.output),
        Err(CoreError::Render(_))
    ));
}

#[test]
fn test_probe_failure_stops_before_rendering() {
    let fx = fixture();
    let probe = MockFfprobeExecutor::new();
    probe.expect_failure(&fx.input, "Invalid data found when processing input");
    let spawner = MockFfmpegSpawner::new();

    let config = config(fx.input.parent().unwrap(), fx.output_dir.path(), &fx.watermark, 2);
    let mut director = CompositionDirector::new(&config, &spawner, &probe);

    assert!(matches!(
        director.direct(&fx.input, &fx.output),
        Err(CoreError::Probe(_))
    ));
    assert!(spawner.get_received_calls().is_empty());
}

#[test]
fn test_non_positive_dimensions_are_dimension_errors() {
    let fx = fixture();
    let probe = MockFfprobeExecutor::new();
    probe.expect_dimensions(&fx.input, 1920, -1);
    let spawner = MockFfmpegSpawner::new();

    let config = config(fx.input.parent().unwrap(), fx.output_dir.path(), &fx.watermark, 2);
    let mut director = CompositionDirector::new(&config, &spawner, &probe);

    assert!(matches!(
        director.direct(&fx.input, &fx.output),
        Err(CoreError::Dimension(_))
    ));
    assert!(spawner.get_received_calls().is_empty());
}

#[test]
fn test_unreadable_watermark_is_asset_error() {
    let fx = fixture();
    let probe = MockFfprobeExecutor::new();
    probe.expect_dimensions(&fx.input, 1080, 1920);
    let spawner = MockFfmpegSpawner::new();

    let broken = fx.output_dir.path().join("broken.png");
    std::fs::write(&broken, b"not an image").unwrap();

    let config = config(fx.input.parent().unwrap(), fx.output_dir.path(), &broken, 2);
    let mut director = CompositionDirector::new(&config, &spawner, &probe);

    assert!(matches!(
        director.direct(&fx.input, &fx.output),
        Err(CoreError::AssetLoad(_))
    ));
    assert!(spawner.get_received_calls().is_empty());
}
