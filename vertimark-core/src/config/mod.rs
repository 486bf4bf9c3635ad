//! Configuration structures and constants for the vertimark-core library.
//!
//! This module provides the configuration surface for a watermarking run:
//! paths, the watermark transform parameters, placement margins and the
//! encoder settings handed to ffmpeg.

mod builder;

use std::path::PathBuf;

use crate::error::{CoreError, CoreResult};

pub use builder::CoreConfigBuilder;

// Default constants

/// Default watermark width relative to the video width.
pub const DEFAULT_WIDTH_FRACTION: f64 = 0.25;

/// Default watermark opacity (0..1), applied through the alpha channel.
pub const DEFAULT_OPACITY: f64 = 0.1;

/// Default random rotation range in degrees (applied as ±value).
pub const DEFAULT_ROTATION_DEGREES: f64 = 8.0;

/// Default random scale variation (applied as ±fraction of the target width).
pub const DEFAULT_SCALE_JITTER: f64 = 0.15;

/// Default horizontal margin as a fraction of the canvas width.
pub const DEFAULT_MARGIN_X: f64 = 0.05;

/// Default vertical margin from the bottom as a fraction of the canvas height.
pub const DEFAULT_MARGIN_Y: f64 = 0.5;

/// Default ffmpeg video encoder.
pub const DEFAULT_VIDEO_CODEC: &str = "libx264";

/// Default x264 preset.
pub const DEFAULT_VIDEO_PRESET: &str = "medium";

/// Default CRF quality value. Lower values produce higher quality but larger files.
pub const DEFAULT_CRF: u8 = 23;

/// Default ffmpeg audio encoder for the passed-through audio stream.
pub const DEFAULT_AUDIO_CODEC: &str = "aac";

/// Default audio bitrate.
pub const DEFAULT_AUDIO_BITRATE: &str = "128k";

/// Suffix appended to the input stem to form the output filename.
pub const OUTPUT_SUFFIX: &str = "_wm";

/// Container extension of every output file.
pub const OUTPUT_EXTENSION: &str = "mp4";

/// Parameters of the randomized watermark transform.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct WatermarkSettings {
    /// Watermark width relative to the video width, in (0, 1]
    pub width_fraction: f64,

    /// Alpha multiplier in [0, 1]
    pub opacity: f64,

    /// Rotation is drawn uniformly from [-rotation_degrees, rotation_degrees]
    pub rotation_degrees: f64,

    /// Width variation is drawn uniformly from [-scale_jitter, scale_jitter]
    pub scale_jitter: f64,
}

impl Default for WatermarkSettings {
    fn default() -> Self {
        Self {
            width_fraction: DEFAULT_WIDTH_FRACTION,
            opacity: DEFAULT_OPACITY,
            rotation_degrees: DEFAULT_ROTATION_DEGREES,
            scale_jitter: DEFAULT_SCALE_JITTER,
        }
    }
}

/// Margins used when placing the watermark on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct PlacementSettings {
    /// Distance from the left/right edge as a fraction of the canvas width
    pub margin_x: f64,

    /// Distance from the bottom edge as a fraction of the canvas height
    pub margin_y: f64,
}

impl Default for PlacementSettings {
    fn default() -> Self {
        Self {
            margin_x: DEFAULT_MARGIN_X,
            margin_y: DEFAULT_MARGIN_Y,
        }
    }
}

/// Encoder settings passed through to ffmpeg.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct EncodeSettings {
    pub video_codec: String,
    pub preset: String,
    pub crf: u8,
    pub audio_codec: String,
    pub audio_bitrate: String,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            video_codec: DEFAULT_VIDEO_CODEC.to_string(),
            preset: DEFAULT_VIDEO_PRESET.to_string(),
            crf: DEFAULT_CRF,
            audio_codec: DEFAULT_AUDIO_CODEC.to_string(),
            audio_bitrate: DEFAULT_AUDIO_BITRATE.to_string(),
        }
    }
}

/// Main configuration structure for the vertimark-core library.
///
/// Created by the consumer (e.g., vertimark-cli) and handed to the
/// [`CompositionDirector`](crate::processing::CompositionDirector).
/// Every field except the paths has a default matching the original tool.
///
/// # Examples
///
/// ```rust,no_run
/// use vertimark_core::config::CoreConfigBuilder;
/// use std::path::PathBuf;
///
/// let config = CoreConfigBuilder::new()
///     .input_dir(PathBuf::from("/path/to/videos"))
///     .output_dir(PathBuf::from("/path/to/output"))
///     .watermark_path(PathBuf::from("/path/to/watermark.png"))
///     .opacity(0.2)
///     .seed(42)
///     .build();
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Directory containing input video files to process
    pub input_dir: PathBuf,

    /// Directory where watermarked output files will be saved
    pub output_dir: PathBuf,

    /// Directory for log files
    pub log_dir: PathBuf,

    /// Still image (with alpha) used as the watermark
    pub watermark_path: PathBuf,

    /// Optional directory for temporary files (defaults to `output_dir`)
    pub temp_dir: Option<PathBuf>,

    pub watermark: WatermarkSettings,

    pub placement: PlacementSettings,

    pub encode: EncodeSettings,

    /// Seed for the batch random source; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            log_dir: PathBuf::from("."),
            watermark_path: PathBuf::from("watermark.png"),
            temp_dir: None,
            watermark: WatermarkSettings::default(),
            placement: PlacementSettings::default(),
            encode: EncodeSettings::default(),
            seed: None,
        }
    }
}

impl CoreConfig {
    /// Creates a configuration with default settings for the given paths.
    pub fn new(input_dir: PathBuf, output_dir: PathBuf, log_dir: PathBuf, watermark_path: PathBuf) -> Self {
        Self {
            input_dir,
            output_dir,
            log_dir,
            watermark_path,
            ..Self::default()
        }
    }

    /// Checks the numeric ranges of every setting.
    pub fn validate(&self) -> CoreResult<()> {
        let wm = &self.watermark;
        if !(wm.width_fraction > 0.0 && wm.width_fraction <= 1.0) {
            return Err(CoreError::Config(format!(
                "watermark width fraction must be in (0, 1], got {}",
                wm.width_fraction
            )));
        }
        if !(0.0..=1.0).contains(&wm.opacity) {
            return Err(CoreError::Config(format!(
                "opacity must be in [0, 1], got {}",
                wm.opacity
            )));
        }
        if !(wm.rotation_degrees >= 0.0 && wm.rotation_degrees <= 180.0) {
            return Err(CoreError::Config(format!(
                "rotation range must be in [0, 180] degrees, got {}",
                wm.rotation_degrees
            )));
        }
        if !(wm.scale_jitter >= 0.0 && wm.scale_jitter < 1.0) {
            return Err(CoreError::Config(format!(
                "scale jitter must be in [0, 1), got {}",
                wm.scale_jitter
            )));
        }

        for (name, value) in [("margin-x", self.placement.margin_x), ("margin-y", self.placement.margin_y)] {
            if !(value >= 0.0 && value < 1.0) {
                return Err(CoreError::Config(format!(
                    "{name} must be in [0, 1), got {value}"
                )));
            }
        }

        if self.encode.crf > 51 {
            return Err(CoreError::Config(format!(
                "crf must be in 0-51, got {}",
                self.encode.crf
            )));
        }
        if self.encode.video_codec.trim().is_empty() || self.encode.audio_codec.trim().is_empty() {
            return Err(CoreError::Config("codec names must not be empty".to_string()));
        }

        Ok(())
    }
}
