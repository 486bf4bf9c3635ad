// ============================================================================
// vertimark-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for CoreConfig
//
// Fluent API for creating CoreConfig instances. Fields that are not set keep
// the defaults from the parent module.

// ---- Standard library imports ----
use std::path::PathBuf;

// ---- Internal crate imports ----
use super::CoreConfig;

/// Builder for creating CoreConfig instances.
#[derive(Debug, Clone, Default)]
pub struct CoreConfigBuilder {
    config: CoreConfig,
    log_dir_set: bool,
}

impl CoreConfigBuilder {
    /// Creates a new CoreConfigBuilder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the input directory.
    pub fn input_dir(mut self, input_dir: PathBuf) -> Self {
        self.config.input_dir = input_dir;
        self
    }

    /// Sets the output directory. The log directory follows it
    /// (`<output>/logs`) unless set explicitly.
    pub fn output_dir(mut self, output_dir: PathBuf) -> Self {
        if !self.log_dir_set {
            self.config.log_dir = output_dir.join("logs");
        }
        self.config.output_dir = output_dir;
        self
    }

    /// Sets the log directory.
    pub fn log_dir(mut self, log_dir: PathBuf) -> Self {
        self.config.log_dir = log_dir;
        self.log_dir_set = true;
        self
    }

    /// Sets the watermark image path.
    pub fn watermark_path(mut self, watermark_path: PathBuf) -> Self {
        self.config.watermark_path = watermark_path;
        self
    }

    /// Sets the temporary directory.
    pub fn temp_dir(mut self, temp_dir: PathBuf) -> Self {
        self.config.temp_dir = Some(temp_dir);
        self
    }

    pub fn width_fraction(mut self, width_fraction: f64) -> Self {
        self.config.watermark.width_fraction = width_fraction;
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.config.watermark.opacity = opacity;
        self
    }

    pub fn rotation_degrees(mut self, rotation_degrees: f64) -> Self {
        self.config.watermark.rotation_degrees = rotation_degrees;
        self
    }

    pub fn scale_jitter(mut self, scale_jitter: f64) -> Self {
        self.config.watermark.scale_jitter = scale_jitter;
        self
    }

    pub fn margin_x(mut self, margin_x: f64) -> Self {
        self.config.placement.margin_x = margin_x;
        self
    }

    pub fn margin_y(mut self, margin_y: f64) -> Self {
        self.config.placement.margin_y = margin_y;
        self
    }

    /// Sets the ffmpeg video encoder (e.g. "libx264").
    pub fn video_codec(mut self, codec: &str) -> Self {
        self.config.encode.video_codec = codec.to_string();
        self
    }

    /// Sets the encoder preset (e.g. "medium").
    pub fn preset(mut self, preset: &str) -> Self {
        self.config.encode.preset = preset.to_string();
        self
    }

    pub fn crf(mut self, crf: u8) -> Self {
        self.config.encode.crf = crf;
        self
    }

    pub fn audio_codec(mut self, codec: &str) -> Self {
        self.config.encode.audio_codec = codec.to_string();
        self
    }

    pub fn audio_bitrate(mut self, bitrate: &str) -> Self {
        self.config.encode.audio_bitrate = bitrate.to_string();
        self
    }

    /// Seeds the batch random source for reproducible placements.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Builds the CoreConfig. Call [`CoreConfig::validate`] before use.
    pub fn build(self) -> CoreConfig {
        self.config
    }
}
