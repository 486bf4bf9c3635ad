//! Core library for turning video clips into watermarked 9:16 outputs.
//!
//! This crate provides video file discovery, 9:16 canvas planning, the
//! randomized watermark transform and placement, and the ffprobe/ffmpeg
//! plumbing that renders each clip.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use vertimark_core::config::CoreConfigBuilder;
//! use vertimark_core::external::{CrateFfprobeExecutor, SidecarSpawner};
//! use vertimark_core::processing::{BatchRunner, CompositionDirector};
//! use std::path::PathBuf;
//!
//! let config = CoreConfigBuilder::new()
//!     .input_dir(PathBuf::from("/path/to/input"))
//!     .output_dir(PathBuf::from("/path/to/output"))
//!     .watermark_path(PathBuf::from("/path/to/logo.png"))
//!     .build();
//! config.validate().unwrap();
//!
//! let files = vertimark_core::find_processable_files(&config.input_dir).unwrap();
//! let spawner = SidecarSpawner;
//! let probe = CrateFfprobeExecutor::new();
//!
//! let mut runner = BatchRunner::new(CompositionDirector::new(&config, &spawner, &probe));
//! let report = runner.run(&files).unwrap();
//! println!("{} succeeded, {} failed", report.succeeded(), report.failed());
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod external;
pub mod processing;
pub mod temp_files;
pub mod utils;

// Re-exports for public API
pub use config::{CoreConfig, CoreConfigBuilder};
pub use discovery::{find_processable_files, has_video_extension};
pub use error::{CoreError, CoreResult, ProcessingErrorKind};
pub use external::{check_dependency, check_required_tools};
pub use processing::{BatchReport, BatchRunner, CompositionDirector, WatermarkResult};
pub use utils::{format_bytes, format_duration, output_path_for};
