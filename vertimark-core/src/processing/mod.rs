//! Per-video pipeline and batch orchestration.
//!
//! Leaves first: geometry and watermark transform are pure, placement only
//! needs a random source, the director ties them to ffprobe and ffmpeg, and
//! the batch runner drives the director over a file list.

/// 9:16 canvas planning
pub mod geometry;

/// Randomized watermark scale, opacity and rotation
pub mod watermark;

/// Corner choice and overlay coordinates
pub mod placement;

/// Per-video stage driver and ffmpeg rendering
pub mod director;

/// Sequential batch processing with per-file isolation
pub mod batch;

pub use batch::{BatchReport, BatchRunner, FileOutcome};
pub use director::{
    CompositeGraph, CompositionDirective, CompositionDirector, DirectorStage, WatermarkResult,
};
pub use geometry::{CanvasPlan, VideoDimensions};
pub use placement::{Corner, OverlayPosition};
pub use watermark::TransformedWatermark;
