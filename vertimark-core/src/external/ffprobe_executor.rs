//! FFprobe integration for reading video stream dimensions.
//!
//! The director only needs the width and height of the first video stream;
//! everything else about the input is left to ffmpeg.

use crate::error::{CoreError, CoreResult};
use crate::processing::geometry::VideoDimensions;
use ffprobe::{FfProbeError, ffprobe};
use std::path::Path;

/// Trait for probing media files.
pub trait FfprobeExecutor {
    /// Returns the dimensions of the first video stream, unvalidated.
    fn get_video_dimensions(&self, input_path: &Path) -> CoreResult<VideoDimensions>;
}

/// Production implementation backed by the `ffprobe` crate.
#[derive(Debug, Clone, Default)]
pub struct CrateFfprobeExecutor;

impl CrateFfprobeExecutor {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl FfprobeExecutor for CrateFfprobeExecutor {
    fn get_video_dimensions(&self, input_path: &Path) -> CoreResult<VideoDimensions> {
        log::debug!(
            "Running ffprobe (via crate) for dimensions on: {}",
            input_path.display()
        );
        let metadata = ffprobe(input_path).map_err(|err| {
            log::error!("ffprobe failed on {}: {:?}", input_path.display(), err);
            map_ffprobe_error(err, input_path)
        })?;

        let video_stream = metadata
            .streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("video"))
            .ok_or_else(|| {
                CoreError::Probe(format!("No video stream found in {}", input_path.display()))
            })?;

        let width = video_stream.width.ok_or_else(|| {
            CoreError::Probe(format!("Video stream missing width in {}", input_path.display()))
        })?;
        let height = video_stream.height.ok_or_else(|| {
            CoreError::Probe(format!("Video stream missing height in {}", input_path.display()))
        })?;

        Ok(VideoDimensions::new(width, height))
    }
}

fn map_ffprobe_error(err: FfProbeError, input_path: &Path) -> CoreError {
    let file = input_path.display();
    match err {
        FfProbeError::Io(io_err) => {
            CoreError::Probe(format!("could not run ffprobe on {file}: {io_err}"))
        }
        FfProbeError::Status(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            CoreError::Probe(format!(
                "ffprobe exited with {} on {file}: {}",
                output.status,
                stderr.trim()
            ))
        }
        FfProbeError::Deserialize(err) => {
            CoreError::Probe(format!("unparsable ffprobe output for {file}: {err}"))
        }
        _ => CoreError::Probe(format!("unknown ffprobe error on {file}: {err:?}")),
    }
}
