// ============================================================================
// vertimark-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with ffmpeg and ffprobe
//
// Encapsulates the two external programs the pipeline relies on. Both are
// reached through traits so the director can be driven by mocks in tests.
//
// KEY COMPONENTS:
// - FfmpegSpawner / FfmpegProcess: rendering through ffmpeg-sidecar
// - FfprobeExecutor: stream dimensions through the ffprobe crate
// - FfmpegCommandBuilder: shared ffmpeg options
// - check_dependency: presence check run before a batch

use crate::error::{CoreError, CoreResult};

use std::io;
use std::process::{Command, Stdio};

pub mod ffmpeg_builder;
pub mod ffmpeg_executor;
pub mod ffprobe_executor;

/// Scripted spawner and probe for tests.
#[cfg(all(unix, any(test, feature = "test-mocks")))]
pub mod mocks;

pub use ffmpeg_builder::FfmpegCommandBuilder;
pub use ffmpeg_executor::{FfmpegProcess, FfmpegSpawner, SidecarProcess, SidecarSpawner};
pub use ffprobe_executor::{CrateFfprobeExecutor, FfprobeExecutor};

/// External programs a batch cannot run without.
pub const REQUIRED_TOOLS: &[&str] = &["ffmpeg", "ffprobe"];

/// Checks that `cmd_name` can be executed by running it with `-version`.
///
/// # Returns
///
/// * `Ok(())` - The command started
/// * `Err(CoreError::DependencyNotFound)` - The command is not on the PATH
/// * `Err(CoreError::CommandStart)` - The command exists but failed to start
pub fn check_dependency(cmd_name: &str) -> CoreResult<()> {
    let result = Command::new(cmd_name)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {cmd_name}");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{cmd_name}' not found.");
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
        Err(e) => {
            log::error!("Failed to start dependency check command '{cmd_name}': {e}");
            Err(CoreError::CommandStart(cmd_name.to_string(), e))
        }
    }
}

/// Runs [`check_dependency`] for every tool in [`REQUIRED_TOOLS`].
pub fn check_required_tools() -> CoreResult<()> {
    REQUIRED_TOOLS.iter().try_for_each(|tool| check_dependency(tool))
}
