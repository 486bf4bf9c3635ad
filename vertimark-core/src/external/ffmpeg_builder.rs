//! FFmpeg command builder utilities
//!
//! Common options shared by every ffmpeg invocation the renderer makes.

use ffmpeg_sidecar::command::FfmpegCommand;

/// Builder for creating `FFmpeg` commands with common configurations
pub struct FfmpegCommandBuilder {
    cmd: FfmpegCommand,
    overwrite: bool,
}

impl Default for FfmpegCommandBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegCommandBuilder {
    /// Banner hidden, existing outputs overwritten.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cmd: FfmpegCommand::new(),
            overwrite: true,
        }
    }

    /// Sets whether an existing output file is replaced (`-y`) or the run fails (`-n`)
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    #[must_use]
    pub fn build(mut self) -> FfmpegCommand {
        self.cmd.hide_banner();
        self.cmd.arg(if self.overwrite { "-y" } else { "-n" });
        self.cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(cmd: &FfmpegCommand) -> Vec<String> {
        cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn defaults_hide_banner_and_overwrite() {
        let args = args(&FfmpegCommandBuilder::new().build());
        assert!(args.iter().any(|a| a == "-hide_banner"));
        assert!(args.iter().any(|a| a == "-y"));
    }

    #[test]
    fn overwrite_can_be_disabled() {
        let args = args(&FfmpegCommandBuilder::new().with_overwrite(false).build());
        assert!(args.iter().any(|a| a == "-n"));
        assert!(!args.iter().any(|a| a == "-y"));
    }
}
