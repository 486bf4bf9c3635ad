// ============================================================================
// vertimark-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: Console and Run-Log Dispatch
//
// Routes the `log` facade to two places through fern: the console (info, or
// debug with --verbose) and a timestamped run log in the log directory that
// always records debug output without terminal styling.

use log::LevelFilter;
use std::path::{Path, PathBuf};
use vertimark_core::CoreError;

use crate::error::CliResult;

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Run log path for a log directory, e.g. `logs/vertimark_run_20240601_123045.log`.
pub fn run_log_path(log_dir: &Path) -> PathBuf {
    log_dir.join(format!("vertimark_run_{}.log", get_timestamp()))
}

/// Installs the global logger. Returns the path of the run log.
pub fn init(log_dir: &Path, verbose: bool) -> CliResult<PathBuf> {
    std::fs::create_dir_all(log_dir)?;
    let log_path = run_log_path(log_dir);

    let console_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let console = fern::Dispatch::new()
        .level(console_level)
        .format(|out, message, _record| out.finish(format_args!("{message}")))
        .chain(std::io::stderr());

    let file = fern::Dispatch::new()
        .level(LevelFilter::Debug)
        .format(|out, message, record| {
            let plain = console::strip_ansi_codes(&message.to_string()).into_owned();
            out.finish(format_args!(
                "{} [{}] {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                plain
            ))
        })
        .chain(fern::log_file(&log_path)?);

    fern::Dispatch::new()
        .level(LevelFilter::Debug)
        .level_for("ffmpeg_sidecar", LevelFilter::Warn)
        .chain(console)
        .chain(file)
        .apply()
        .map_err(|e| CoreError::OperationFailed(format!("Failed to initialize logging: {e}")))?;

    Ok(log_path)
}
