// ============================================================================
// vertimark-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Core error types for the vertimark-core library
//
// This module defines the error taxonomy shared by every processing stage.
// The four processing kinds (Dimension, Probe, AssetLoad, Render) are the
// per-file failures recorded by the batch runner; the remaining variants
// cover infrastructure problems such as missing tools or bad paths.
//
// KEY COMPONENTS:
// - CoreError: The main error enum
// - CoreResult: Result alias used throughout the crate
// - ProcessingErrorKind: Coarse classification of per-file failures
// - Helper constructors for external command failures

use std::fmt;
use std::io;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors produced by the vertimark-core library.
#[derive(Error, Debug)]
pub enum CoreError {
    // ---- Per-file processing failures ----
    /// Malformed or non-positive geometry (probe result or computed size).
    #[error("Dimension error: {0}")]
    Dimension(String),

    /// The metadata probe failed or returned unparsable output.
    #[error("Probe error: {0}")]
    Probe(String),

    /// The watermark image could not be decoded or produced invalid dimensions.
    #[error("Watermark asset error: {0}")]
    AssetLoad(String),

    /// The renderer exited non-zero, could not be started or produced no output.
    #[error("Render error: {0}")]
    Render(String),

    // ---- Infrastructure failures ----
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Path error: {0}")]
    PathError(String),

    #[error("No processable video files found in input directory")]
    NoFilesFound,

    #[error("Required dependency '{0}' not found. Please ensure it is installed and in your PATH.")]
    DependencyNotFound(String),

    #[error("Failed to start command '{0}': {1}")]
    CommandStart(String, io::Error),

    #[error("Command '{0}' failed with status {1}. Stderr: {2}")]
    CommandFailed(String, ExitStatus, String),

    #[error("Failed to wait for command '{0}': {1}")]
    CommandWait(String, io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    JsonParseError(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

/// Result alias for vertimark-core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Coarse classification of a per-file failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingErrorKind {
    Dimension,
    Probe,
    AssetLoad,
    Render,
    Other,
}

impl fmt::Display for ProcessingErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProcessingErrorKind::Dimension => "DimensionError",
            ProcessingErrorKind::Probe => "ProbeError",
            ProcessingErrorKind::AssetLoad => "AssetLoadError",
            ProcessingErrorKind::Render => "RenderError",
            ProcessingErrorKind::Other => "Error",
        };
        f.write_str(label)
    }
}

impl CoreError {
    /// Returns the processing kind of this error.
    #[must_use]
    pub fn kind(&self) -> ProcessingErrorKind {
        match self {
            CoreError::Dimension(_) => ProcessingErrorKind::Dimension,
            CoreError::Probe(_) => ProcessingErrorKind::Probe,
            CoreError::AssetLoad(_) => ProcessingErrorKind::AssetLoad,
            CoreError::Render(_) => ProcessingErrorKind::Render,
            _ => ProcessingErrorKind::Other,
        }
    }
}

// ============================================================================
// HELPER CONSTRUCTORS
// ============================================================================

/// Builds a `CommandStart` error for the given command label.
pub fn command_start_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandStart(cmd.into(), err)
}

/// Builds a `CommandFailed` error for the given command label.
pub fn command_failed_error(
    cmd: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed(cmd.into(), status, stderr.into())
}

/// Builds a `CommandWait` error for the given command label.
pub fn command_wait_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandWait(cmd.into(), err)
}
