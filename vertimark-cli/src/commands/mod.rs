//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command.

/// The `run` command: discover inputs, watermark them and summarize the batch.
pub mod run;
