//! Temporary file management utilities.
//!
//! Helpers for creating temporary directories and files. The tempfile crate
//! removes them on drop, so cleanup also happens on error paths.

use crate::config::CoreConfig;
use crate::error::CoreResult;
use std::path::Path;
use tempfile::{Builder as TempFileBuilder, NamedTempFile, TempDir};

/// Creates a temporary directory with prefix. Auto-cleaned when dropped.
pub fn create_temp_dir(config: &CoreConfig, prefix: &str) -> CoreResult<TempDir> {
    let temp_base_dir = config.temp_dir.as_ref().unwrap_or(&config.output_dir);
    std::fs::create_dir_all(temp_base_dir)?;

    Ok(TempFileBuilder::new()
        .prefix(prefix)
        .tempdir_in(temp_base_dir)?)
}

/// Creates a temporary file with prefix and extension. Auto-deleted when dropped.
pub fn create_temp_file(dir: &Path, prefix: &str, extension: &str) -> CoreResult<NamedTempFile> {
    std::fs::create_dir_all(dir)?;
    let temp_file = TempFileBuilder::new()
        .prefix(&format!("{prefix}_"))
        .suffix(&format!(".{extension}"))
        .tempfile_in(dir)?;

    Ok(temp_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoreConfigBuilder;

    #[test]
    fn temp_dir_is_removed_on_drop() {
        let base = tempfile::tempdir().unwrap();
        let config = CoreConfigBuilder::new()
            .output_dir(base.path().to_path_buf())
            .build();

        let dir = create_temp_dir(&config, "vertimark_test_").unwrap();
        let path = dir.path().to_path_buf();
        assert!(path.exists());
        assert!(path.starts_with(base.path()));

        drop(dir);
        assert!(!path.exists());
    }

    #[test]
    fn temp_file_has_prefix_and_extension() {
        let base = tempfile::tempdir().unwrap();
        let file = create_temp_file(base.path(), "watermark", "png").unwrap();
        let name = file.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("watermark_"));
        assert!(name.ends_with(".png"));
    }
}
