//! Utility functions for formatting and path handling.
//!
//! General-purpose helpers used by the core library and the CLI summary.

use crate::config::{OUTPUT_EXTENSION, OUTPUT_SUFFIX};
use crate::error::{CoreError, CoreResult};
use std::path::{Path, PathBuf};

/// Formats seconds as HH:MM:SS (e.g., 3725.0 -> "01:02:05"). Returns "??:??:??" for invalid inputs.
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    if seconds < 0.0 || !seconds.is_finite() {
        return "??:??:??".to_string();
    }

    let total_seconds = seconds as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Formats bytes with appropriate binary units (B, KiB, MiB, GiB).
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;
    const GIB: f64 = MIB * 1024.0;

    let bytes_f64 = bytes as f64;
    if bytes_f64 >= GIB {
        format!("{:.2} GiB", bytes_f64 / GIB)
    } else if bytes_f64 >= MIB {
        format!("{:.2} MiB", bytes_f64 / MIB)
    } else if bytes_f64 >= KIB {
        format!("{:.2} KiB", bytes_f64 / KIB)
    } else {
        format!("{bytes} B")
    }
}

/// Extracts the filename from a path, or fails with `PathError`.
pub fn get_filename_safe(path: &Path) -> CoreResult<String> {
    Ok(path
        .file_name()
        .ok_or_else(|| CoreError::PathError(format!("Failed to get filename for {}", path.display())))?
        .to_string_lossy()
        .to_string())
}

/// Builds `<output_dir>/<input-stem>_wm.mp4` for an input file.
pub fn output_path_for(input_path: &Path, output_dir: &Path) -> CoreResult<PathBuf> {
    let stem = input_path
        .file_stem()
        .ok_or_else(|| {
            CoreError::PathError(format!("Failed to get filename stem for {}", input_path.display()))
        })?
        .to_string_lossy();

    Ok(output_dir.join(format!("{stem}{OUTPUT_SUFFIX}.{OUTPUT_EXTENSION}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "00:00:00");
        assert_eq!(format_duration(3725.0), "01:02:05");
        assert_eq!(format_duration(-1.0), "??:??:??");
        assert_eq!(format_duration(f64::INFINITY), "??:??:??");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1536), "1.50 KiB");
        assert_eq!(format_bytes(1024 * 1024), "1.00 MiB");
        assert_eq!(format_bytes(1024 * 1024 * 1024), "1.00 GiB");
    }

    #[test]
    fn output_name_uses_stem_and_suffix() {
        let out = output_path_for(Path::new("/in/holiday.MOV"), Path::new("/out")).unwrap();
        assert_eq!(out, PathBuf::from("/out/holiday_wm.mp4"));

        let out = output_path_for(Path::new("clip.tar.mkv"), Path::new("out")).unwrap();
        assert_eq!(out, PathBuf::from("out/clip.tar_wm.mp4"));
    }

    #[test]
    fn filename_of_root_is_an_error() {
        assert!(matches!(get_filename_safe(Path::new("/")), Err(CoreError::PathError(_))));
    }
}
