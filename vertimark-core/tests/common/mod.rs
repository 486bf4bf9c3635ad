// vertimark-core/tests/common/mod.rs
//
// Shared fixtures for the integration tests.

#![allow(dead_code)]

use image::{Rgba, RgbaImage};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use vertimark_core::config::{CoreConfig, CoreConfigBuilder};

/// Writes a small opaque PNG usable as a watermark.
pub fn write_watermark(dir: &Path) -> PathBuf {
    let path = dir.join("logo.png");
    RgbaImage::from_pixel(400, 100, Rgba([255, 255, 255, 255]))
        .save(&path)
        .expect("Failed to write watermark fixture");
    path
}

/// Creates a placeholder input file; its content is never decoded in tests.
pub fn create_dummy_file(dir: &Path, filename: &str) -> PathBuf {
    let file_path = dir.join(filename);
    let mut file = File::create(&file_path).expect("Failed to create dummy file");
    file.write_all(b"dummy content").expect("Failed to write dummy content");
    file_path
}

pub fn config(input_dir: &Path, output_dir: &Path, watermark: &Path, seed: u64) -> CoreConfig {
    CoreConfigBuilder::new()
        .input_dir(input_dir.to_path_buf())
        .output_dir(output_dir.to_path_buf())
        .watermark_path(watermark.to_path_buf())
        .seed(seed)
        .build()
}

/// Entries left in a directory, by name, sorted.
pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("Failed to read directory")
        .filter_map(Result::ok)
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
