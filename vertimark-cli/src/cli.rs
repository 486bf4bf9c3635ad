// vertimark-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Vertimark: 9:16 normalization and randomized watermarking for video clips",
    long_about = "Pads clips to 9:16 and overlays a randomly scaled, rotated and positioned \
                  watermark using ffmpeg via the vertimark-core library."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Watermarks every video in a directory (or a single video file)
    Run(RunArgs),
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Input video file or directory of videos (top level only)
    #[arg(short = 'i', long = "input", required = true, value_name = "INPUT_PATH")]
    pub input_path: PathBuf,

    /// Directory where watermarked files will be saved (created if missing)
    #[arg(short = 'o', long = "output", required = true, value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Watermark image, ideally a PNG with transparency.
    /// Can also be set via the VERTIMARK_WATERMARK environment variable.
    #[arg(short = 'w', long, value_name = "IMAGE", env = "VERTIMARK_WATERMARK")]
    pub watermark: PathBuf,

    /// Optional: Directory for log files (defaults to OUTPUT_DIR/logs)
    #[arg(short, long, value_name = "LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Optional: Directory for temporary watermark images (defaults to OUTPUT_DIR)
    #[arg(long, value_name = "DIR")]
    pub temp_dir: Option<PathBuf>,

    // --- Watermark Transform ---
    /// Watermark width as a fraction of the video width, in (0, 1]
    #[arg(long, value_name = "FRACTION")]
    pub width_fraction: Option<f64>,

    /// Watermark opacity, in [0, 1]
    #[arg(long, value_name = "ALPHA")]
    pub opacity: Option<f64>,

    /// Maximum random rotation in degrees (applied as ±value)
    #[arg(long, value_name = "DEGREES")]
    pub rotation: Option<f64>,

    /// Maximum random width variation (applied as ±fraction)
    #[arg(long, value_name = "FRACTION")]
    pub scale_jitter: Option<f64>,

    // --- Placement ---
    /// Distance from the left/right edge as a fraction of the canvas width
    #[arg(long, value_name = "FRACTION")]
    pub margin_x: Option<f64>,

    /// Distance from the bottom edge as a fraction of the canvas height
    #[arg(long, value_name = "FRACTION")]
    pub margin_y: Option<f64>,

    // --- Encoding ---
    /// Optional: Override the ffmpeg video encoder (default: libx264)
    #[arg(long, value_name = "CODEC")]
    pub video_codec: Option<String>,

    /// Optional: Override the encoder preset (default: medium)
    #[arg(long, value_name = "PRESET")]
    pub preset: Option<String>,

    /// Optional: Override CRF quality (0-51, lower is better quality)
    #[arg(long, value_name = "CRF", value_parser = clap::value_parser!(u8).range(0..=51))]
    pub crf: Option<u8>,

    /// Optional: Override the audio encoder (default: aac)
    #[arg(long, value_name = "CODEC")]
    pub audio_codec: Option<String>,

    /// Optional: Override the audio bitrate (default: 128k)
    #[arg(long, value_name = "BITRATE")]
    pub audio_bitrate: Option<String>,

    // --- Run Behaviour ---
    /// Seed for the random scale, rotation and corner draws (reproducible runs)
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Exit with status 1 if any file failed
    #[arg(long, default_value_t = false)]
    pub strict: bool,

    /// Optional: Write a JSON report of every file to this path
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Show debug output on the console
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_run() {
        let cli = Cli::try_parse_from([
            "vertimark", "run", "-i", "in", "-o", "out", "-w", "logo.png",
        ])
        .unwrap();
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.input_path, PathBuf::from("in"));
                assert_eq!(args.output_dir, PathBuf::from("out"));
                assert_eq!(args.watermark, PathBuf::from("logo.png"));
                assert!(args.opacity.is_none());
                assert!(args.seed.is_none());
                assert!(!args.strict);
                assert!(!args.verbose);
            }
        }
    }

    #[test]
    fn parses_overrides() {
        let cli = Cli::try_parse_from([
            "vertimark",
            "run",
            "--input",
            "in",
            "--output",
            "out",
            "--watermark",
            "logo.png",
            "--opacity",
            "0.3",
            "--rotation",
            "12",
            "--margin-y",
            "0.2",
            "--crf",
            "18",
            "--seed",
            "99",
            "--strict",
            "--report",
            "report.json",
        ])
        .unwrap();
        let Commands::Run(args) = cli.command;
        assert_eq!(args.opacity, Some(0.3));
        assert_eq!(args.rotation, Some(12.0));
        assert_eq!(args.margin_y, Some(0.2));
        assert_eq!(args.crf, Some(18));
        assert_eq!(args.seed, Some(99));
        assert!(args.strict);
        assert_eq!(args.report, Some(PathBuf::from("report.json")));
    }

    #[test]
    fn rejects_out_of_range_crf() {
        let result = Cli::try_parse_from([
            "vertimark", "run", "-i", "in", "-o", "out", "-w", "logo.png", "--crf", "60",
        ]);
        assert!(result.is_err());
    }
}
