// ============================================================================
// vertimark-core/src/processing/batch.rs
// ============================================================================
//
// BATCH RUNNER: Sequential Processing With Per-File Isolation
//
// Takes the candidate files, keeps the ones with a video extension, sorts
// them and sends each through the CompositionDirector. A failing file is
// logged and recorded; the batch always continues with the next file and
// never retries.
//
// KEY COMPONENTS:
// - BatchRunner: drives the director over a file list
// - FileOutcome / BatchReport: per-file results in processing order
// - BatchReport::to_json: machine-readable summary

use log::{error, info, warn};

use crate::discovery::has_video_extension;
use crate::error::{CoreError, CoreResult, ProcessingErrorKind};
use crate::external::{FfmpegSpawner, FfprobeExecutor};
use crate::processing::director::{CompositionDirector, WatermarkResult};
use crate::utils::{get_filename_safe, output_path_for};

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Result of one input file.
#[derive(Debug)]
pub struct FileOutcome {
    pub input_path: PathBuf,
    pub filename: String,
    pub output_path: PathBuf,
    pub result: CoreResult<WatermarkResult>,
}

impl FileOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// All outcomes of a batch, in processing order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
    /// Inputs dropped before queuing because of their extension.
    pub skipped: Vec<PathBuf>,
}

#[derive(serde::Serialize)]
struct JsonEntry<'a> {
    file: &'a str,
    input_path: &'a Path,
    output_path: &'a Path,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a WatermarkResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_kind: Option<ProcessingErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(serde::Serialize)]
struct JsonReport<'a> {
    total: usize,
    succeeded: usize,
    failed: usize,
    skipped: &'a [PathBuf],
    files: Vec<JsonEntry<'a>>,
}

impl BatchReport {
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    pub fn successes(&self) -> impl Iterator<Item = &WatermarkResult> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    /// `(filename, error)` for every failed file.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &CoreError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.filename.as_str(), e)))
    }

    /// Serializes the report as pretty-printed JSON.
    pub fn to_json(&self) -> CoreResult<String> {
        let files = self
            .outcomes
            .iter()
            .map(|o| match &o.result {
                Ok(result) => JsonEntry {
                    file: &o.filename,
                    input_path: &o.input_path,
                    output_path: &o.output_path,
                    status: "ok",
                    result: Some(result),
                    error_kind: None,
                    error: None,
                },
                Err(e) => JsonEntry {
                    file: &o.filename,
                    input_path: &o.input_path,
                    output_path: &o.output_path,
                    status: "failed",
                    result: None,
                    error_kind: Some(e.kind()),
                    error: Some(e.to_string()),
                },
            })
            .collect();

        let report = JsonReport {
            total: self.outcomes.len(),
            succeeded: self.succeeded(),
            failed: self.failed(),
            skipped: &self.skipped,
            files,
        };
        serde_json::to_string_pretty(&report).map_err(|e| CoreError::JsonParseError(e.to_string()))
    }
}

/// Runs a [`CompositionDirector`] over a list of files.
pub struct BatchRunner<'a, S: FfmpegSpawner, P: FfprobeExecutor> {
    director: CompositionDirector<'a, S, P>,
}

impl<'a, S: FfmpegSpawner, P: FfprobeExecutor> BatchRunner<'a, S, P> {
    #[must_use]
    pub fn new(director: CompositionDirector<'a, S, P>) -> Self {
        Self { director }
    }

    #[must_use]
    pub fn director(&self) -> &CompositionDirector<'a, S, P> {
        &self.director
    }

    /// Processes `files` one by one and reports every outcome.
    ///
    /// Only an unusable output directory aborts the batch; per-file errors
    /// are recorded in the report.
    pub fn run(&mut self, files: &[PathBuf]) -> CoreResult<BatchReport> {
        let output_dir = self.director.config().output_dir.clone();
        std::fs::create_dir_all(&output_dir)?;

        let (mut queue, skipped): (Vec<PathBuf>, Vec<PathBuf>) =
            files.iter().cloned().partition(|p| has_video_extension(p));
        for path in &skipped {
            warn!("Skipping {}: not a recognised video extension", path.display());
        }
        queue.sort();
        queue.dedup();

        warn_on_output_collisions(&queue, &output_dir);

        let total = queue.len();
        let mut report = BatchReport {
            outcomes: Vec::with_capacity(total),
            skipped,
        };

        for (index, input_path) in queue.into_iter().enumerate() {
            let outcome = self.run_one(input_path, &output_dir, index + 1, total);
            report.outcomes.push(outcome);
        }

        info!(
            "Batch finished: {} succeeded, {} failed",
            report.succeeded(),
            report.failed()
        );
        Ok(report)
    }

    fn run_one(&mut self, input_path: PathBuf, output_dir: &Path, position: usize, total: usize) -> FileOutcome {
        let filename = get_filename_safe(&input_path)
            .unwrap_or_else(|_| input_path.display().to_string());
        info!("[{position}/{total}] Processing {filename}");

        let prepared = output_path_for(&input_path, output_dir);
        let output_path = prepared
            .as_ref()
            .map_or_else(|_| output_dir.to_path_buf(), PathBuf::clone);

        let result = prepared.and_then(|out| self.director.direct(&input_path, &out));
        match &result {
            Ok(done) => info!("{filename}: done -> {}", done.output_path.display()),
            Err(e) => error!("{filename}: {}: {e}", e.kind()),
        }

        FileOutcome {
            input_path,
            filename,
            output_path,
            result,
        }
    }
}

fn warn_on_output_collisions(queue: &[PathBuf], output_dir: &Path) {
    let mut seen: HashMap<PathBuf, &Path> = HashMap::new();
    for input in queue {
        let Ok(output) = output_path_for(input, output_dir) else {
            continue;
        };
        if let Some(first) = seen.get(&output) {
            warn!(
                "{} and {} both write {}; the later file overwrites the earlier output",
                first.display(),
                input.display(),
                output.display()
            );
        } else {
            seen.insert(output, input);
        }
    }
}
