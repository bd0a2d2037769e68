//! Command-line interface for batch scoring of adjacency request files

use crate::algorithm::comparator::anchor_count;
use crate::algorithm::engine::{AdjacencyEngine, EngineConfig};
use crate::io::configuration::{DEFAULT_LOG_LEVEL, OUTPUT_SUFFIX, REQUEST_EXTENSION};
use crate::io::error::{AdjacencyError, Result, invalid_parameter};
use crate::io::progress::ProgressManager;
use crate::io::report::{AdjacencyReport, ReportOptions};
use crate::io::request::AdjacencyRequest;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "tileseam")]
#[command(
    author,
    version,
    about = "Score rotation-aware border compatibility between shuffled tiles"
)]
/// Command-line arguments for the adjacency scorer
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Input JSON request file or directory of request files
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Matches kept per anchor, overriding the request
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Lowest combined score kept in the ranking, overriding the request
    #[arg(short = 'm', long)]
    pub min_score: Option<f64>,

    /// CNN layer whose embeddings are compared, overriding the request
    #[arg(short = 'l', long)]
    pub cnn_layer: Option<String>,

    /// Colour similarity weight, overriding the request
    #[arg(long)]
    pub color_weight: Option<f64>,

    /// Texture similarity weight, overriding the request
    #[arg(long)]
    pub gabor_weight: Option<f64>,

    /// Embedding similarity weight, overriding the request
    #[arg(long)]
    pub cnn_weight: Option<f64>,

    /// Write every comparison instead of the top-K ranking
    #[arg(short, long)]
    pub full: bool,

    /// Add the best match of every anchor to the report
    #[arg(short, long)]
    pub best_matches: bool,

    /// Compare anchors on a single thread
    #[arg(short, long)]
    pub serial: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Process files even if output exists
    #[arg(short, long)]
    pub no_skip: bool,

    /// Log filter directive used when RUST_LOG is unset
    #[arg(long, default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Report contents selected by the flags
    pub const fn report_options(&self) -> ReportOptions {
        ReportOptions {
            full: self.full,
            best_matches: self.best_matches,
        }
    }

    /// Apply command-line overrides on top of a request's configuration
    pub fn apply_overrides(&self, config: &mut EngineConfig) {
        if let Some(top_k) = self.top_k {
            config.top_k = top_k;
        }
        if let Some(min_score) = self.min_score {
            config.min_score = Some(min_score);
        }
        if let Some(ref layer) = self.cnn_layer {
            config.cnn_layer.clone_from(layer);
        }
        if let Some(color) = self.color_weight {
            config.weights.color = color;
        }
        if let Some(gabor) = self.gabor_weight {
            config.weights.gabor = gabor;
        }
        if let Some(cnn) = self.cnn_weight {
            config.weights.cnn = cnn;
        }
        config.parallel = !self.serial;
    }
}

/// Orchestrates batch processing of request files with progress tracking
pub struct FileProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Process files according to CLI arguments, returning the reports written
    ///
    /// # Errors
    ///
    /// Returns an error if target validation or file processing fails
    pub fn process(&mut self) -> Result<Vec<PathBuf>> {
        let files = self.collect_files()?;

        if files.is_empty() {
            return Ok(Vec::new());
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        let mut written = Vec::with_capacity(files.len());
        for (index, file) in files.iter().enumerate() {
            written.push(self.process_file(file, index)?);
        }

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
        }

        Ok(written)
    }

    fn collect_files(&self) -> Result<Vec<PathBuf>> {
        if self.cli.target.is_file() {
            if is_request_file(&self.cli.target) {
                if self.should_process_file(&self.cli.target) {
                    Ok(vec![self.cli.target.clone()])
                } else {
                    Ok(vec![])
                }
            } else {
                Err(invalid_parameter(
                    "target",
                    &self.cli.target.display(),
                    &"target file must be a JSON request",
                ))
            }
        } else if self.cli.target.is_dir() {
            let read_error = |e: std::io::Error| AdjacencyError::FileSystem {
                path: self.cli.target.clone(),
                operation: "list requests",
                source: e,
            };
            let mut files = Vec::new();
            for entry in std::fs::read_dir(&self.cli.target).map_err(read_error)? {
                let path = entry.map_err(read_error)?.path();
                if is_request_file(&path) && self.should_process_file(&path) {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(invalid_parameter(
                "target",
                &self.cli.target.display(),
                &"target must be a JSON request or a directory",
            ))
        }
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        let output_path = output_path(input_path);
        if output_path.exists() {
            tracing::info!(input = %input_path.display(), "skipping, output exists");
            false
        } else {
            true
        }
    }

    fn process_file(&self, input_path: &Path, index: usize) -> Result<PathBuf> {
        let start_time = Instant::now();
        let output_path = output_path(input_path);

        let request = AdjacencyRequest::from_path(input_path)?;
        let mut job = request.into_job()?;
        self.cli.apply_overrides(&mut job.config);
        let engine = AdjacencyEngine::new(job.config.clone())?;

        let anchors = if job.tiles.len() > 1 {
            anchor_count(job.tiles.len())
        } else {
            0
        };
        let bar = self
            .progress_manager
            .as_ref()
            .and_then(|pm| pm.start_file(index, input_path, anchors));

        let outcome = engine.run_with_progress(&job.tiles, || {
            if let Some(ref bar) = bar {
                bar.inc(1);
            }
        });

        let report = AdjacencyReport::from_outcome(
            job.grid_size,
            job.tiles.len(),
            engine.config(),
            outcome,
            self.cli.report_options(),
        );
        report.write_json(&output_path)?;

        if let Some(ref pm) = self.progress_manager {
            pm.complete_file(index, start_time.elapsed());
        }
        tracing::info!(
            input = %input_path.display(),
            output = %output_path.display(),
            "report written"
        );

        Ok(output_path)
    }
}

/// Whether `path` looks like a request rather than a report this tool wrote
pub fn is_request_file(path: &Path) -> bool {
    let is_json = path.extension().and_then(|s| s.to_str()) == Some(REQUEST_EXTENSION);
    let is_report = path
        .file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| stem.ends_with(OUTPUT_SUFFIX));
    is_json && !is_report
}

/// Report path for a request: `<stem>_adjacency.json` next to the input
pub fn output_path(input_path: &Path) -> PathBuf {
    let stem = input_path.file_stem().unwrap_or_default();
    let output_name = format!(
        "{}{}.{}",
        stem.to_string_lossy(),
        OUTPUT_SUFFIX,
        REQUEST_EXTENSION
    );

    if let Some(parent) = input_path.parent() {
        parent.join(output_name)
    } else {
        PathBuf::from(output_name)
    }
}
