//! Multi-file progress tracking with automatic batching for large sets

use crate::io::configuration::MAX_INDIVIDUAL_PROGRESS_BARS;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

static PROGRESS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{prefix:>24} [{bar:30.cyan/blue}] {pos}/{len} anchors {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Files: [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

/// Coordinates progress display for batch operations
///
/// Files reuse a fixed pool of bars in rotation; above the pool size a batch
/// bar counting finished files is added on top.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
    file_bars: Vec<ProgressBar>,
    file_count: usize,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            batch_bar: None,
            file_bars: Vec::new(),
            file_count: 0,
        }
    }

    /// Create a manager that draws nothing, for tests and non-terminal output
    pub fn hidden() -> Self {
        Self {
            multi_progress: MultiProgress::with_draw_target(indicatif::ProgressDrawTarget::hidden()),
            ..Self::new()
        }
    }

    /// Initialize progress bars based on file count
    pub fn initialize(&mut self, file_count: usize) {
        self.file_count = file_count;

        if file_count > MAX_INDIVIDUAL_PROGRESS_BARS + 1 {
            let batch_bar = ProgressBar::new(file_count as u64);
            batch_bar.set_style(BATCH_STYLE.clone());
            self.batch_bar = Some(self.multi_progress.add(batch_bar));
        }

        let bars_to_create = file_count.min(MAX_INDIVIDUAL_PROGRESS_BARS);
        for _ in 0..bars_to_create {
            let pb = ProgressBar::new(0);
            pb.set_style(PROGRESS_STYLE.clone());
            self.file_bars.push(self.multi_progress.add(pb));
        }
    }

    /// Number of files this manager was initialized for
    pub const fn file_count(&self) -> usize {
        self.file_count
    }

    /// Whether a batch bar is shown
    pub const fn is_batched(&self) -> bool {
        self.batch_bar.is_some()
    }

    /// Number of per-file bars in the pool
    pub fn bar_count(&self) -> usize {
        self.file_bars.len()
    }

    /// Reset the bar slot of file `index` and return a handle counting its anchors
    ///
    /// The handle can be incremented from any thread.
    pub fn start_file(&self, index: usize, path: &Path, anchors: usize) -> Option<ProgressBar> {
        let bar = self.slot(index)?;
        let display_name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        bar.reset();
        bar.set_length(anchors as u64);
        bar.set_position(0);
        bar.set_prefix(display_name);
        bar.set_message(String::new());
        Some(bar.clone())
    }

    /// Mark file `index` as completed and update batch progress
    pub fn complete_file(&self, index: usize, elapsed: Duration) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.inc(1);
        }

        if let Some(bar) = self.slot(index) {
            if let Some(length) = bar.length() {
                bar.set_position(length);
            }
            bar.set_message(format!("✓ {elapsed:.2?}"));
        }
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.finish_with_message("All files processed");
        }
        let _ = self.multi_progress.clear();
    }

    fn slot(&self, index: usize) -> Option<&ProgressBar> {
        if self.file_bars.is_empty() {
            return None;
        }
        self.file_bars.get(index % self.file_bars.len())
    }
}
