use super::handler::FileCategory;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::path::Path;
use std::sync::Mutex;
use tracing::{info, warn};

/// Receives per-file progress from the batch loader.
pub trait ProgressReporter {
    fn files_found(&self, category: FileCategory, root: &Path, total: usize);

    /// `index` is 1-based.
    fn file_processed(&self, index: usize, total: usize, path: &Path);

    fn finished(&self, _category: FileCategory) {}
}

/// One log line per processed file.
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn files_found(&self, category: FileCategory, root: &Path, total: usize) {
        info!("{} {} files found in {}", total, category, root.display());
    }

    fn file_processed(&self, index: usize, total: usize, _path: &Path) {
        info!("{}/{} files processed.", index, total);
    }
}

/// Terminal progress bar, one per directory pass.
pub struct BarProgress {
    bar: Mutex<Option<ProgressBar>>,
    hidden: bool,
}

impl BarProgress {
    pub fn new() -> Self {
        BarProgress {
            bar: Mutex::new(None),
            hidden: false,
        }
    }

    /// Never draws anything; used where there is no terminal.
    pub fn hidden() -> Self {
        BarProgress {
            bar: Mutex::new(None),
            hidden: true,
        }
    }

    fn create_bar(&self, total: usize, msg: String) -> ProgressBar {
        let pb = ProgressBar::new(total as u64);
        if self.hidden {
            pb.set_draw_target(ProgressDrawTarget::hidden());
        } else {
            match ProgressStyle::default_bar()
                .template("{msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec}, ETA: {eta})")
            {
                Ok(style) => pb.set_style(style.progress_chars("=> ")),
                Err(e) => warn!("Invalid progress bar template: {}", e),
            }
        }
        pb.set_message(msg);
        pb
    }

    /// Position of the current bar, if a pass is running.
    pub fn position(&self) -> Option<u64> {
        self.bar
            .lock()
            .ok()
            .and_then(|bar| bar.as_ref().map(ProgressBar::position))
    }
}

impl Default for BarProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for BarProgress {
    fn files_found(&self, category: FileCategory, root: &Path, total: usize) {
        let pb = self.create_bar(total, format!("Loading {} files", category));
        if let Ok(mut bar) = self.bar.lock() {
            *bar = Some(pb);
        }
        info!("{} {} files found in {}", total, category, root.display());
    }

    fn file_processed(&self, index: usize, _total: usize, _path: &Path) {
        if let Ok(bar) = self.bar.lock() {
            if let Some(pb) = bar.as_ref() {
                pb.set_position(index as u64);
            }
        }
    }

    fn finished(&self, category: FileCategory) {
        if let Ok(bar) = self.bar.lock() {
            if let Some(pb) = bar.as_ref() {
                pb.finish_with_message(format!("Loaded {} files", category));
            }
        }
    }
}
