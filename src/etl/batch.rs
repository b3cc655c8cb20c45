use super::discovery::FileDiscovery;
use super::handler::{FileCategory, FileHandler, FileStats};
use super::progress::ProgressReporter;
use crate::error::Result;
use crate::store::StoreGateway;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Outcome of loading one data directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadSummary {
    pub category: FileCategory,
    pub root: PathBuf,
    pub files_found: usize,
    pub files_loaded: usize,
    pub stats: FileStats,
}

/// Drives every file of a directory through one handler, one transaction
/// per file. The first failing file is rolled back and ends the run; files
/// before it stay committed.
pub struct BatchLoader<'a> {
    store: &'a dyn StoreGateway,
    discovery: FileDiscovery,
}

impl<'a> BatchLoader<'a> {
    pub fn new(store: &'a dyn StoreGateway, discovery: FileDiscovery) -> Self {
        BatchLoader { store, discovery }
    }

    pub fn load_dir(
        &self,
        root: &Path,
        handler: &dyn FileHandler,
        progress: &dyn ProgressReporter,
    ) -> Result<LoadSummary> {
        let category = handler.category();
        let files = self.discovery.discover(root)?;
        let total = files.len();
        progress.files_found(category, root, total);

        let mut summary = LoadSummary {
            category,
            root: root.to_path_buf(),
            files_found: total,
            files_loaded: 0,
            stats: FileStats::default(),
        };

        for (index, path) in files.iter().enumerate() {
            summary.stats += self.load_file(path, handler)?;
            summary.files_loaded += 1;
            progress.file_processed(index + 1, total, path);
        }
        progress.finished(category);

        info!(
            "Loaded {} {} files from {}",
            summary.files_loaded,
            category,
            root.display()
        );
        Ok(summary)
    }

    fn load_file(&self, path: &Path, handler: &dyn FileHandler) -> Result<FileStats> {
        self.store.begin()?;

        let result = handler
            .process(path, self.store)
            .and_then(|stats| self.store.commit().map(|_| stats));

        if let Err(e) = &result {
            error!("Failed to load {}: {}", path.display(), e);
            if let Err(rollback_err) = self.store.rollback() {
                warn!(
                    "Rollback after failed {} left the store in an unknown state: {}",
                    path.display(),
                    rollback_err
                );
            }
        }
        result
    }
}
