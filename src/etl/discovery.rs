use crate::error::{EtlError, Result};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

pub const DEFAULT_EXTENSION: &str = "json";

/// Recursively collects data files under a root directory.
#[derive(Clone, Debug)]
pub struct FileDiscovery {
    /// Lowercase, without the leading dot.
    extension: String,
}

impl Default for FileDiscovery {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSION)
    }
}

impl FileDiscovery {
    pub fn new(extension: &str) -> Self {
        FileDiscovery {
            extension: extension.trim_start_matches('.').to_lowercase(),
        }
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    fn matches(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase() == self.extension)
            .unwrap_or(false)
    }

    /// Absolute paths of every matching file under `root`, in lexicographic
    /// order. Symlinked files are included under their link path, symlinked
    /// directories are not descended into.
    pub fn discover(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let metadata = std::fs::metadata(root).map_err(|e| EtlError::io(root, e))?;
        if !metadata.is_dir() {
            return Err(EtlError::io(
                root,
                io::Error::other("data root is not a directory"),
            ));
        }
        let root = root.canonicalize().map_err(|e| EtlError::io(root, e))?;

        let mut files = Vec::new();
        for entry in WalkDir::new(&root).follow_links(false) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(&root).to_path_buf();
                EtlError::io(&path, io::Error::from(e))
            })?;
            if !self.matches(entry.path()) {
                continue;
            }
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            } else if entry.path_is_symlink() {
                // is_file() follows the link.
                if entry.path().is_file() {
                    files.push(entry.into_path());
                } else {
                    warn!(
                        "Skipping {}: link target is not a file",
                        entry.path().display()
                    );
                }
            }
        }
        files.sort();

        debug!(
            "Discovered {} .{} files under {}",
            files.len(),
            self.extension,
            root.display()
        );
        Ok(files)
    }
}
