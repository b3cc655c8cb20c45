//! Error kinds surfaced by the ETL core.
//!
//! Nothing in the pipeline recovers from these locally: the first error aborts
//! the run. A lookup miss is not an error and never shows up here.

use std::fmt::Display;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EtlError {
    /// Malformed or schema-violating input record.
    #[error("Failed to parse {}{}: {reason}", .path.display(), .line.map(|l| format!(" (line {})", l)).unwrap_or_default())]
    Parse {
        path: PathBuf,
        line: Option<usize>,
        reason: String,
    },

    /// Unreadable path or data root.
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store rejected a write or a lookup.
    #[error("Store rejected {operation}: {reason}")]
    Load {
        operation: &'static str,
        reason: String,
    },

    /// The store could not be opened, or its schema is not the expected one.
    #[error("Could not connect to store {target}: {reason}")]
    Connection { target: String, reason: String },
}

impl EtlError {
    pub fn parse(path: &Path, line: Option<usize>, reason: impl Display) -> Self {
        EtlError::Parse {
            path: path.to_path_buf(),
            line,
            reason: reason.to_string(),
        }
    }

    pub fn io(path: &Path, source: std::io::Error) -> Self {
        EtlError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn load(operation: &'static str, reason: impl Display) -> Self {
        EtlError::Load {
            operation,
            reason: reason.to_string(),
        }
    }

    pub fn connection(target: impl Display, reason: impl Display) -> Self {
        EtlError::Connection {
            target: target.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_mentions_line_when_known() {
        let err = EtlError::parse(Path::new("/data/log.json"), Some(3), "expected value");
        assert_eq!(
            err.to_string(),
            "Failed to parse /data/log.json (line 3): expected value"
        );

        let err = EtlError::parse(Path::new("/data/song.json"), None, "missing field");
        assert_eq!(err.to_string(), "Failed to parse /data/song.json: missing field");
    }

    #[test]
    fn io_error_keeps_source() {
        let err = EtlError::io(
            Path::new("/nope"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.to_string().contains("/nope"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
