//! Append-only corpus file writer
//!
//! Each accepted document becomes one comma-joined row: the category code
//! followed by its normalized content words. The file has no header and is
//! opened, written, and flushed per row, so a crash mid-run loses at most
//! the row being written.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while writing corpus rows
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to append corpus row to {path}: {source}")]
    Append {
        path: String,
        source: std::io::Error,
    },
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Append-only row sink for labeled token rows
///
/// The trait seam lets tests collect rows in memory instead of on disk.
pub trait RowSink {
    /// Appends one labeled token row to the sink
    fn append_row(&mut self, row: &[String]) -> SinkResult<()>;
}

/// File-backed corpus sink
#[derive(Debug, Clone)]
pub struct CorpusFile {
    path: PathBuf,
}

impl CorpusFile {
    /// Creates a sink that appends to the file at `path`
    ///
    /// The file is created on the first append if it does not exist.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// The path this sink appends to
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RowSink for CorpusFile {
    fn append_row(&mut self, row: &[String]) -> SinkResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| SinkError::Append {
                path: self.path.display().to_string(),
                source,
            })?;

        writeln!(file, "{}", row.join(","))
            .and_then(|_| file.flush())
            .map_err(|source| SinkError::Append {
                path: self.path.display().to_string(),
                source,
            })
    }
}
