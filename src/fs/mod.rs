// ABOUTME: File-system seam used by the deployer, configuration and merge engine.
// ABOUTME: Core code never calls std::fs directly so tests can substitute doubles.

mod local;

pub use local::LocalFileHandler;

use std::path::{Path, PathBuf};

/// Errors from file-system operations.
#[derive(Debug, thiserror::Error)]
pub enum FsError {
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    #[error("{operation} failed for {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FsError {
    pub(crate) fn io(operation: &'static str, path: &Path, source: std::io::Error) -> Self {
        FsError::Io {
            operation,
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, FsError>;

/// File operations needed by the deployment and merge pipelines.
pub trait FileHandler: Send + Sync {
    /// Copy a single file, creating parent directories as needed.
    fn copy_file(&self, source: &Path, target: &Path, overwrite: bool) -> Result<()>;

    /// Recursively copy a directory tree into `target`.
    fn copy_directory(&self, source: &Path, target: &Path) -> Result<()>;

    /// Create a directory and all missing parents.
    fn mkdirs(&self, path: &Path) -> Result<()>;

    /// Delete a file or a directory tree. Missing paths are not an error.
    fn delete(&self, path: &Path) -> Result<()>;

    /// Read a whole file.
    fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Write `contents` to `path`, replacing any existing file.
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;

    /// Direct children of a directory, sorted by name.
    fn children(&self, dir: &Path) -> Result<Vec<PathBuf>>;

    fn exists(&self, path: &Path) -> bool;

    fn is_directory(&self, path: &Path) -> bool;

    /// Last path component as a string (empty when the path has none).
    fn name(&self, path: &Path) -> String {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    fn append(&self, dir: &Path, name: &str) -> PathBuf {
        dir.join(name)
    }

    fn parent(&self, path: &Path) -> Option<PathBuf> {
        path.parent().map(Path::to_path_buf)
    }
}
