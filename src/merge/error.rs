// ABOUTME: Error types for WAR merging and packaging.

use std::path::PathBuf;

use crate::fs::FsError;

#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read archive {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("failed to write archive: {0}")]
    Package(#[from] zip::result::ZipError),

    #[error("malformed web.xml: {0}")]
    Xml(#[from] xmltree::ParseError),

    #[error("failed to serialize web.xml: {0}")]
    XmlWrite(#[from] xmltree::Error),

    #[error(transparent)]
    Fs(#[from] FsError),

    /// The first source archive must carry `WEB-INF/web.xml`; it is the merge base.
    #[error("{0} has no WEB-INF/web.xml to merge into")]
    MissingDescriptor(PathBuf),

    #[error("merge processor for {path} failed: {reason}")]
    Processor { path: String, reason: String },
}

pub type Result<T> = std::result::Result<T, MergeError>;
