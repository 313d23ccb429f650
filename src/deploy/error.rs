// ABOUTME: Error types for deployment operations.
// ABOUTME: Covers context conflicts, unsupported types, copy failures and descriptor reads.

use std::path::PathBuf;

use crate::fs::FsError;
use crate::types::ContainerId;

/// Errors raised by the copying deployer.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// Another accepted deployable already claims one of the web contexts.
    #[error(
        "failed to deploy [{file}] to [{dir}]: the required web context is already in use by another application"
    )]
    ContextConflict { file: PathBuf, dir: PathBuf },

    /// The container cannot host this deployable type.
    #[error("{type_tag} archives are not supported for deployment in [{container}]. Got [{file}]")]
    UnsupportedType {
        type_tag: String,
        container: ContainerId,
        file: PathBuf,
    },

    /// Copying or expanding the deployable failed.
    #[error("failed to deploy [{file}] to [{dir}]")]
    CopyFailed {
        file: PathBuf,
        dir: PathBuf,
        #[source]
        source: FsError,
    },

    /// Removing a deployed artifact failed.
    #[error("failed to undeploy [{file}] from [{dir}]")]
    UndeployFailed {
        file: PathBuf,
        dir: PathBuf,
        #[source]
        source: FsError,
    },
}

impl DeployError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, DeployError::ContextConflict { .. })
    }
}

/// Errors reading a module descriptor such as `application.xml`.
#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open archive {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("malformed descriptor: {0}")]
    Xml(#[from] xmltree::ParseError),
}
