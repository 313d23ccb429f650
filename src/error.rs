// ABOUTME: Application-wide error types for cargolift.
// ABOUTME: Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

use crate::container::ContainerError;
use crate::deploy::{DeployError, DescriptorError};
use crate::fs::FsError;
use crate::merge::MergeError;
use crate::registry::RegistryError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Container(#[from] ContainerError),

    #[error(transparent)]
    Deploy(#[from] DeployError),

    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Fs(#[from] FsError),
}

pub type Result<T> = std::result::Result<T, Error>;
