// ABOUTME: Deployable entries as written in the project file.
// ABOUTME: Converted into typed deployables, reading EAR descriptors when present.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::deploy::{Deployable, DeployableType, Ear, War};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeployableEntry {
    #[serde(rename = "type")]
    pub kind: DeployableType,

    pub path: PathBuf,

    /// WAR context path; defaults to the file name.
    #[serde(default)]
    pub context: Option<String>,

    /// EAR deployment name; defaults to the file name.
    #[serde(default)]
    pub name: Option<String>,

    /// Defaults to whether `path` is a directory.
    #[serde(default)]
    pub expanded: Option<bool>,
}

impl DeployableEntry {
    pub(super) fn resolve_against(&mut self, dir: &Path) {
        if self.path.is_relative() {
            self.path = dir.join(&self.path);
        }
    }

    pub fn to_deployable(&self) -> Result<Deployable> {
        let expanded = self.expanded.unwrap_or_else(|| self.path.is_dir());
        let deployable = match self.kind {
            DeployableType::War => {
                let war = if expanded {
                    War::expanded(&self.path)
                } else {
                    War::new(&self.path)
                };
                match &self.context {
                    Some(context) => war.with_context(context).into(),
                    None => war.into(),
                }
            }
            DeployableType::Ear => {
                let ear = if self.path.exists() {
                    Ear::load(&self.path)?
                } else {
                    tracing::warn!(
                        "{} does not exist, its web contexts are unknown",
                        self.path.display()
                    );
                    Ear::new(&self.path)
                };
                match &self.name {
                    Some(name) => ear.with_name(name).into(),
                    None => ear.into(),
                }
            }
            kind => Deployable::of_type(kind, &self.path, expanded),
        };
        Ok(deployable)
    }
}
