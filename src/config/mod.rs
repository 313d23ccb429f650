// ABOUTME: Configuration types and parsing for cargolift.yml.
// ABOUTME: Handles YAML parsing, env var interpolation, and building containers from the project file.

mod deployable;
mod env_value;
mod init;

pub use deployable::DeployableEntry;
pub use env_value::{EnvDefault, EnvValue, resolve_env_map};
pub use init::init_config;

use crate::configuration::StandaloneConfiguration;
use crate::container::{CommandSpec, DEFAULT_STOP_GRACE, DEFAULT_TIMEOUT, LocalContainer, ProcessHooks};
use crate::deploy::{Deployable, DeployableType};
use crate::error::{Error, Result};
use crate::registry::ContainerRegistry;
use crate::types::ContainerId;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "cargolift.yml";
pub const CONFIG_FILENAME_ALT: &str = "cargolift.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".cargolift/config.yml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub container: ContainerId,

    /// Configuration home; relative paths resolve against the project directory.
    pub home: PathBuf,

    #[serde(default)]
    pub output: Option<PathBuf>,

    #[serde(default)]
    pub append: bool,

    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    #[serde(default = "default_stop_grace", with = "humantime_serde")]
    pub stop_grace: Duration,

    #[serde(default)]
    pub properties: BTreeMap<String, EnvValue>,

    #[serde(default)]
    pub start: Option<CommandSpec>,

    #[serde(default)]
    pub stop: Option<CommandSpec>,

    #[serde(default)]
    pub deployables: Vec<DeployableEntry>,

    #[serde(default)]
    pub deploy_expanded: BTreeMap<DeployableType, bool>,
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

fn default_stop_grace() -> Duration {
    DEFAULT_STOP_GRACE
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    /// Load a project file, resolving relative paths against its project directory.
    pub fn load(path: &Path, project_dir: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&content)?;
        config.resolve_paths(project_dir);
        Ok(config)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path, dir);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    fn resolve_paths(&mut self, dir: &Path) {
        if self.home.is_relative() {
            self.home = dir.join(&self.home);
        }
        if let Some(output) = self.output.as_mut().filter(|o| o.is_relative()) {
            *output = dir.join(&*output);
        }
        for entry in &mut self.deployables {
            entry.resolve_against(dir);
        }
    }

    pub fn resolved_properties(&self) -> Result<BTreeMap<String, String>> {
        resolve_env_map(&self.properties)
    }

    pub fn deployables(&self) -> Result<Vec<Deployable>> {
        self.deployables
            .iter()
            .map(DeployableEntry::to_deployable)
            .collect()
    }

    /// Standalone configuration holding the resolved properties and deployables.
    pub fn configuration(&self) -> Result<StandaloneConfiguration> {
        let mut configuration = StandaloneConfiguration::new(&self.home);
        for (key, value) in self.resolved_properties()? {
            configuration.set_property(key, value);
        }
        for deployable in self.deployables()? {
            configuration.add_deployable(deployable);
        }
        for (kind, allowed) in &self.deploy_expanded {
            configuration.set_deploy_expanded(*kind, *allowed);
        }
        Ok(configuration)
    }

    /// Build the container described by this project file.
    pub fn container(&self, registry: &ContainerRegistry) -> Result<LocalContainer> {
        let descriptor = registry.get(self.container.as_str())?.clone();
        let start = self
            .start
            .clone()
            .ok_or_else(|| Error::InvalidConfig("no start command configured".to_string()))?;

        let mut hooks = ProcessHooks::new(start);
        if let Some(stop) = &self.stop {
            hooks = hooks.with_stop(stop.clone());
        }

        let mut container = LocalContainer::new(descriptor, self.configuration()?, hooks);
        container.set_timeout(self.timeout);
        container.set_stop_grace(self.stop_grace);
        container.set_append(self.append);
        if let Some(output) = &self.output {
            container.set_output(output);
        }
        Ok(container)
    }
}
