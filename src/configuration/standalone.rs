// ABOUTME: Standalone configuration that builds a fresh container home from scratch.
// ABOUTME: Creates the directories, installs the ping component and auto-deploys modules.

use std::collections::{BTreeMap, HashMap};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use super::{
    ConfigurationError, DEFAULT_HOSTNAME, DEFAULT_RMI_PORT, DEFAULT_SERVLET_PORT, HOSTNAME,
    LocalConfiguration, RMI_PORT, SERVLET_PORT,
};
use crate::deploy::{CopyingDeployer, Deployable, DeployableType, War};
use crate::fs::{FileHandler, LocalFileHandler};
use crate::registry::ContainerDescriptor;

/// Web context of the ping component.
pub const CPC_CONTEXT: &str = "cargocpc";

/// Text served by the ping component; its presence proves the container answered.
pub const CPC_MARKER: &str = "Cargo Ping Component used to verify if the container is started.";

/// A configuration whose home directory is owned and rebuilt by this process.
pub struct StandaloneConfiguration<F = LocalFileHandler> {
    home: PathBuf,
    properties: BTreeMap<String, String>,
    deployables: Vec<Deployable>,
    deploy_expanded: HashMap<DeployableType, bool>,
    files: F,
}

impl StandaloneConfiguration<LocalFileHandler> {
    /// A configuration rooted at `home` with default ports and hostname.
    pub fn new(home: impl Into<PathBuf>) -> Self {
        let properties = [
            (SERVLET_PORT, DEFAULT_SERVLET_PORT),
            (RMI_PORT, DEFAULT_RMI_PORT),
            (HOSTNAME, DEFAULT_HOSTNAME),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            home: home.into(),
            properties,
            deployables: Vec::new(),
            deploy_expanded: HashMap::new(),
            files: LocalFileHandler,
        }
    }
}

impl<F> StandaloneConfiguration<F> {
    pub fn with_file_handler<G>(self, files: G) -> StandaloneConfiguration<G> {
        StandaloneConfiguration {
            home: self.home,
            properties: self.properties,
            deployables: self.deployables,
            deploy_expanded: self.deploy_expanded,
            files,
        }
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    /// Queue a deployable for installation by `configure`.
    pub fn add_deployable(&mut self, deployable: impl Into<Deployable>) {
        self.deployables.push(deployable.into());
    }

    /// Forward the deployer's expanded-deployment flag for `kind`.
    pub fn set_deploy_expanded(&mut self, kind: DeployableType, allowed: bool) {
        self.deploy_expanded.insert(kind, allowed);
    }
}

impl<F: FileHandler + Clone> StandaloneConfiguration<F> {
    fn install_ping_component(&self) -> Result<Deployable, ConfigurationError> {
        let archive = self
            .files
            .append(&self.home, &format!("{CPC_CONTEXT}.war"));
        self.files.write(&archive, &ping_component_war()?)?;
        Ok(War::new(archive).into())
    }
}

impl<F: FileHandler + Clone> LocalConfiguration for StandaloneConfiguration<F> {
    fn home(&self) -> &Path {
        &self.home
    }

    fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    fn deployables(&self) -> &[Deployable] {
        &self.deployables
    }

    fn configure(&self, container: &ContainerDescriptor) -> Result<(), ConfigurationError> {
        if self.home.as_os_str().is_empty() {
            return Err(ConfigurationError::InvalidHome(self.home.clone()));
        }
        tracing::info!(
            "Configuring {} in [{}]",
            container.name(),
            self.home.display()
        );

        self.files.mkdirs(&self.home)?;
        let mut deployer = CopyingDeployer::for_descriptor(container, &self.home)
            .with_file_handler(self.files.clone());
        self.files.mkdirs(deployer.deployable_dir())?;

        for (kind, allowed) in &self.deploy_expanded {
            deployer.set_should_deploy_expanded(*kind, *allowed);
        }

        let ping = self.install_ping_component()?;
        deployer.deploy(&ping)?;
        for deployable in &self.deployables {
            deployer.deploy(deployable)?;
        }
        Ok(())
    }
}

/// A minimal WAR serving one static `index.html`.
fn ping_component_war() -> Result<Vec<u8>, ConfigurationError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    zip.add_directory("META-INF/", options)?;
    zip.start_file("META-INF/MANIFEST.MF", options)?;
    zip.write_all(b"Manifest-Version: 1.0\r\n\r\n")?;
    zip.start_file("index.html", options)?;
    zip.write_all(format!("<html><body>{CPC_MARKER}</body></html>\n").as_bytes())?;
    Ok(zip.finish()?.into_inner())
}
