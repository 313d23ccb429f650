// ABOUTME: Explicit registry of known container kinds and their deployment layout.
// ABOUTME: Owned by the caller and passed where needed; there is no global instance.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::container::ContainerCapability;
use crate::deploy::DeployableType;
use crate::types::ContainerId;

/// Static facts about one container kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerDescriptor {
    id: ContainerId,
    name: String,
    capability: ContainerCapability,
    deployable_subdir: PathBuf,
}

impl ContainerDescriptor {
    pub fn new(
        id: ContainerId,
        name: impl Into<String>,
        capability: ContainerCapability,
        deployable_subdir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            capability,
            deployable_subdir: deployable_subdir.into(),
        }
    }

    pub fn id(&self) -> &ContainerId {
        &self.id
    }

    /// Human-readable name used in log lines.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capability(&self) -> &ContainerCapability {
        &self.capability
    }

    /// Deployable directory relative to the configuration home.
    pub fn deployable_subdir(&self) -> &Path {
        &self.deployable_subdir
    }

    /// Directory the container scans for deployables, under `home`.
    pub fn deployable_dir(&self, home: &Path) -> PathBuf {
        home.join(&self.deployable_subdir)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("container '{0}' is already registered")]
    Duplicate(ContainerId),

    #[error("unknown container '{id}' (known: {known})")]
    Unknown { id: String, known: String },
}

/// Container kinds available to this process.
#[derive(Debug, Clone, Default)]
pub struct ContainerRegistry {
    containers: BTreeMap<ContainerId, ContainerDescriptor>,
}

impl ContainerRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the bundled container kinds.
    pub fn with_builtin() -> Self {
        use DeployableType::*;

        let java_ee = ContainerCapability::new([War, Ear, Ejb, Rar, File]);
        let builtin = [
            ("tomcat", "Apache Tomcat", ContainerCapability::servlet(), "webapps"),
            ("jetty", "Eclipse Jetty", ContainerCapability::servlet(), "webapps"),
            ("jboss", "JBoss", ContainerCapability::all(), "deploy"),
            (
                "glassfish",
                "GlassFish",
                ContainerCapability::new([War, Ear, Ejb, Rar, Bundle, File]),
                "autodeploy",
            ),
            ("resin", "Resin", ContainerCapability::servlet(), "webapps"),
            ("jonas", "JOnAS", java_ee.clone(), "deploy"),
            ("geronimo", "Apache Geronimo", java_ee.clone(), "deploy"),
            ("weblogic", "WebLogic", java_ee, "autodeploy"),
        ];

        let mut registry = Self::new();
        for (id, name, capability, subdir) in builtin {
            // Built-in ids are valid and distinct; a failure here means a typo above.
            if let Ok(id) = ContainerId::new(id) {
                registry
                    .containers
                    .insert(id.clone(), ContainerDescriptor::new(id, name, capability, subdir));
            }
        }
        registry
    }

    /// Add a container kind.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicate`] if the id is already taken.
    pub fn register(&mut self, descriptor: ContainerDescriptor) -> Result<(), RegistryError> {
        if self.containers.contains_key(descriptor.id()) {
            return Err(RegistryError::Duplicate(descriptor.id().clone()));
        }
        self.containers.insert(descriptor.id().clone(), descriptor);
        Ok(())
    }

    /// Look up a container kind by id.
    pub fn get(&self, id: &str) -> Result<&ContainerDescriptor, RegistryError> {
        ContainerId::new(id)
            .ok()
            .and_then(|key| self.containers.get(&key))
            .ok_or_else(|| RegistryError::Unknown {
                id: id.to_string(),
                known: self
                    .containers
                    .keys()
                    .map(ContainerId::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    /// Registered container kinds, ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &ContainerDescriptor> {
        self.containers.values()
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }
}
