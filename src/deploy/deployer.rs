// ABOUTME: Copying deployer that installs deployables into a container's deploy directory.
// ABOUTME: Checks context collisions and capabilities before dispatching on the deployable type.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::deployable::{Deployable, DeployableType, Ear, Module, War};
use super::error::DeployError;
use super::registry::DeployedRegistry;
use crate::container::ContainerCapability;
use crate::fs::{FileHandler, FsError, LocalFileHandler};
use crate::registry::ContainerDescriptor;
use crate::types::ContainerId;

/// What a deploy call does on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyPlan {
    /// Copy a single archive file to `target`.
    File { source: PathBuf, target: PathBuf },
    /// Copy a directory tree to `target`.
    Directory { source: PathBuf, target: PathBuf },
    /// Deployed where it already lives; nothing is copied.
    InPlace,
}

impl CopyPlan {
    /// Path the deployable ends up at, if it is copied at all.
    pub fn target(&self) -> Option<&Path> {
        match self {
            CopyPlan::File { target, .. } | CopyPlan::Directory { target, .. } => Some(target),
            CopyPlan::InPlace => None,
        }
    }
}

/// Deploys by copying artifacts into a directory watched by the container.
///
/// `deploy` takes `&mut self`: one deployer session is single-threaded, and
/// callers sharing a deployer across tasks must wrap it in a lock.
pub struct CopyingDeployer<F = LocalFileHandler> {
    container: ContainerId,
    capability: ContainerCapability,
    deployable_dir: PathBuf,
    files: F,
    not_expanded: HashSet<DeployableType>,
    registry: DeployedRegistry,
}

impl CopyingDeployer<LocalFileHandler> {
    pub fn new(
        container: ContainerId,
        capability: ContainerCapability,
        deployable_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            container,
            capability,
            deployable_dir: deployable_dir.into(),
            files: LocalFileHandler,
            not_expanded: HashSet::new(),
            registry: DeployedRegistry::new(),
        }
    }

    /// Deployer for a registered container whose configuration lives in `home`.
    pub fn for_descriptor(descriptor: &ContainerDescriptor, home: &Path) -> Self {
        Self::new(
            descriptor.id().clone(),
            descriptor.capability().clone(),
            descriptor.deployable_dir(home),
        )
    }
}

impl<F: FileHandler> CopyingDeployer<F> {
    /// Swap the file-system seam.
    pub fn with_file_handler<G: FileHandler>(self, files: G) -> CopyingDeployer<G> {
        CopyingDeployer {
            container: self.container,
            capability: self.capability,
            deployable_dir: self.deployable_dir,
            files,
            not_expanded: self.not_expanded,
            registry: self.registry,
        }
    }

    /// Allow or forbid copying expanded deployables of `kind` (allowed by default).
    ///
    /// Forbidding it supports in-place deployment strategies: expanded WARs are
    /// then left where they are, other kinds fall back to a plain copy.
    pub fn set_should_deploy_expanded(&mut self, kind: DeployableType, allowed: bool) {
        if allowed {
            self.not_expanded.remove(&kind);
        } else {
            self.not_expanded.insert(kind);
        }
    }

    pub fn should_deploy_expanded(&self, kind: DeployableType) -> bool {
        !self.not_expanded.contains(&kind)
    }

    pub fn deployable_dir(&self) -> &Path {
        &self.deployable_dir
    }

    pub fn registry(&self) -> &DeployedRegistry {
        &self.registry
    }

    pub fn file_handler(&self) -> &F {
        &self.files
    }

    /// Deploy `deployable` into the deployable directory.
    ///
    /// # Errors
    ///
    /// Fails before any I/O on a web-context conflict or an unsupported type,
    /// and with [`DeployError::CopyFailed`] if copying fails. The registry
    /// only records the deployable on success.
    pub fn deploy(&mut self, deployable: &Deployable) -> Result<(), DeployError> {
        if !self.registry.can_be_deployed(deployable) {
            return Err(DeployError::ContextConflict {
                file: deployable.path().to_path_buf(),
                dir: self.deployable_dir.clone(),
            });
        }

        tracing::info!(
            "Deploying [{}] to [{}]...",
            deployable.path().display(),
            self.deployable_dir.display()
        );

        self.ensure_supported(deployable)?;
        self.copy(deployable)?;
        self.registry.record(deployable.clone());
        Ok(())
    }

    /// Remove a deployed artifact from the deployable directory.
    ///
    /// The registry is append-only and keeps the entry, so a later
    /// [`redeploy`](Self::redeploy) of the same deployable still succeeds.
    pub fn undeploy(&self, deployable: &Deployable) -> Result<(), DeployError> {
        let plan = self.plan(deployable);
        let Some(target) = plan.target() else {
            tracing::debug!(
                "{} was deployed in place, nothing to remove",
                deployable.path().display()
            );
            return Ok(());
        };

        tracing::info!("Undeploying [{}]...", target.display());
        self.files
            .delete(target)
            .map_err(|source| DeployError::UndeployFailed {
                file: deployable.path().to_path_buf(),
                dir: self.deployable_dir.clone(),
                source,
            })
    }

    /// Undeploy then copy again. A deployable that was never deployed is
    /// simply deployed.
    pub fn redeploy(&mut self, deployable: &Deployable) -> Result<(), DeployError> {
        if !self.registry.contains(deployable) {
            return self.deploy(deployable);
        }
        self.undeploy(deployable)?;
        self.copy(deployable)
    }

    /// Resolve where `deployable` would be copied.
    pub fn plan(&self, deployable: &Deployable) -> CopyPlan {
        let dir = &self.deployable_dir;
        match deployable {
            Deployable::War(war) => self.plan_war(war),
            Deployable::Ear(ear) => CopyPlan::File {
                source: ear.path().to_path_buf(),
                target: self.files.append(dir, &self.ear_name(ear)),
            },
            Deployable::Ejb(module) | Deployable::Bundle(module) => self.plan_file(module),
            Deployable::File(module) => {
                if self.files.is_directory(module.path()) {
                    self.plan_directory(module)
                } else {
                    self.plan_file(module)
                }
            }
            Deployable::Sar(module)
            | Deployable::Rar(module)
            | Deployable::Har(module)
            | Deployable::Aop(module) => {
                if module.is_expanded() && self.should_deploy_expanded(deployable.kind()) {
                    self.plan_directory(module)
                } else {
                    self.plan_file(module)
                }
            }
        }
    }

    fn ensure_supported(&self, deployable: &Deployable) -> Result<(), DeployError> {
        if self.capability.supports(deployable.kind()) {
            return Ok(());
        }
        Err(DeployError::UnsupportedType {
            type_tag: deployable.kind().as_str().to_uppercase(),
            container: self.container.clone(),
            file: deployable.path().to_path_buf(),
        })
    }

    fn copy(&self, deployable: &Deployable) -> Result<(), DeployError> {
        let result = match self.plan(deployable) {
            CopyPlan::File { source, target } => self.files.copy_file(&source, &target, true),
            CopyPlan::Directory { source, target } => {
                self.files.copy_directory(&source, &target)
            }
            CopyPlan::InPlace => {
                tracing::info!(
                    "Expanded {} deployment disabled, using [{}] in place",
                    deployable.kind().as_str().to_uppercase(),
                    deployable.path().display()
                );
                Ok(())
            }
        };
        result.map_err(|source: FsError| DeployError::CopyFailed {
            file: deployable.path().to_path_buf(),
            dir: self.deployable_dir.clone(),
            source,
        })
    }

    fn plan_war(&self, war: &War) -> CopyPlan {
        let context = war.context();
        if context.is_root() {
            tracing::info!(
                "The WAR has its context set to / and will therefore be deployed as ROOT"
            );
        }

        if !war.is_expanded() {
            return CopyPlan::File {
                source: war.path().to_path_buf(),
                target: self
                    .files
                    .append(&self.deployable_dir, &format!("{}.war", context.file_name())),
            };
        }

        if !self.should_deploy_expanded(DeployableType::War) {
            return CopyPlan::InPlace;
        }

        CopyPlan::Directory {
            source: war.path().to_path_buf(),
            target: self.files.append(&self.deployable_dir, context.file_name()),
        }
    }

    fn plan_file(&self, module: &Module) -> CopyPlan {
        CopyPlan::File {
            source: module.path().to_path_buf(),
            target: self
                .files
                .append(&self.deployable_dir, &self.files.name(module.path())),
        }
    }

    fn plan_directory(&self, module: &Module) -> CopyPlan {
        CopyPlan::Directory {
            source: module.path().to_path_buf(),
            target: self
                .files
                .append(&self.deployable_dir, &self.files.name(module.path())),
        }
    }

    /// Declared name or file name, with `.ear` appended unless already present.
    fn ear_name(&self, ear: &Ear) -> String {
        let name = ear
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| self.files.name(ear.path()));
        if name.to_lowercase().contains(".ear") {
            name
        } else {
            format!("{name}.ear")
        }
    }
}
