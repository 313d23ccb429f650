// ABOUTME: Set of deployable types a container can host.
// ABOUTME: Checked by the deployer before any file is copied.

use std::collections::BTreeSet;

use crate::deploy::DeployableType;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContainerCapability {
    supported: BTreeSet<DeployableType>,
}

impl ContainerCapability {
    pub fn new<I: IntoIterator<Item = DeployableType>>(types: I) -> Self {
        Self {
            supported: types.into_iter().collect(),
        }
    }

    /// Every deployable type.
    pub fn all() -> Self {
        Self::new(DeployableType::ALL)
    }

    /// Servlet containers: WAR plus plain files.
    pub fn servlet() -> Self {
        Self::new([DeployableType::War, DeployableType::File])
    }

    pub fn supports(&self, kind: DeployableType) -> bool {
        self.supported.contains(&kind)
    }

    pub fn types(&self) -> impl Iterator<Item = DeployableType> + '_ {
        self.supported.iter().copied()
    }
}
