// ABOUTME: Registry of deployables accepted during one deployer session.
// ABOUTME: Rejects web modules whose context paths collide with already deployed ones.

use std::collections::HashSet;

use super::deployable::Deployable;
use crate::types::WebContext;

/// Ordered, append-only record of accepted deployables.
///
/// Only used for context-collision checks. Not meant for concurrent use; the
/// owning deployer serializes access through `&mut self`.
#[derive(Debug, Default, Clone)]
pub struct DeployedRegistry {
    deployed: Vec<Deployable>,
}

impl DeployedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `candidate` can be deployed without reusing a registered web context.
    pub fn can_be_deployed(&self, candidate: &Deployable) -> bool {
        let wanted: HashSet<&WebContext> = candidate.web_contexts().into_iter().collect();
        if wanted.is_empty() {
            return true;
        }

        !self
            .deployed
            .iter()
            .flat_map(Deployable::web_contexts)
            .any(|context| wanted.contains(context))
    }

    pub(crate) fn record(&mut self, deployable: Deployable) {
        self.deployed.push(deployable);
    }

    pub fn contains(&self, deployable: &Deployable) -> bool {
        self.deployed.contains(deployable)
    }

    pub fn deployed(&self) -> &[Deployable] {
        &self.deployed
    }

    pub fn len(&self) -> usize {
        self.deployed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deployed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deploy::{DeployableType, Ear, War};

    #[test]
    fn empty_registry_accepts_everything() {
        let registry = DeployedRegistry::new();
        assert!(registry.can_be_deployed(&War::new("/tmp/a.war").into()));
    }

    #[test]
    fn war_context_collides_with_ear_module() {
        let mut registry = DeployedRegistry::new();
        registry.record(Ear::new("/tmp/app.ear").with_web_contexts(["/shop"]).into());

        let war: Deployable = War::new("/tmp/other.war").with_context("shop").into();
        assert!(!registry.can_be_deployed(&war));
    }

    #[test]
    fn non_web_modules_never_collide() {
        let mut registry = DeployedRegistry::new();
        registry.record(War::new("/tmp/beans.war").into());

        let ejb = Deployable::of_type(DeployableType::Ejb, "/tmp/beans.jar", false);
        assert!(registry.can_be_deployed(&ejb));
    }
}
