// ABOUTME: Deploy command: installs the configured deployables into the container home.
// ABOUTME: Runs without starting the container, for hot-deploy directories or pre-staging.

use cargolift::deploy::CopyingDeployer;
use cargolift::error::Result;
use cargolift::fs::{FileHandler, LocalFileHandler};
use cargolift::output::Output;
use cargolift::registry::ContainerRegistry;
use serde::Serialize;

use super::load_project;

#[derive(Serialize)]
struct Deployed<'a> {
    event: &'static str,
    kind: &'a str,
    path: String,
    target: Option<String>,
}

pub fn deploy(redeploy: bool, mut output: Output) -> Result<()> {
    let config = load_project()?;
    let registry = ContainerRegistry::with_builtin();
    let descriptor = registry.get(config.container.as_str())?;

    let mut deployer = CopyingDeployer::for_descriptor(descriptor, &config.home);
    LocalFileHandler.mkdirs(deployer.deployable_dir())?;
    for (kind, allowed) in &config.deploy_expanded {
        deployer.set_should_deploy_expanded(*kind, *allowed);
    }

    output.start_timer();
    let deployables = config.deployables()?;
    for deployable in &deployables {
        if redeploy {
            deployer.undeploy(deployable)?;
        }
        deployer.deploy(deployable)?;

        let target = deployer.plan(deployable).target().map(|t| t.display().to_string());
        output.item(
            &format!(
                "  {} {} -> {}",
                deployable.kind(),
                deployable.path().display(),
                target.as_deref().unwrap_or("(in place)")
            ),
            &Deployed {
                event: "deployed",
                kind: deployable.kind().as_str(),
                path: deployable.path().display().to_string(),
                target,
            },
        );
    }

    output.success(&format!(
        "Deployed {} module(s) to {}",
        deployables.len(),
        deployer.deployable_dir().display()
    ));
    Ok(())
}
