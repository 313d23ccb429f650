// ABOUTME: Lists the container kinds known to the built-in registry.

use cargolift::output::Output;
use cargolift::registry::ContainerRegistry;
use serde::Serialize;

#[derive(Serialize)]
struct ContainerInfo<'a> {
    id: &'a str,
    name: &'a str,
    deploy_dir: String,
    types: Vec<&'static str>,
}

pub fn containers(output: Output) {
    let registry = ContainerRegistry::with_builtin();
    for descriptor in registry.iter() {
        let types: Vec<&'static str> = descriptor.capability().types().map(|t| t.as_str()).collect();
        let deploy_dir = descriptor.deployable_subdir().display().to_string();
        output.item(
            &format!(
                "{:<10} {:<16} {:<11} {}",
                descriptor.id().as_str(),
                descriptor.name(),
                deploy_dir,
                types.join(",")
            ),
            &ContainerInfo {
                id: descriptor.id().as_str(),
                name: descriptor.name(),
                deploy_dir: deploy_dir.clone(),
                types,
            },
        );
    }
}
