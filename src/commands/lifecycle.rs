// ABOUTME: Start, stop and run commands driving a local container from the project file.

use cargolift::container::LocalContainer;
use cargolift::error::Result;
use cargolift::output::Output;
use cargolift::registry::ContainerRegistry;

use super::load_project;

fn build_container() -> Result<LocalContainer> {
    let config = load_project()?;
    config.container(&ContainerRegistry::with_builtin())
}

fn report(output: &Output, container: &LocalContainer, verb: &str) {
    let descriptor = container.descriptor();
    output.transition(
        descriptor.id(),
        container.state(),
        &format!("{} {verb}", descriptor.name()),
    );
}

pub async fn start(mut output: Output) -> Result<()> {
    let mut container = build_container()?;
    output.start_timer();
    output.progress(&format!("Starting {}...", container.descriptor().name()));
    container.start().await?;
    report(&output, &container, "started");
    Ok(())
}

pub async fn stop(mut output: Output) -> Result<()> {
    let mut container = build_container()?;
    output.start_timer();
    output.progress(&format!("Stopping {}...", container.descriptor().name()));
    container.stop().await?;
    report(&output, &container, "stopped");
    Ok(())
}

/// Start, block until Ctrl-C, then stop.
pub async fn run(mut output: Output) -> Result<()> {
    let mut container = build_container()?;
    output.start_timer();
    container.start().await?;
    report(&output, &container, "started, press Ctrl-C to stop");

    tokio::signal::ctrl_c().await?;

    output.progress(&format!("Stopping {}...", container.descriptor().name()));
    container.stop().await?;
    report(&output, &container, "stopped");
    Ok(())
}
