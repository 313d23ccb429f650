// ABOUTME: Command module aggregator for the cargolift CLI.
// ABOUTME: Re-exports the lifecycle, deploy, merge and listing command handlers.

mod containers;
mod deploy;
mod lifecycle;
mod merge;

pub use containers::containers;
pub use deploy::deploy;
pub use lifecycle::{run, start, stop};
pub use merge::{MergeArgs, merge};

use cargolift::config::{self, Config};
use cargolift::error::Result;
use cargolift::output::Output;
use std::env;

/// Write a template cargolift.yml into the current directory.
pub fn init(container: Option<&str>, force: bool, output: Output) -> Result<()> {
    let cwd = env::current_dir()?;
    config::init_config(&cwd, container, force)?;
    output.success(&format!("Created {}", config::CONFIG_FILENAME));
    Ok(())
}

fn load_project() -> Result<Config> {
    let cwd = env::current_dir()?;
    Config::discover(&cwd)
}
