// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Creates cargolift.yml template files.

use std::path::Path;

use crate::error::{Error, Result};
use crate::types::ContainerId;

use super::CONFIG_FILENAME;

pub fn init_config(dir: &Path, container: Option<&str>, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let container = ContainerId::new(container.unwrap_or("tomcat"))
        .map_err(|e| Error::InvalidConfig(e.to_string()))?;

    std::fs::write(&config_path, generate_template_yaml(&container))?;
    Ok(())
}

fn generate_template_yaml(container: &ContainerId) -> String {
    format!(
        r#"container: {container}
home: target/{container}
output: target/{container}.log
timeout: 2m

properties:
  cargo.servlet.port: 8080
  cargo.hostname: localhost
  # cargo.rmi.port:
  #   env: RMI_PORT
  #   default: "1099"

start:
  program: /opt/{container}/bin/start.sh
  args: ["${{home}}", "${{cargo.servlet.port}}"]
# stop:
#   program: /opt/{container}/bin/stop.sh

deployables:
  - type: war
    path: target/app.war
    context: /app
"#
    )
}
