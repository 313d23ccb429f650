// ABOUTME: Lifecycle hooks that run external start/stop commands for a container.
// ABOUTME: Expands ${property} placeholders and redirects output to the container log file.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;

use super::hooks::{HookError, LaunchContext, LifecycleHooks, OutputSettings};
use crate::configuration::LocalConfiguration;

/// An external command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }
}

/// Replace `${key}` with the configuration property `key`, and `${home}`
/// with the configuration home. Unknown placeholders are left as written.
pub fn expand_placeholders(template: &str, config: &dyn LocalConfiguration) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };

        let key = &after[..end];
        let value = if key == "home" {
            Some(config.home().display().to_string())
        } else {
            config.property(key).map(str::to_string)
        };
        match value {
            Some(v) => out.push_str(&v),
            None => out.push_str(&rest[start..start + end + 3]),
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

/// Starts the container with one command and stops it with another.
///
/// Without a stop command, `stop` kills the process spawned by `start`.
pub struct ProcessHooks {
    start: CommandSpec,
    stop: Option<CommandSpec>,
    child: Mutex<Option<Child>>,
}

impl ProcessHooks {
    pub fn new(start: CommandSpec) -> Self {
        Self {
            start,
            stop: None,
            child: Mutex::new(None),
        }
    }

    pub fn with_stop(mut self, stop: CommandSpec) -> Self {
        self.stop = Some(stop);
        self
    }

    fn command(spec: &CommandSpec, context: &LaunchContext<'_>) -> Result<Command, HookError> {
        let config = context.configuration;
        let mut command = Command::new(expand_placeholders(&spec.program, config));
        command.args(spec.args.iter().map(|a| expand_placeholders(a, config)));
        for (key, value) in &spec.env {
            command.env(key, expand_placeholders(value, config));
        }
        command.current_dir(
            spec.working_dir
                .clone()
                .unwrap_or_else(|| config.home().to_path_buf()),
        );
        command.stdin(Stdio::null());
        redirect_output(&mut command, context.output)?;
        Ok(command)
    }
}

fn redirect_output(command: &mut Command, output: &OutputSettings) -> Result<(), HookError> {
    let Some(path) = &output.path else {
        command.stdout(Stdio::null()).stderr(Stdio::null());
        return Ok(());
    };

    let output_error = |source| HookError::Output {
        path: path.clone(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(output_error)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(output.append)
        .truncate(!output.append)
        .open(path)
        .map_err(output_error)?;
    let stderr = file.try_clone().map_err(output_error)?;
    command.stdout(file).stderr(stderr);
    Ok(())
}

#[async_trait]
impl LifecycleHooks for ProcessHooks {
    async fn start(&self, context: &LaunchContext<'_>) -> Result<(), HookError> {
        let mut command = Self::command(&self.start, context)?;
        let child = command.spawn().map_err(|source| HookError::Spawn {
            program: self.start.program.clone(),
            source,
        })?;
        tracing::debug!(
            "Launched {} (pid {:?})",
            self.start.program,
            child.id()
        );
        *self.child.lock().await = Some(child);
        Ok(())
    }

    async fn stop(&self, context: &LaunchContext<'_>) -> Result<(), HookError> {
        let Some(spec) = &self.stop else {
            let mut guard = self.child.lock().await;
            return match guard.take() {
                Some(mut child) => child.kill().await.map_err(HookError::Kill),
                None => Err(HookError::NoStopCommand),
            };
        };

        let status = Self::command(spec, context)?
            .status()
            .await
            .map_err(|source| HookError::Spawn {
                program: spec.program.clone(),
                source,
            })?;
        if !status.success() {
            return Err(HookError::Exit {
                program: spec.program.clone(),
                status,
            });
        }

        // Dropping the handle leaves reaping of the launcher to tokio.
        self.child.lock().await.take();
        Ok(())
    }
}
