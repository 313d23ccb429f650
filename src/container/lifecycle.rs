// ABOUTME: Local container state machine driving configure, launch, readiness and shutdown.
// ABOUTME: Vendor behavior is injected as hooks; readiness and shutdown checks are swappable.

use snafu::ensure;
use std::ops::Deref;
use std::path::PathBuf;
use std::time::Duration;

use super::error::{
    ConfigurationSnafu, ContainerError, InvalidStateSnafu, LifecycleFailure, log_hint,
};
use super::hooks::{LaunchContext, LifecycleHooks, OutputSettings};
use super::state::State;
use crate::configuration::{self, LocalConfiguration};
use crate::probe::{LivenessProbe, PortWaiter, ShutdownWaiter, UrlMonitor};
use crate::registry::ContainerDescriptor;

/// Time allowed for the container to come up or go down.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Pause after the ports closed, letting the JVM finish exiting.
pub const DEFAULT_STOP_GRACE: Duration = Duration::from_secs(5);

/// Forces append mode on the output settings until dropped.
struct AppendOverride<'a> {
    output: &'a mut OutputSettings,
    prior: bool,
}

impl<'a> AppendOverride<'a> {
    fn force(output: &'a mut OutputSettings) -> Self {
        let prior = output.append;
        output.append = true;
        Self { output, prior }
    }
}

impl Deref for AppendOverride<'_> {
    type Target = OutputSettings;

    fn deref(&self) -> &OutputSettings {
        self.output
    }
}

impl Drop for AppendOverride<'_> {
    fn drop(&mut self) {
        self.output.append = self.prior;
    }
}

/// A container running on this machine.
///
/// The container is owned by the caller; `start` and `stop` take `&mut self`
/// so transitions never interleave.
pub struct LocalContainer {
    descriptor: ContainerDescriptor,
    configuration: Box<dyn LocalConfiguration>,
    hooks: Box<dyn LifecycleHooks>,
    probe: Box<dyn LivenessProbe>,
    shutdown: Box<dyn ShutdownWaiter>,
    state: State,
    timeout: Duration,
    stop_grace: Duration,
    output: OutputSettings,
}

impl LocalContainer {
    pub fn new(
        descriptor: ContainerDescriptor,
        configuration: impl LocalConfiguration + 'static,
        hooks: impl LifecycleHooks + 'static,
    ) -> Self {
        Self {
            descriptor,
            configuration: Box::new(configuration),
            hooks: Box::new(hooks),
            probe: Box::new(UrlMonitor::new().with_expected_content(configuration::CPC_MARKER)),
            shutdown: Box::new(PortWaiter::default()),
            state: State::Unknown,
            timeout: DEFAULT_TIMEOUT,
            stop_grace: DEFAULT_STOP_GRACE,
            output: OutputSettings::default(),
        }
    }

    pub fn with_probe(mut self, probe: impl LivenessProbe + 'static) -> Self {
        self.probe = Box::new(probe);
        self
    }

    pub fn with_shutdown_waiter(mut self, waiter: impl ShutdownWaiter + 'static) -> Self {
        self.shutdown = Box::new(waiter);
        self
    }

    pub fn descriptor(&self) -> &ContainerDescriptor {
        &self.descriptor
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn configuration(&self) -> &dyn LocalConfiguration {
        self.configuration.as_ref()
    }

    pub fn set_configuration(&mut self, configuration: impl LocalConfiguration + 'static) {
        self.configuration = Box::new(configuration);
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Zero disables both the readiness probe and the shutdown wait.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub fn set_stop_grace(&mut self, grace: Duration) {
        self.stop_grace = grace;
    }

    pub fn output(&self) -> &OutputSettings {
        &self.output
    }

    pub fn set_output(&mut self, path: impl Into<PathBuf>) {
        self.output.path = Some(path.into());
    }

    pub fn set_append(&mut self, append: bool) {
        self.output.append = append;
    }

    /// Configure, launch and wait for the container to answer.
    ///
    /// # Errors
    ///
    /// Verification failures and invalid states leave the state untouched.
    /// Any later failure moves the container to [`State::Unknown`].
    pub async fn start(&mut self) -> Result<(), ContainerError> {
        ensure!(
            self.state.can_start(),
            InvalidStateSnafu {
                container: self.descriptor.name(),
                action: "start",
                state: self.state,
            }
        );
        self.verify()?;

        match self.start_sequence().await {
            Ok(()) => {
                self.state = State::Started;
                tracing::info!(
                    "{} started on port [{}]",
                    self.descriptor.name(),
                    configuration::servlet_port(self.configuration.as_ref())
                );
                Ok(())
            }
            Err(source) => {
                self.state = State::Unknown;
                Err(ContainerError::StartFailed {
                    container: self.descriptor.name().to_string(),
                    hint: log_hint(self.output.path.as_deref()),
                    source,
                })
            }
        }
    }

    /// Ask the container to shut down and wait for its ports to close.
    ///
    /// # Errors
    ///
    /// Same state rules as [`start`](Self::start).
    pub async fn stop(&mut self) -> Result<(), ContainerError> {
        ensure!(
            self.state.can_stop(),
            InvalidStateSnafu {
                container: self.descriptor.name(),
                action: "stop",
                state: self.state,
            }
        );
        self.verify()?;

        self.state = State::Stopping;
        tracing::info!("{} is stopping...", self.descriptor.name());

        match self.stop_sequence().await {
            Ok(()) => {
                self.state = State::Stopped;
                tracing::info!("{} is stopped", self.descriptor.name());
                Ok(())
            }
            Err(source) => {
                self.state = State::Unknown;
                Err(ContainerError::StopFailed {
                    container: self.descriptor.name().to_string(),
                    hint: log_hint(self.output.path.as_deref()),
                    source,
                })
            }
        }
    }

    fn verify(&self) -> Result<(), ContainerError> {
        let context = LaunchContext {
            descriptor: &self.descriptor,
            configuration: self.configuration.as_ref(),
            output: &self.output,
        };
        self.hooks.verify(&context).map_err(|reason| {
            ConfigurationSnafu {
                container: self.descriptor.name(),
                reason,
            }
            .build()
        })
    }

    async fn start_sequence(&mut self) -> Result<(), LifecycleFailure> {
        self.configuration.configure(&self.descriptor)?;

        self.state = State::Starting;
        tracing::info!("{} starting...", self.descriptor.name());

        let context = LaunchContext {
            descriptor: &self.descriptor,
            configuration: self.configuration.as_ref(),
            output: &self.output,
        };
        self.hooks.start(&context).await?;

        if !self.timeout.is_zero() {
            let url = configuration::cpc_url(self.configuration.as_ref());
            tracing::debug!("Waiting for [{}] to answer", url);
            self.probe.wait_until_alive(&url, self.timeout).await?;
        }
        Ok(())
    }

    async fn stop_sequence(&mut self) -> Result<(), LifecycleFailure> {
        let Self {
            descriptor,
            configuration: local,
            hooks,
            shutdown,
            output,
            timeout,
            stop_grace,
            ..
        } = self;

        let output = AppendOverride::force(output);
        let context = LaunchContext {
            descriptor: &*descriptor,
            configuration: local.as_ref(),
            output: &output,
        };
        hooks.stop(&context).await?;

        if !timeout.is_zero() {
            let config = local.as_ref();
            let ports = [
                configuration::servlet_port(config),
                configuration::rmi_port(config),
            ];
            shutdown.wait_for_shutdown(&ports, *timeout).await?;
            tokio::time::sleep(*stop_grace).await;
        }
        Ok(())
    }
}
