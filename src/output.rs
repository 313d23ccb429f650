// ABOUTME: CLI feedback for container commands in human, quiet or JSON-lines form.
// ABOUTME: Lifecycle commands report state transitions; listings report one record per line.

use serde::Serialize;
use std::time::Instant;

use crate::container::State;
use crate::types::ContainerId;

/// How results reach the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Progress lines plus results
    Normal,
    /// Results only
    Quiet,
    /// One JSON object per line
    Json,
}

impl OutputMode {
    /// `--json` takes precedence over `--quiet`.
    pub fn from_flags(quiet: bool, json: bool) -> Self {
        match (json, quiet) {
            (true, _) => OutputMode::Json,
            (false, true) => OutputMode::Quiet,
            (false, false) => OutputMode::Normal,
        }
    }
}

pub struct Output {
    mode: OutputMode,
    started_at: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            started_at: None,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Measure durations reported by later results from now on.
    pub fn start_timer(&mut self) {
        self.started_at = Some(Instant::now());
    }

    fn duration_secs(&self) -> Option<f64> {
        self.started_at.map(|t| t.elapsed().as_secs_f64())
    }

    /// Shown in normal mode only.
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// One listing record: `line` for humans, `data` in JSON mode.
    pub fn item<T: Serialize>(&self, line: &str, data: &T) {
        if self.mode == OutputMode::Json {
            self.emit(data, false);
        } else {
            println!("{line}");
        }
    }

    /// A container reached `state`.
    pub fn transition(&self, container: &ContainerId, state: State, message: &str) {
        match self.mode {
            OutputMode::Json => self.emit(
                &Event {
                    event: "state",
                    container: Some(container.as_str()),
                    state: Some(state),
                    message,
                    duration_secs: self.duration_secs(),
                },
                false,
            ),
            _ => self.success(message),
        }
    }

    pub fn success(&self, message: &str) {
        match (self.mode, self.duration_secs()) {
            (OutputMode::Json, _) => self.emit(&Event::plain("success", message, self), false),
            (OutputMode::Normal, Some(secs)) => println!("{message} ({secs:.1}s)"),
            _ => println!("{message}"),
        }
    }

    /// Errors always go to stderr.
    pub fn error(&self, message: &str) {
        if self.mode == OutputMode::Json {
            self.emit(&Event::plain("error", message, self), true);
        } else {
            eprintln!("Error: {message}");
        }
    }

    fn emit<T: Serialize>(&self, data: &T, to_stderr: bool) {
        let Ok(json) = serde_json::to_string(data) else {
            return;
        };
        if to_stderr {
            eprintln!("{json}");
        } else {
            println!("{json}");
        }
    }
}

#[derive(Serialize)]
struct Event<'a> {
    event: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    container: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<State>,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

impl<'a> Event<'a> {
    fn plain(event: &'static str, message: &'a str, output: &Output) -> Self {
        Self {
            event,
            container: None,
            state: None,
            message,
            duration_secs: output.duration_secs(),
        }
    }
}
