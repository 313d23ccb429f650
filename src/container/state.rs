// ABOUTME: Lifecycle states of a local container.
// ABOUTME: Unknown is both the initial state and the state after any failed transition.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum State {
    #[default]
    Unknown,
    Starting,
    Started,
    Stopping,
    Stopped,
}

impl State {
    /// States from which `start()` may be requested.
    pub fn can_start(&self) -> bool {
        matches!(self, State::Unknown | State::Stopped)
    }

    /// States from which `stop()` may be requested.
    pub fn can_stop(&self) -> bool {
        matches!(self, State::Started | State::Unknown)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            State::Unknown => "unknown",
            State::Starting => "starting",
            State::Started => "started",
            State::Stopping => "stopping",
            State::Stopped => "stopped",
        };
        f.write_str(name)
    }
}
