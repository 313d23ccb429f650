// ABOUTME: Web application context paths as used by WAR and EAR modules.
// ABOUTME: Normalizes leading slashes so "/app" and "app" name the same context.

use std::fmt;

/// Directory and archive name used for the root context.
pub const ROOT_CONTEXT_NAME: &str = "ROOT";

/// A web context path stored without leading slashes.
///
/// The root context is stored as the empty string and maps to the `ROOT`
/// file name on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WebContext(String);

impl WebContext {
    /// `""`, `/` and `ROOT` all name the root context.
    pub fn new(value: &str) -> Self {
        let path = value.trim().trim_start_matches('/');
        if path == ROOT_CONTEXT_NAME {
            return Self::root();
        }
        Self(path.to_string())
    }

    /// The root context.
    pub fn root() -> Self {
        Self(String::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Context path without leading slash; empty for the root context.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name used for the deployed archive or directory (`ROOT` for the root context).
    pub fn file_name(&self) -> &str {
        if self.is_root() {
            ROOT_CONTEXT_NAME
        } else {
            &self.0
        }
    }
}

impl fmt::Display for WebContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.0)
    }
}
