// ABOUTME: Deployable artifacts as a closed sum type over the supported module kinds.
// ABOUTME: Each variant carries its path, expanded flag and web contexts where relevant.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::types::WebContext;

/// Kind tag of a deployable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeployableType {
    War,
    Ear,
    Ejb,
    Rar,
    Sar,
    Har,
    Aop,
    Bundle,
    File,
}

impl DeployableType {
    pub const ALL: [DeployableType; 9] = [
        DeployableType::War,
        DeployableType::Ear,
        DeployableType::Ejb,
        DeployableType::Rar,
        DeployableType::Sar,
        DeployableType::Har,
        DeployableType::Aop,
        DeployableType::Bundle,
        DeployableType::File,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeployableType::War => "war",
            DeployableType::Ear => "ear",
            DeployableType::Ejb => "ejb",
            DeployableType::Rar => "rar",
            DeployableType::Sar => "sar",
            DeployableType::Har => "har",
            DeployableType::Aop => "aop",
            DeployableType::Bundle => "bundle",
            DeployableType::File => "file",
        }
    }
}

impl fmt::Display for DeployableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A web archive, deployed under its context path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct War {
    path: PathBuf,
    context: WebContext,
    expanded: bool,
}

impl War {
    /// A packed WAR; the context defaults to the file name without `.war`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let context = WebContext::new(&default_context(&path));
        Self {
            path,
            context,
            expanded: false,
        }
    }

    /// An exploded WAR directory; the context defaults to the directory name.
    pub fn expanded(path: impl Into<PathBuf>) -> Self {
        Self {
            expanded: true,
            ..Self::new(path)
        }
    }

    pub fn with_context(mut self, context: &str) -> Self {
        self.context = WebContext::new(context);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn context(&self) -> &WebContext {
        &self.context
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }
}

fn default_context(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem_len = name.len().saturating_sub(".war".len());
    match (name.get(..stem_len), name.get(stem_len..)) {
        (Some(stem), Some(suffix)) if suffix.eq_ignore_ascii_case(".war") => stem.to_string(),
        _ => name,
    }
}

/// An enterprise archive bundling web and EJB modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ear {
    path: PathBuf,
    name: Option<String>,
    web_contexts: Vec<WebContext>,
    expanded: bool,
}

impl Ear {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            name: None,
            web_contexts: Vec::new(),
            expanded: false,
        }
    }

    /// Declared deployment name, used instead of the file name when present.
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_web_contexts<I, S>(mut self, contexts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.web_contexts = contexts
            .into_iter()
            .map(|c| WebContext::new(c.as_ref()))
            .collect();
        self
    }

    pub(crate) fn set_expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn web_contexts(&self) -> &[WebContext] {
        &self.web_contexts
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }
}

/// Any other module kind: only a path and an expanded flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    path: PathBuf,
    expanded: bool,
}

impl Module {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            expanded: false,
        }
    }

    pub fn expanded(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            expanded: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }
}

/// A unit of application content to install into a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deployable {
    War(War),
    Ear(Ear),
    Ejb(Module),
    Rar(Module),
    Sar(Module),
    Har(Module),
    Aop(Module),
    Bundle(Module),
    File(Module),
}

impl Deployable {
    /// Build a non-web deployable of the given kind.
    ///
    /// WAR and EAR kinds are built with their defaults; use [`War`] and
    /// [`Ear`] directly to set contexts or names.
    pub fn of_type(kind: DeployableType, path: impl Into<PathBuf>, expanded: bool) -> Self {
        let path = path.into();
        let module = if expanded {
            Module::expanded(path)
        } else {
            Module::new(path)
        };
        match kind {
            DeployableType::War if module.expanded => Deployable::War(War::expanded(module.path)),
            DeployableType::War => Deployable::War(War::new(module.path)),
            DeployableType::Ear => Deployable::Ear(Ear::new(module.path).set_expanded(expanded)),
            DeployableType::Ejb => Deployable::Ejb(module),
            DeployableType::Rar => Deployable::Rar(module),
            DeployableType::Sar => Deployable::Sar(module),
            DeployableType::Har => Deployable::Har(module),
            DeployableType::Aop => Deployable::Aop(module),
            DeployableType::Bundle => Deployable::Bundle(module),
            DeployableType::File => Deployable::File(module),
        }
    }

    pub fn kind(&self) -> DeployableType {
        match self {
            Deployable::War(_) => DeployableType::War,
            Deployable::Ear(_) => DeployableType::Ear,
            Deployable::Ejb(_) => DeployableType::Ejb,
            Deployable::Rar(_) => DeployableType::Rar,
            Deployable::Sar(_) => DeployableType::Sar,
            Deployable::Har(_) => DeployableType::Har,
            Deployable::Aop(_) => DeployableType::Aop,
            Deployable::Bundle(_) => DeployableType::Bundle,
            Deployable::File(_) => DeployableType::File,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Deployable::War(war) => war.path(),
            Deployable::Ear(ear) => ear.path(),
            Deployable::Ejb(m)
            | Deployable::Rar(m)
            | Deployable::Sar(m)
            | Deployable::Har(m)
            | Deployable::Aop(m)
            | Deployable::Bundle(m)
            | Deployable::File(m) => m.path(),
        }
    }

    pub fn is_expanded(&self) -> bool {
        match self {
            Deployable::War(war) => war.is_expanded(),
            Deployable::Ear(ear) => ear.is_expanded(),
            Deployable::Ejb(m)
            | Deployable::Rar(m)
            | Deployable::Sar(m)
            | Deployable::Har(m)
            | Deployable::Aop(m)
            | Deployable::Bundle(m)
            | Deployable::File(m) => m.is_expanded(),
        }
    }

    /// Web contexts claimed by this deployable (empty for non-web modules).
    pub fn web_contexts(&self) -> Vec<&WebContext> {
        match self {
            Deployable::War(war) => vec![war.context()],
            Deployable::Ear(ear) => ear.web_contexts().iter().collect(),
            _ => Vec::new(),
        }
    }
}

impl From<War> for Deployable {
    fn from(war: War) -> Self {
        Deployable::War(war)
    }
}

impl From<Ear> for Deployable {
    fn from(ear: Ear) -> Self {
        Deployable::Ear(ear)
    }
}
