// ABOUTME: Read access to a packed WAR: descriptor, resources, classes and expansion.
// ABOUTME: The archive is reopened per query so a WarArchive stays cheap to hold.

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use zip::ZipArchive;
use zip::result::ZipError;

use super::error::{MergeError, Result};
use super::web_xml::WebXml;
use crate::fs::FileHandler;

pub const WEB_XML: &str = "WEB-INF/web.xml";
pub const WEB_INF_CLASSES: &str = "WEB-INF/classes/";
pub const WEB_INF_LIB: &str = "WEB-INF/lib/";

/// A packed web archive on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarArchive {
    path: PathBuf,
}

impl WarArchive {
    /// Open `path`, failing early if it is not a readable zip archive.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let war = Self { path: path.into() };
        war.zip()?;
        Ok(war)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn zip(&self) -> Result<ZipArchive<File>> {
        let file = File::open(&self.path).map_err(|source| MergeError::Io {
            path: self.path.clone(),
            source,
        })?;
        ZipArchive::new(file).map_err(|source| self.archive_error(source))
    }

    fn archive_error(&self, source: ZipError) -> MergeError {
        MergeError::Archive {
            path: self.path.clone(),
            source,
        }
    }

    /// Entry names in archive order.
    pub fn entry_names(&self) -> Result<Vec<String>> {
        Ok(self.zip()?.file_names().map(str::to_string).collect())
    }

    /// Contents of the entry at `path`, or `None` if the archive has none.
    pub fn resource(&self, path: &str) -> Result<Option<Vec<u8>>> {
        let mut zip = self.zip()?;
        let mut entry = match zip.by_name(path.trim_start_matches('/')) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(self.archive_error(e)),
        };
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry
            .read_to_end(&mut bytes)
            .map_err(|source| MergeError::Io {
                path: self.path.join(path),
                source,
            })?;
        Ok(Some(bytes))
    }

    /// The parsed `WEB-INF/web.xml`, if present.
    pub fn web_xml(&self) -> Result<Option<WebXml>> {
        self.resource(WEB_XML)?
            .map(|bytes| WebXml::parse(&bytes))
            .transpose()
    }

    /// Full entry path of the first file named `name` (or ending in `/name`).
    pub fn find_resource(&self, name: &str) -> Result<Option<String>> {
        let name = name.trim_start_matches('/');
        let suffix = format!("/{name}");
        Ok(self
            .entry_names()?
            .into_iter()
            .find(|entry| !entry.ends_with('/') && (entry == name || entry.ends_with(&suffix))))
    }

    /// File entries below the directory `dir`, in archive order.
    pub fn resources(&self, dir: &str) -> Result<Vec<String>> {
        let dir = dir.trim_matches('/');
        let prefix = if dir.is_empty() {
            String::new()
        } else {
            format!("{dir}/")
        };
        Ok(self
            .entry_names()?
            .into_iter()
            .filter(|entry| entry.starts_with(&prefix) && !entry.ends_with('/'))
            .collect())
    }

    /// Whether the class is packed in `WEB-INF/classes` or any `WEB-INF/lib` JAR.
    pub fn contains_class(&self, class_name: &str) -> Result<bool> {
        let class_entry = format!("{}.class", class_name.replace('.', "/"));
        let names = self.entry_names()?;

        let direct = format!("{WEB_INF_CLASSES}{class_entry}");
        if names.iter().any(|n| *n == direct) {
            return Ok(true);
        }

        for jar in names
            .iter()
            .filter(|n| n.starts_with(WEB_INF_LIB) && n.to_lowercase().ends_with(".jar"))
        {
            let Some(bytes) = self.resource(jar)? else {
                continue;
            };
            let mut inner = ZipArchive::new(Cursor::new(bytes)).map_err(|source| {
                MergeError::Archive {
                    path: self.path.join(jar),
                    source,
                }
            })?;
            if inner.by_name(&class_entry).is_ok() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Extract every entry into `dir`, overwriting existing files.
    pub fn expand_to<F: FileHandler>(&self, dir: &Path, files: &F) -> Result<()> {
        let mut zip = self.zip()?;
        for index in 0..zip.len() {
            let mut entry = zip
                .by_index(index)
                .map_err(|source| self.archive_error(source))?;
            let Some(relative) = entry.enclosed_name() else {
                tracing::warn!(
                    "Skipping unsafe entry [{}] in {}",
                    entry.name(),
                    self.path.display()
                );
                continue;
            };
            let target = dir.join(relative);

            if entry.is_dir() {
                files.mkdirs(&target)?;
                continue;
            }
            let mut bytes = Vec::with_capacity(entry.size() as usize);
            entry
                .read_to_end(&mut bytes)
                .map_err(|source| MergeError::Io {
                    path: self.path.join(entry.name()),
                    source,
                })?;
            files.write(&target, &bytes)?;
        }
        Ok(())
    }
}
