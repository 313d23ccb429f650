// ABOUTME: Merges several WARs and extra JARs into one synthesized web application.
// ABOUTME: Descriptors merge in source order; files expand last-write-wins; store() packages the result.

use nonempty::NonEmpty;
use std::path::{Path, PathBuf};

use super::archive::{WEB_INF_LIB, WEB_XML, WarArchive};
use super::error::{MergeError, Result};
use super::package::package_directory;
use super::processor::{ArchiveResourceMerger, MergeProcessor};
use super::web_xml::WebXml;
use crate::fs::{FileHandler, LocalFileHandler};

/// A web application assembled from several source WARs.
///
/// Nothing is written until [`merge_into`](Self::merge_into) or
/// [`store`](Self::store) is called.
pub struct MergedWarArchive<F = LocalFileHandler> {
    wars: NonEmpty<WarArchive>,
    jars: Vec<PathBuf>,
    merge_jar_files: bool,
    processors: Vec<ArchiveResourceMerger>,
    merged: Option<WebXml>,
    scratch_root: Option<PathBuf>,
    files: F,
}

impl MergedWarArchive<LocalFileHandler> {
    /// Start a merge whose descriptor base is `first`.
    pub fn new(first: WarArchive) -> Self {
        Self {
            wars: NonEmpty::new(first),
            jars: Vec::new(),
            merge_jar_files: true,
            processors: Vec::new(),
            merged: None,
            scratch_root: None,
            files: LocalFileHandler,
        }
    }
}

impl<F: FileHandler> MergedWarArchive<F> {
    pub fn with_file_handler<G: FileHandler>(self, files: G) -> MergedWarArchive<G> {
        MergedWarArchive {
            wars: self.wars,
            jars: self.jars,
            merge_jar_files: self.merge_jar_files,
            processors: self.processors,
            merged: self.merged,
            scratch_root: self.scratch_root,
            files,
        }
    }

    /// Append a source WAR. Later sources overwrite earlier files on expansion.
    pub fn add(&mut self, war: WarArchive) {
        self.wars.push(war);
        self.merged = None;
    }

    /// Add a standalone JAR to `WEB-INF/lib`.
    pub fn add_jar(&mut self, jar: impl Into<PathBuf>) {
        self.jars.push(jar.into());
    }

    /// Keep (default) or drop the JARs the sources carry in `WEB-INF/lib`.
    pub fn set_merge_jar_files(&mut self, merge: bool) {
        self.merge_jar_files = merge;
    }

    /// Create `store` scratch directories under `root` instead of the system temp dir.
    pub fn set_scratch_root(&mut self, root: impl Into<PathBuf>) {
        self.scratch_root = Some(root.into());
    }

    pub fn add_processor(&mut self, path: &str, processor: impl MergeProcessor + 'static) {
        self.processors
            .push(ArchiveResourceMerger::new(path, processor));
    }

    pub fn sources(&self) -> impl Iterator<Item = &WarArchive> {
        self.wars.iter()
    }

    /// The merged descriptor, computed on first use and cached.
    ///
    /// # Errors
    ///
    /// [`MergeError::MissingDescriptor`] if the first source has no
    /// `WEB-INF/web.xml`. Later sources without one are skipped.
    pub fn web_xml(&mut self) -> Result<&WebXml> {
        let merged = match self.merged.take() {
            Some(merged) => merged,
            None => self.merge_descriptors()?,
        };
        Ok(self.merged.insert(merged))
    }

    fn merge_descriptors(&self) -> Result<WebXml> {
        let first = &self.wars.head;
        let mut merged = first
            .web_xml()?
            .ok_or_else(|| MergeError::MissingDescriptor(first.path().to_path_buf()))?;

        for war in &self.wars.tail {
            match war.web_xml()? {
                Some(descriptor) => merged.merge(&descriptor),
                None => tracing::debug!("{} has no web.xml, skipping", war.path().display()),
            }
        }
        Ok(merged)
    }

    /// Write the merged application into `dir`.
    pub fn merge_into(&mut self, dir: &Path) -> Result<()> {
        let descriptor = self.web_xml()?.to_bytes()?;

        for war in self.wars.iter() {
            tracing::debug!("Expanding {} into {}", war.path().display(), dir.display());
            war.expand_to(dir, &self.files)?;
        }

        let lib = dir.join(WEB_INF_LIB);
        if !self.merge_jar_files && self.files.is_directory(&lib) {
            for child in self.files.children(&lib)? {
                let is_jar = self.files.name(&child).to_lowercase().ends_with(".jar");
                if is_jar && !self.files.is_directory(&child) {
                    self.files.delete(&child)?;
                }
            }
        }

        self.files.mkdirs(&lib)?;
        for jar in &self.jars {
            let target = self.files.append(&lib, &self.files.name(jar));
            self.files.copy_file(jar, &target, true)?;
        }

        self.files.write(&dir.join(WEB_XML), &descriptor)?;

        for processor in &mut self.processors {
            for war in self.wars.iter() {
                processor.add_merge_item(war)?;
            }
            processor.execute(dir, &self.files)?;
        }
        Ok(())
    }

    /// Merge into a scratch directory and package it as `target`.
    ///
    /// The scratch directory is removed whether or not packaging succeeds.
    pub fn store(&mut self, target: &Path) -> Result<()> {
        let root = self
            .scratch_root
            .clone()
            .unwrap_or_else(std::env::temp_dir);
        let scratch = tempfile::Builder::new()
            .prefix("cargolift-merge-")
            .tempdir_in(&root)
            .map_err(|source| MergeError::Io { path: root, source })?;

        self.merge_into(scratch.path())?;

        tracing::info!("Packaging merged WAR into [{}]", target.display());
        let result = package_directory(&self.files, scratch.path(), target);
        if let Err(e) = &result {
            tracing::error!("Failed to package [{}]: {}", target.display(), e);
        }

        let scratch_path = scratch.path().to_path_buf();
        if let Err(e) = scratch.close() {
            tracing::warn!(
                "Failed to delete scratch directory {}: {}",
                scratch_path.display(),
                e
            );
        }
        result
    }

    /// Whether any source contains the class.
    pub fn contains_class(&self, class_name: &str) -> Result<bool> {
        for war in self.wars.iter() {
            if war.contains_class(class_name)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// First source entry named `name`.
    pub fn find_resource(&self, name: &str) -> Result<Option<String>> {
        for war in self.wars.iter() {
            if let Some(found) = war.find_resource(name)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    /// Contents of `path` in the first source that has it.
    pub fn resource(&self, path: &str) -> Result<Option<Vec<u8>>> {
        for war in self.wars.iter() {
            if let Some(bytes) = war.resource(path)? {
                return Ok(Some(bytes));
            }
        }
        Ok(None)
    }

    /// Entries below `dir` in the first source that has any.
    pub fn resources(&self, dir: &str) -> Result<Vec<String>> {
        for war in self.wars.iter() {
            let listing = war.resources(dir)?;
            if !listing.is_empty() {
                return Ok(listing);
            }
        }
        Ok(Vec::new())
    }
}
