// ABOUTME: FileHandler implementation backed by the local file system.
// ABOUTME: Thin wrappers around std::fs that attach the offending path to errors.

use std::fs;
use std::path::{Path, PathBuf};

use super::{FileHandler, FsError, Result};

/// Default [`FileHandler`] operating on the real file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileHandler;

impl LocalFileHandler {
    pub fn new() -> Self {
        Self
    }
}

impl FileHandler for LocalFileHandler {
    fn copy_file(&self, source: &Path, target: &Path, overwrite: bool) -> Result<()> {
        if !source.is_file() {
            return Err(FsError::NotFound(source.to_path_buf()));
        }
        if target.exists() && !overwrite {
            return Ok(());
        }
        if let Some(parent) = target.parent() {
            self.mkdirs(parent)?;
        }
        fs::copy(source, target).map_err(|e| FsError::io("copy", source, e))?;
        Ok(())
    }

    fn copy_directory(&self, source: &Path, target: &Path) -> Result<()> {
        if !source.is_dir() {
            return Err(FsError::NotFound(source.to_path_buf()));
        }
        self.mkdirs(target)?;

        for child in self.children(source)? {
            let Some(name) = child.file_name() else {
                continue;
            };
            let destination = target.join(name);
            if child.is_dir() {
                self.copy_directory(&child, &destination)?;
            } else {
                fs::copy(&child, &destination).map_err(|e| FsError::io("copy", &child, e))?;
            }
        }
        Ok(())
    }

    fn mkdirs(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).map_err(|e| FsError::io("create directory", path, e))
    }

    fn delete(&self, path: &Path) -> Result<()> {
        let result = if path.is_dir() {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        };
        match result {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FsError::io("delete", path, e)),
        }
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        match fs::read(path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(FsError::NotFound(path.to_path_buf()))
            }
            Err(e) => Err(FsError::io("read", path, e)),
        }
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            self.mkdirs(parent)?;
        }
        fs::write(path, contents).map_err(|e| FsError::io("write", path, e))
    }

    fn children(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(dir).map_err(|e| FsError::io("list directory", dir, e))?;
        let mut children = entries
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()
            .map_err(|e| FsError::io("list directory", dir, e))?;
        children.sort();
        Ok(children)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_directory(&self, path: &Path) -> bool {
        path.is_dir()
    }
}
