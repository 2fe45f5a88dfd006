use crate::artifacts::objects::file_name::FileName;
use crate::errors::RepositoryError;
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeSet;
use std::path::Path;
use walkdir::WalkDir;

/// Working directory accessor
///
/// Only top-level, non-hidden regular files are visible; the repository
/// directory itself is hidden.
#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn list_files(&self) -> anyhow::Result<BTreeSet<FileName>> {
        if !self.path.is_dir() {
            anyhow::bail!("The specified path is not a directory: {:?}", self.path);
        }

        Ok(WalkDir::new(&self.path)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| FileName::try_parse(entry.file_name().to_string_lossy()).ok())
            .collect())
    }

    pub fn exists(&self, name: &FileName) -> bool {
        self.path.join(name.as_ref()).is_file()
    }

    pub fn read_file(&self, name: &FileName) -> anyhow::Result<Bytes> {
        let file_path = self.path.join(name.as_ref());

        if !file_path.is_file() {
            return Err(RepositoryError::Validation(format!("file {name} does not exist")).into());
        }

        let content = std::fs::read(&file_path)
            .context(format!("Unable to read {}", file_path.display()))?;

        Ok(content.into())
    }

    pub fn write_file(&self, name: &FileName, content: &[u8]) -> anyhow::Result<()> {
        let file_path = self.path.join(name.as_ref());

        std::fs::write(&file_path, content)
            .context(format!("Unable to write {}", file_path.display()))
    }

    /// Delete a working file; returns whether it existed
    pub fn remove_file(&self, name: &FileName) -> anyhow::Result<bool> {
        let file_path = self.path.join(name.as_ref());

        if !file_path.is_file() {
            return Ok(false);
        }

        std::fs::remove_file(&file_path)
            .context(format!("Unable to remove {}", file_path.display()))?;

        Ok(true)
    }
}
