//! Blob store
//!
//! Content-addressed storage of file versions, namespaced by file name:
//! `<root>/<file-name>/<content-sha>` holds the raw bytes. The same content
//! stored under two names occupies two entries; there is no cross-name
//! deduplication.
//!
//! The permanent object store and the staging area are both instances of this
//! store rooted at different directories.

use crate::areas::fsutil::{is_temp_file, write_atomically};
use crate::artifacts::objects::file_name::FileName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    fn object_path(&self, name: &FileName, oid: &ObjectId) -> PathBuf {
        self.path.join(name.as_ref()).join(oid.as_ref())
    }

    /// Store `content` under `name`, returning its content hash
    ///
    /// Storing content that is already present is a no-op that returns the
    /// same hash.
    pub fn put(&self, name: &FileName, content: &[u8]) -> anyhow::Result<ObjectId> {
        let oid = ObjectId::hash(content);
        let object_path = self.object_path(name, &oid);

        // write the blob to disk unless it already exists
        if !object_path.exists() {
            let name_dir = self.path.join(name.as_ref());
            std::fs::create_dir_all(&name_dir).context(format!(
                "Unable to create object directory {}",
                name_dir.display()
            ))?;

            write_atomically(&object_path, content)?;
        }

        Ok(oid)
    }

    pub fn get(&self, name: &FileName, oid: &ObjectId) -> anyhow::Result<Bytes> {
        let object_path = self.object_path(name, oid);

        if !object_path.is_file() {
            return Err(RepositoryError::ObjectNotFound {
                name: name.clone(),
                oid: oid.clone(),
            }
            .into());
        }

        let content = std::fs::read(&object_path).context(format!(
            "Unable to read object file {}",
            object_path.display()
        ))?;

        Ok(content.into())
    }

    pub fn exists(&self, name: &FileName, oid: &ObjectId) -> bool {
        self.object_path(name, oid).is_file()
    }

    /// Store `content` as the only version kept under `name`
    pub fn replace(&self, name: &FileName, content: &[u8]) -> anyhow::Result<ObjectId> {
        self.remove(name)?;
        self.put(name, content)
    }

    /// Drop every version stored under `name`; returns whether any existed
    pub fn remove(&self, name: &FileName) -> anyhow::Result<bool> {
        let name_dir = self.path.join(name.as_ref());

        if !name_dir.exists() {
            return Ok(false);
        }

        std::fs::remove_dir_all(&name_dir).context(format!(
            "Unable to remove object directory {}",
            name_dir.display()
        ))?;

        Ok(true)
    }

    /// Every namespace that currently holds at least one version
    pub fn names(&self) -> anyhow::Result<BTreeSet<FileName>> {
        let mut names = BTreeSet::new();

        if !self.path.exists() {
            return Ok(names);
        }

        for entry in std::fs::read_dir(&self.path)
            .context(format!("Unable to list {}", self.path.display()))?
        {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }

            let name = FileName::try_parse(entry.file_name().to_string_lossy().to_string())?;
            if !self.versions(&name)?.is_empty() {
                names.insert(name);
            }
        }

        Ok(names)
    }

    /// Content hashes stored under `name`
    pub fn versions(&self, name: &FileName) -> anyhow::Result<BTreeSet<ObjectId>> {
        let name_dir = self.path.join(name.as_ref());
        let mut versions = BTreeSet::new();

        if !name_dir.is_dir() {
            return Ok(versions);
        }

        for entry in std::fs::read_dir(&name_dir)
            .context(format!("Unable to list {}", name_dir.display()))?
        {
            let file_name = entry?.file_name().to_string_lossy().to_string();
            if is_temp_file(&file_name) {
                continue;
            }

            versions.insert(ObjectId::try_parse(file_name)?);
        }

        Ok(versions)
    }

    /// Drop every namespace
    pub fn clear(&self) -> anyhow::Result<()> {
        for name in self.names()? {
            self.remove(&name)?;
        }

        Ok(())
    }
}
