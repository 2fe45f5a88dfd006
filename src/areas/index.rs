//! Staging index
//!
//! Buffers file additions until the next commit. Each staged file is a blob
//! in a dedicated staging store, laid out like the object store
//! (`<staging>/<file-name>/<content-sha>`), with at most one version per name.
//! Committing migrates the staged blobs into the permanent object store and
//! clears the index.

use crate::areas::database::Database;
use crate::artifacts::objects::commit::TrackedFiles;
use crate::artifacts::objects::file_name::FileName;
use crate::artifacts::objects::object_id::ObjectId;
use bytes::Bytes;
use std::path::Path;

#[derive(Debug)]
pub struct Index {
    staging: Database,
}

impl Index {
    /// # Arguments
    ///
    /// * `path` - Path to the staging directory (typically `.minigit/staging`)
    pub fn new(path: Box<Path>) -> Self {
        Index {
            staging: Database::new(path),
        }
    }

    pub fn path(&self) -> &Path {
        self.staging.objects_path()
    }

    /// Stage `content` for `name`, replacing any version staged before
    pub fn stage_add(&self, name: &FileName, content: &[u8]) -> anyhow::Result<ObjectId> {
        self.staging.replace(name, content)
    }

    /// Drop the staged version of `name`; returns whether one was staged
    pub fn unstage(&self, name: &FileName) -> anyhow::Result<bool> {
        self.staging.remove(name)
    }

    pub fn is_staged(&self, name: &FileName) -> anyhow::Result<bool> {
        Ok(!self.staging.versions(name)?.is_empty())
    }

    /// Staged file names mapped to the hash of their pending content
    pub fn entries(&self) -> anyhow::Result<TrackedFiles> {
        let mut entries = TrackedFiles::new();

        for name in self.staging.names()? {
            let mut versions = self.staging.versions(&name)?.into_iter();

            match (versions.next(), versions.next()) {
                (Some(oid), None) => {
                    entries.insert(name, oid);
                }
                _ => anyhow::bail!("Corrupt staging area: several versions staged for {name}"),
            }
        }

        Ok(entries)
    }

    pub fn is_empty(&self) -> anyhow::Result<bool> {
        Ok(self.staging.names()?.is_empty())
    }

    pub fn content(&self, name: &FileName, oid: &ObjectId) -> anyhow::Result<Bytes> {
        self.staging.get(name, oid)
    }

    /// Copy every staged blob into `database`
    pub fn migrate_into(&self, database: &Database) -> anyhow::Result<()> {
        for (name, oid) in self.entries()? {
            let content = self.staging.get(&name, &oid)?;
            database.put(&name, &content)?;
        }

        Ok(())
    }

    pub fn clear(&self) -> anyhow::Result<()> {
        self.staging.clear()
    }
}
