//! Commit store
//!
//! Commits are written once to `<root>/<commit-sha>`, zlib-compressed. The id
//! is the SHA-1 of the uncompressed record, so it only depends on the
//! commit's fields.

use crate::areas::fsutil::{is_temp_file, write_atomically};
use crate::artifacts::objects::MIN_ABBREVIATED_ID_LENGTH;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Packable, Persisted};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::record::Record;
use crate::errors::RepositoryError;
use anyhow::Context;
use bytes::Bytes;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct CommitStore {
    path: Box<Path>,
}

impl CommitStore {
    pub fn new(path: Box<Path>) -> Self {
        CommitStore { path }
    }

    pub fn commits_path(&self) -> &Path {
        &self.path
    }

    fn commit_path(&self, oid: &ObjectId) -> PathBuf {
        self.path.join(oid.as_ref())
    }

    /// Persist a commit and return its id
    ///
    /// Storing an identical commit twice keeps the first copy.
    pub fn store(&self, commit: &Commit) -> anyhow::Result<ObjectId> {
        let content = commit.serialize()?;
        let oid = commit.record_id()?;
        let commit_path = self.commit_path(&oid);

        if !commit_path.exists() {
            std::fs::create_dir_all(&self.path).context(format!(
                "Unable to create commit directory {}",
                self.path.display()
            ))?;

            write_atomically(&commit_path, &Self::compress(content)?)?;
        }

        Ok(oid)
    }

    pub fn load(&self, oid: &ObjectId) -> anyhow::Result<Commit> {
        let commit_path = self.commit_path(oid);

        if !commit_path.is_file() {
            return Err(RepositoryError::UnknownCommit(oid.to_string()).into());
        }

        let content = std::fs::read(&commit_path).context(format!(
            "Unable to read commit file {}",
            commit_path.display()
        ))?;
        let content = Self::decompress(content.into())?;

        Record::decode(content)
            .and_then(Record::into_commit)
            .with_context(|| format!("Corrupt commit {oid}"))
    }

    pub fn exists(&self, oid: &ObjectId) -> bool {
        self.commit_path(oid).is_file()
    }

    /// Every stored commit id, sorted
    pub fn list(&self) -> anyhow::Result<Vec<ObjectId>> {
        let mut ids = Vec::new();

        if !self.path.exists() {
            return Ok(ids);
        }

        for entry in std::fs::read_dir(&self.path)
            .context(format!("Unable to list {}", self.path.display()))?
        {
            let file_name = entry?.file_name().to_string_lossy().to_string();
            if is_temp_file(&file_name) {
                continue;
            }

            ids.push(ObjectId::try_parse(file_name)?);
        }

        ids.sort();
        Ok(ids)
    }

    /// Resolve a full or abbreviated commit id
    ///
    /// Abbreviations need at least four hex characters and must match exactly
    /// one stored commit.
    pub fn resolve(&self, id: &str) -> anyhow::Result<ObjectId> {
        if id.len() == OBJECT_ID_LENGTH {
            let oid = ObjectId::try_parse(id.to_string())
                .map_err(|_| RepositoryError::UnknownCommit(id.to_string()))?;

            return if self.exists(&oid) {
                Ok(oid)
            } else {
                Err(RepositoryError::UnknownCommit(id.to_string()).into())
            };
        }

        if id.len() < MIN_ABBREVIATED_ID_LENGTH || !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(RepositoryError::UnknownCommit(id.to_string()).into());
        }

        let mut matches = self
            .list()?
            .into_iter()
            .filter(|oid| oid.has_prefix(id))
            .collect::<Vec<_>>();

        match matches.len() {
            0 => Err(RepositoryError::UnknownCommit(id.to_string()).into()),
            1 => Ok(matches.remove(0)),
            _ => Err(RepositoryError::AmbiguousCommit(id.to_string()).into()),
        }
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("Unable to compress commit content")?;

        encoder
            .finish()
            .map(|compressed_content| compressed_content.into())
            .context("Unable to finish compressing commit content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress commit content")?;

        Ok(decompressed_content.into())
    }
}
