use crate::areas::commits::CommitStore;
use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::state::StateStore;
use crate::areas::workspace::Workspace;
use crate::artifacts::graph::commit_graph::CommitGraph;
use crate::artifacts::objects::commit::{Commit, TrackedFiles};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;
use anyhow::Context;
use std::cell::{RefCell, RefMut};
use std::path::Path;

/// Name of the repository directory inside the working directory
pub const REPOSITORY_DIR: &str = ".minigit";

/// Handle on one repository and its working directory
///
/// Every operation goes through this context; it owns the stores and the
/// console sink user-facing messages are written to.
pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    database: Database,
    commits: CommitStore,
    index: Index,
    state: StateStore,
    workspace: Workspace,
}

impl Repository {
    /// Open the repository rooted at `path`
    ///
    /// Nothing is read yet; commands other than `init` fail with
    /// `NotInitialized` when the repository directory is missing.
    pub fn new(path: &Path, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let path = path
            .canonicalize()
            .context(format!("Unable to open working directory {}", path.display()))?;
        let repository_path = path.join(REPOSITORY_DIR);

        Ok(Repository {
            writer: RefCell::new(writer),
            database: Database::new(repository_path.join("objects").into_boxed_path()),
            commits: CommitStore::new(repository_path.join("commits").into_boxed_path()),
            index: Index::new(repository_path.join("staging").into_boxed_path()),
            state: StateStore::new(repository_path.join("state").into_boxed_path()),
            workspace: Workspace::new(path.clone().into_boxed_path()),
            path: path.into_boxed_path(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn repository_path(&self) -> Box<Path> {
        self.path.join(REPOSITORY_DIR).into_boxed_path()
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn commits(&self) -> &CommitStore {
        &self.commits
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn state(&self) -> &StateStore {
        &self.state
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn commit_graph(&self) -> CommitGraph<'_, CommitStore> {
        CommitGraph::new(&self.commits)
    }

    pub fn is_initialized(&self) -> bool {
        self.state.path().is_file()
    }

    pub fn ensure_initialized(&self) -> anyhow::Result<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(RepositoryError::NotInitialized(self.path.to_path_buf()).into())
        }
    }

    /// The commit HEAD points at, with its id
    pub fn head_commit(&self) -> anyhow::Result<(ObjectId, Commit)> {
        let head = self.state.load()?.head().clone();
        let commit = self.commits.load(&head)?;

        Ok((head, commit))
    }

    /// Replace the tracked working files of `current` with those of `target`
    ///
    /// Fails with `UntrackedFile`, before touching anything, when a working
    /// file unknown to `current` would be overwritten. Every target blob is
    /// read before the first write.
    pub fn rewrite_working_tree(
        &self,
        current: &TrackedFiles,
        target: &TrackedFiles,
    ) -> anyhow::Result<()> {
        self.ensure_no_untracked_overwrite(current, target)?;

        let mut contents = Vec::with_capacity(target.len());
        for (name, oid) in target {
            contents.push((name, self.database.get(name, oid)?));
        }

        for name in current.keys().filter(|name| !target.contains_key(*name)) {
            self.workspace.remove_file(name)?;
        }

        for (name, content) in contents {
            self.workspace.write_file(name, &content)?;
        }

        Ok(())
    }

    pub fn ensure_no_untracked_overwrite(
        &self,
        current: &TrackedFiles,
        target: &TrackedFiles,
    ) -> anyhow::Result<()> {
        match target
            .keys()
            .find(|name| !current.contains_key(*name) && self.workspace.exists(name))
        {
            Some(name) => Err(RepositoryError::UntrackedFile(name.clone()).into()),
            None => Ok(()),
        }
    }
}
