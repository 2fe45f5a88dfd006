//! Persisted repository state
//!
//! The whole [`RepositoryState`] record lives in one file and is rewritten
//! after every successful transition. Transitions run against an in-memory
//! copy; a transition that fails leaves the file untouched.
//!
//! There is no lock around the read-modify-write cycle: two processes
//! mutating the same repository at once can lose an update.

use crate::areas::fsutil::write_atomically;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::file_name::FileName;
use crate::artifacts::objects::object::Packable;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::record::Record;
use crate::artifacts::state::repository_state::RepositoryState;
use anyhow::Context;
use std::path::Path;

#[derive(Debug)]
pub struct StateStore {
    /// Path to the state file (typically `.minigit/state`)
    path: Box<Path>,
}

impl StateStore {
    pub fn new(path: Box<Path>) -> Self {
        StateStore { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> anyhow::Result<RepositoryState> {
        let content = std::fs::read(&self.path).context(format!(
            "Unable to read state file {}",
            self.path.display()
        ))?;

        Record::decode(content.into())
            .and_then(Record::into_state)
            .context("Corrupt repository state")
    }

    pub fn save(&self, state: &RepositoryState) -> anyhow::Result<()> {
        write_atomically(&self.path, &state.serialize()?)
    }

    /// Read-modify-write the state record
    ///
    /// `transition` runs on a copy of the current state; the copy is persisted
    /// only if the transition returns `Ok`.
    pub fn update<T>(
        &self,
        transition: impl FnOnce(&mut RepositoryState) -> anyhow::Result<T>,
    ) -> anyhow::Result<T> {
        let mut state = self.load()?;
        let outcome = transition(&mut state)?;
        self.save(&state)?;

        Ok(outcome)
    }

    pub fn set_head(&self, oid: ObjectId) -> anyhow::Result<()> {
        self.update(|state| {
            state.set_head(oid);
            Ok(())
        })
    }

    pub fn switch_branch(&self, name: &BranchName) -> anyhow::Result<()> {
        self.update(|state| state.switch_branch(name))
    }

    pub fn add_branch(&self, name: BranchName) -> anyhow::Result<()> {
        self.update(|state| {
            state.add_branch(name);
            Ok(())
        })
    }

    pub fn remove_branch(&self, name: &BranchName) -> anyhow::Result<()> {
        self.update(|state| state.remove_branch(name))
    }

    pub fn stage_removal(&self, name: FileName) -> anyhow::Result<()> {
        self.update(|state| {
            state.stage_removal(name);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RepositoryError;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    fn branch(name: &str) -> BranchName {
        BranchName::try_parse(name.to_string()).unwrap()
    }

    #[fixture]
    fn store_dir() -> TempDir {
        TempDir::new().expect("Failed to create temp dir")
    }

    fn initialized_store(dir: &TempDir) -> StateStore {
        let store = StateStore::new(dir.path().join("state").into_boxed_path());
        store
            .save(&RepositoryState::initialize(
                ObjectId::hash(b"root"),
                BranchName::default_branch(),
            ))
            .unwrap();
        store
    }

    #[rstest]
    fn mutations_are_persisted(store_dir: TempDir) {
        let store = initialized_store(&store_dir);

        store.add_branch(branch("feature")).unwrap();
        store.set_head(ObjectId::hash(b"next")).unwrap();
        store
            .stage_removal(FileName::try_parse("a.txt").unwrap())
            .unwrap();

        let state = store.load().unwrap();
        assert_eq!(state.head(), &ObjectId::hash(b"next"));
        assert_eq!(
            state.branch_tip(&branch("feature")),
            Some(&ObjectId::hash(b"root"))
        );
        assert_eq!(state.staged_removals().len(), 1);
    }

    #[rstest]
    fn failed_transitions_leave_the_file_untouched(store_dir: TempDir) {
        let store = initialized_store(&store_dir);
        let before = std::fs::read(store.path()).unwrap();

        let error = store.remove_branch(&branch("master")).unwrap_err();

        assert!(matches!(
            RepositoryError::of(&error),
            Some(RepositoryError::CurrentBranch(_))
        ));
        assert_eq!(std::fs::read(store.path()).unwrap(), before);
    }

    #[rstest]
    fn switch_branch_is_persisted(store_dir: TempDir) {
        let store = initialized_store(&store_dir);
        store.add_branch(branch("feature")).unwrap();
        store.set_head(ObjectId::hash(b"next")).unwrap();

        store.switch_branch(&branch("feature")).unwrap();

        let state = store.load().unwrap();
        assert_eq!(state.current_branch(), &branch("feature"));
        assert_eq!(state.head(), &ObjectId::hash(b"root"));
    }
}
