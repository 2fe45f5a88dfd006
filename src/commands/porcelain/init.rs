use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::state::repository_state::RepositoryState;
use crate::errors::RepositoryError;
use anyhow::Context;
use std::fs;

impl Repository {
    /// Create `.minigit` with its stores, the root commit and the state record
    pub fn init(&self) -> anyhow::Result<()> {
        let repository_path = self.repository_path();
        if repository_path.exists() {
            return Err(RepositoryError::AlreadyInitialized(self.path().to_path_buf()).into());
        }

        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create .minigit/objects directory")?;

        fs::create_dir_all(self.commits().commits_path())
            .context("Failed to create .minigit/commits directory")?;

        fs::create_dir_all(self.index().path())
            .context("Failed to create .minigit/staging directory")?;

        let default_branch = BranchName::default_branch();
        let root = self.commit_graph().create_root(default_branch.clone());
        let root_oid = self.commits().store(&root)?;

        self.state()
            .save(&RepositoryState::initialize(root_oid, default_branch))
            .context("Failed to write the initial repository state")?;

        writeln!(
            self.writer(),
            "Initialized empty minigit repository in {}",
            repository_path.display()
        )?;

        Ok(())
    }
}
