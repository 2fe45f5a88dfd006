use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::file_name::FileName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;

impl Repository {
    /// Restore a file to the version HEAD tracks, without staging it
    pub fn checkout_file(&self, file: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let head = self.state().load()?.head().clone();
        self.restore_file(&head, file)
    }

    /// Restore a file to the version a commit tracks, without staging it
    ///
    /// `commit_id` may be abbreviated to four or more hex characters.
    pub fn checkout_file_at(&self, commit_id: &str, file: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let oid = self.commits().resolve(commit_id)?;
        self.restore_file(&oid, file)
    }

    fn restore_file(&self, commit_oid: &ObjectId, file: &str) -> anyhow::Result<()> {
        let name = FileName::try_parse(file)?;
        let commit = self.commits().load(commit_oid)?;

        let blob_oid = commit
            .lookup(&name)
            .ok_or_else(|| RepositoryError::FileNotInCommit {
                name: name.clone(),
                oid: commit_oid.clone(),
            })?;
        let content = self.database().get(&name, blob_oid)?;

        self.workspace().write_file(&name, &content)
    }

    /// Switch to another branch
    ///
    /// The working directory is rewritten to the branch tip, then the staging
    /// area is cleared. Checking out the current branch changes nothing.
    pub fn checkout_branch(&self, branch: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let branch = BranchName::try_parse(branch.to_string())?;
        let state = self.state().load()?;

        if state.current_branch() == &branch {
            writeln!(self.writer(), "Already on '{branch}'")?;
            return Ok(());
        }

        let tip = state
            .branch_tip(&branch)
            .ok_or_else(|| RepositoryError::UnknownBranch(branch.clone()))?;
        let current = self.commits().load(state.head())?;
        let target = self.commits().load(tip)?;

        self.rewrite_working_tree(current.tracked_files(), target.tracked_files())?;
        self.state().update(|state| {
            state.switch_branch(&branch)?;
            state.clear_staged_removals();
            Ok(())
        })?;
        self.index().clear()?;

        writeln!(self.writer(), "Switched to branch '{branch}'")?;

        Ok(())
    }
}
