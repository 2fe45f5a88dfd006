use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::errors::RepositoryError;

impl Repository {
    /// Create a branch pointing at HEAD
    pub fn branch(&self, branch: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let branch = BranchName::try_parse(branch.to_string())?;
        if self.state().load()?.branch_tip(&branch).is_some() {
            return Err(RepositoryError::Validation(format!(
                "a branch named {branch} already exists"
            ))
            .into());
        }

        self.state().add_branch(branch)
    }

    /// Delete a branch pointer; its commits are kept
    pub fn rm_branch(&self, branch: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let branch = BranchName::try_parse(branch.to_string())?;
        self.state().remove_branch(&branch)
    }
}
