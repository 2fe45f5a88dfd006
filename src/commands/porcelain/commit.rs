use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::load_timestamp_from_env;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;

impl Repository {
    /// Record the staged additions and removals as a child of HEAD
    ///
    /// Blobs are migrated and the commit is stored before HEAD moves, and the
    /// staging area is cleared last.
    pub fn commit(&self, message: &str) -> anyhow::Result<ObjectId> {
        self.ensure_initialized()?;

        let message = message.trim().to_string();
        if message.is_empty() {
            return Err(RepositoryError::Validation(
                "please enter a commit message".to_string(),
            )
            .into());
        }

        let state = self.state().load()?;
        let staged_adds = self.index().entries()?;
        if staged_adds.is_empty() && state.staged_removals().is_empty() {
            return Err(RepositoryError::NothingToCommit.into());
        }

        let commit = self.commit_graph().create_commit(
            state.head(),
            state.current_branch().clone(),
            message,
            &staged_adds,
            state.staged_removals(),
            load_timestamp_from_env(),
        )?;

        self.index().migrate_into(self.database())?;
        let commit_oid = self.commits().store(&commit)?;
        self.state().update(|state| {
            state.set_head(commit_oid.clone());
            state.clear_staged_removals();
            Ok(())
        })?;
        self.index().clear()?;

        writeln!(
            self.writer(),
            "[{} {}] {}",
            commit.branch(),
            commit_oid.to_short_oid(),
            commit.message()
        )?;

        Ok(commit_oid)
    }
}
