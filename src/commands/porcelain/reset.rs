use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;

impl Repository {
    /// Check out every file of a commit and move the current branch to it
    ///
    /// `commit_id` may be abbreviated. The staging area is cleared.
    pub fn reset(&self, commit_id: &str) -> anyhow::Result<ObjectId> {
        self.ensure_initialized()?;

        let oid = self.commits().resolve(commit_id)?;
        let (_, current) = self.head_commit()?;
        let target = self.commits().load(&oid)?;

        self.rewrite_working_tree(current.tracked_files(), target.tracked_files())?;
        self.state().update(|state| {
            state.set_head(oid.clone());
            state.clear_staged_removals();
            Ok(())
        })?;
        self.index().clear()?;

        Ok(oid)
    }
}
