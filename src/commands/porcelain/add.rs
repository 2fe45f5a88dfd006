use crate::areas::repository::Repository;
use crate::artifacts::objects::file_name::FileName;
use crate::artifacts::objects::object_id::ObjectId;

/// What `add` did with a working file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The content differs from HEAD and is now staged
    Staged,
    /// The content matches HEAD; nothing is staged for it
    Unchanged,
}

impl Repository {
    /// Stage the current content of a working file
    ///
    /// Content identical to the version HEAD tracks drops any staged version
    /// instead of staging a copy. Either way a pending removal of the file is
    /// cancelled.
    pub fn add(&self, file: &str) -> anyhow::Result<AddOutcome> {
        self.ensure_initialized()?;

        let name = FileName::try_parse(file)?;
        let content = self.workspace().read_file(&name)?;
        let (_, head) = self.head_commit()?;
        let removal_pending = self.state().load()?.staged_removals().contains(&name);

        let outcome = if head.lookup(&name) == Some(&ObjectId::hash(&content)) {
            self.index().unstage(&name)?;
            AddOutcome::Unchanged
        } else {
            self.index().stage_add(&name, &content)?;
            AddOutcome::Staged
        };

        if removal_pending {
            self.state().update(|state| {
                state.unstage_removal(&name);
                Ok(())
            })?;
        }

        Ok(outcome)
    }
}
