use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use colored::Colorize;

impl Repository {
    /// Print first-parent history from HEAD, newest first
    pub fn log(&self) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let head = self.state().load()?.head().clone();

        for entry in self.commit_graph().ancestor_chain(&head) {
            let (oid, commit) = entry?;
            self.show_log_entry(&oid, &commit)?;
        }

        Ok(())
    }

    /// Print every stored commit, ordered by id
    pub fn global_log(&self) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        for oid in self.commits().list()? {
            let commit = self.commits().load(&oid)?;
            self.show_log_entry(&oid, &commit)?;
        }

        Ok(())
    }

    fn show_log_entry(&self, oid: &ObjectId, commit: &Commit) -> anyhow::Result<()> {
        writeln!(self.writer(), "===")?;
        writeln!(self.writer(), "{}", format!("commit {oid}").yellow())?;
        writeln!(self.writer(), "Branch: {}", commit.branch())?;

        if let (Some(first), Some(second)) = (commit.first_parent(), commit.second_parent()) {
            writeln!(
                self.writer(),
                "Merge: {} {}",
                first.to_short_oid(),
                second.to_short_oid()
            )?;
        }

        writeln!(self.writer(), "Date: {}", commit.readable_timestamp())?;
        writeln!(self.writer(), "{}", commit.message())?;
        writeln!(self.writer())?;

        Ok(())
    }
}
