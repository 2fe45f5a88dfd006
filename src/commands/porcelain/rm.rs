use crate::areas::repository::Repository;
use crate::artifacts::objects::file_name::FileName;
use crate::errors::RepositoryError;

impl Repository {
    /// Unstage a file, and stage its removal when HEAD tracks it
    ///
    /// A file tracked by HEAD is also deleted from the working directory.
    pub fn rm(&self, file: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let name = FileName::try_parse(file)?;
        let (_, head) = self.head_commit()?;
        let staged = self.index().is_staged(&name)?;
        let tracked = head.lookup(&name).is_some();

        if !staged && !tracked {
            return Err(RepositoryError::Validation(format!(
                "no reason to remove the file {name}"
            ))
            .into());
        }

        if staged {
            self.index().unstage(&name)?;
        }

        if tracked {
            self.state().stage_removal(name.clone())?;
            self.workspace().remove_file(&name)?;
        }

        Ok(())
    }
}
