use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;

impl Repository {
    /// Ids of every commit whose message is exactly `message`, ordered by id
    pub fn find(&self, message: &str) -> anyhow::Result<Vec<ObjectId>> {
        self.ensure_initialized()?;

        let mut matches = vec![];
        for oid in self.commits().list()? {
            if self.commits().load(&oid)?.message() == message {
                matches.push(oid);
            }
        }

        if matches.is_empty() {
            return Err(RepositoryError::NoMatchingCommit(message.to_string()).into());
        }

        for oid in &matches {
            writeln!(self.writer(), "{oid}")?;
        }

        Ok(matches)
    }
}
