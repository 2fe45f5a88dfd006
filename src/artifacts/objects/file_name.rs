use crate::errors::RepositoryError;
use anyhow::Context;

/// Characters and shapes that cannot appear in a tracked file name:
/// hidden names, path separators, control characters and the NUL byte.
const INVALID_FILE_NAME_REGEX: &str = r"^\.|[/\\]|[\x00-\x1f\x7f]";

/// Name of a tracked file
///
/// Tracked files live directly in the working directory, so a name is a single
/// non-hidden path component. The name doubles as the blob namespace in the
/// object store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileName(String);

impl FileName {
    pub fn try_parse(name: impl Into<String>) -> anyhow::Result<Self> {
        let name = name.into();

        if name.is_empty() {
            return Err(RepositoryError::Validation("file name cannot be empty".into()).into());
        }

        let re = regex::Regex::new(INVALID_FILE_NAME_REGEX)
            .with_context(|| format!("invalid file name regex: {INVALID_FILE_NAME_REGEX}"))?;

        if re.is_match(&name) {
            Err(RepositoryError::Validation(format!("invalid file name: {name}")).into())
        } else {
            Ok(Self(name))
        }
    }
}

impl AsRef<str> for FileName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FileName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
