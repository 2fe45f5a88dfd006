use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::record_kind::RecordKind;
use crate::artifacts::state::repository_state::RepositoryState;
use bytes::Bytes;
use std::io::{Cursor, Read};

/// Every record kind the repository persists
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Commit(Box<Commit>),
    State(Box<RepositoryState>),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Commit(_) => RecordKind::Commit,
            Record::State(_) => RecordKind::State,
        }
    }

    pub fn encode(&self) -> anyhow::Result<Bytes> {
        match self {
            Record::Commit(commit) => commit.serialize(),
            Record::State(state) => state.serialize(),
        }
    }

    /// Decode a framed record, checking the declared body size
    pub fn decode(content: Bytes) -> anyhow::Result<Self> {
        let mut reader = Cursor::new(content);
        let (kind, size) = RecordKind::parse_header(&mut reader)?;

        let mut body = Vec::new();
        reader.read_to_end(&mut body)?;
        if body.len() != size {
            anyhow::bail!(
                "Invalid {} record: expected {} body bytes, found {}",
                kind,
                size,
                body.len()
            );
        }

        let body = Cursor::new(body);
        match kind {
            RecordKind::Commit => Ok(Record::Commit(Box::new(Commit::deserialize(body)?))),
            RecordKind::State => Ok(Record::State(Box::new(RepositoryState::deserialize(
                body,
            )?))),
        }
    }

    pub fn into_commit(self) -> anyhow::Result<Commit> {
        match self {
            Record::Commit(commit) => Ok(*commit),
            other => anyhow::bail!("expected a commit record, found {}", other.kind()),
        }
    }

    pub fn into_state(self) -> anyhow::Result<RepositoryState> {
        match self {
            Record::State(state) => Ok(*state),
            other => anyhow::bail!("expected a state record, found {}", other.kind()),
        }
    }
}
