use crate::artifacts::objects::RECORD_VERSION;
use anyhow::Context;
use std::io::BufRead;

/// Kinds of records persisted by the repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Commit,
    State,
}

impl RecordKind {
    pub fn as_str(&self) -> &str {
        match self {
            RecordKind::Commit => "commit",
            RecordKind::State => "state",
        }
    }

    /// Render the header preceding a record body of `size` bytes
    pub fn header(&self, size: usize) -> String {
        format!("{} v{} {}\0", self.as_str(), RECORD_VERSION, size)
    }

    /// Parse `<kind> v<version> <size>\0` and leave the reader at the body
    ///
    /// # Returns
    ///
    /// The record kind and the declared body size
    pub fn parse_header(data_reader: &mut impl BufRead) -> anyhow::Result<(RecordKind, usize)> {
        let mut header = Vec::new();
        data_reader.read_until(b'\0', &mut header)?;

        if header.pop() != Some(b'\0') {
            anyhow::bail!("Invalid record: unterminated header");
        }

        let header = String::from_utf8(header)?;
        let mut parts = header.split(' ');

        let kind = parts
            .next()
            .context("Invalid record: missing kind")
            .and_then(RecordKind::try_from)?;
        let version = parts
            .next()
            .and_then(|version| version.strip_prefix('v'))
            .context("Invalid record: missing version")?
            .parse::<u32>()
            .context("Invalid record: malformed version")?;
        let size = parts
            .next()
            .context("Invalid record: missing size")?
            .parse::<usize>()
            .context("Invalid record: malformed size")?;

        if version != RECORD_VERSION {
            anyhow::bail!("Unsupported {} record version: {}", kind, version);
        }

        Ok((kind, size))
    }
}

impl TryFrom<&str> for RecordKind {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> anyhow::Result<Self> {
        match value {
            "commit" => Ok(RecordKind::Commit),
            "state" => Ok(RecordKind::State),
            _ => Err(anyhow::anyhow!("Invalid record kind: {value}")),
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn header_round_trips_through_parser() {
        let header = RecordKind::State.header(42);
        let mut reader = Cursor::new(format!("{header}body").into_bytes());

        let (kind, size) = RecordKind::parse_header(&mut reader).expect("valid header");

        assert_eq!(kind, RecordKind::State);
        assert_eq!(size, 42);
        let mut rest = String::new();
        std::io::Read::read_to_string(&mut reader, &mut rest).expect("readable");
        assert_eq!(rest, "body");
    }

    #[test]
    fn rejects_future_versions() {
        let mut reader = Cursor::new(b"commit v2 0\0".to_vec());

        let error = RecordKind::parse_header(&mut reader).unwrap_err();

        assert!(error.to_string().contains("Unsupported commit record version"));
    }

    #[test]
    fn rejects_unknown_kinds() {
        let mut reader = Cursor::new(b"tree v1 0\0".to_vec());

        assert!(RecordKind::parse_header(&mut reader).is_err());
    }
}
