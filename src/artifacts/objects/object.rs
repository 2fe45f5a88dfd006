use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::record_kind::RecordKind;
use anyhow::Result;
use bytes::Bytes;
use std::io::BufRead;

pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

pub trait Unpackable {
    /// Decode a record body; the header has already been consumed
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

/// A persisted record with a deterministic encoding
pub trait Persisted: Packable + Unpackable {
    fn record_kind(&self) -> RecordKind;

    /// Hash of the encoded record
    ///
    /// Identical logical records always produce identical ids.
    fn record_id(&self) -> Result<ObjectId> {
        let content = self.serialize()?;
        Ok(ObjectId::hash(&content))
    }
}

/// Prefix a record body with its `<kind> v<version> <size>\0` header
pub fn frame(kind: RecordKind, body: &[u8]) -> Bytes {
    let header = kind.header(body.len());

    let mut framed = Vec::with_capacity(header.len() + body.len());
    framed.extend_from_slice(header.as_bytes());
    framed.extend_from_slice(body);

    Bytes::from(framed)
}
