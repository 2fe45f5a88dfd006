//! Persisted object types
//!
//! Two families of objects live in a repository:
//!
//! - **Blobs**: raw file content, addressed by `(file name, content hash)`
//! - **Records**: closed set of encoded kinds (`Commit`, `RepositoryState`)
//!
//! Records use the header `<kind> v<version> <size>\0` followed by a
//! line-oriented body. A commit's id is the SHA-1 of its encoded bytes.

pub mod commit;
pub mod file_name;
pub mod object;
pub mod object_id;
pub mod record;
pub mod record_kind;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Shortest abbreviated id accepted when resolving commits
pub const MIN_ABBREVIATED_ID_LENGTH: usize = 4;

/// Current version of the record encoding
pub const RECORD_VERSION: u32 = 1;
