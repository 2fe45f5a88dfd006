//! Persistent repository areas
//!
//! Everything under the `.minigit` directory plus the working directory:
//!
//! - `database`: Blob store, namespaced per file name
//! - `commits`: Compressed, content-addressed commit records
//! - `index`: Staging area for pending additions
//! - `state`: HEAD, branch table and staged removals
//! - `workspace`: Working directory accessor
//! - `repository`: Context object tying the areas together

pub mod commits;
pub mod database;
pub(crate) mod fsutil;
pub mod index;
pub mod repository;
pub mod state;
pub mod workspace;
