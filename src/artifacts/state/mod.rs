//! Mutable repository state
//!
//! Everything that changes between commands: HEAD, the current branch, the
//! branch table and the files staged for removal.

pub mod repository_state;
