//! Commit history graph
//!
//! - `commit_graph`: building commits from a parent and staged changes, and
//!   walking first-parent history
//! - `merge_base`: locating the split point of two branch tips

pub mod commit_graph;
pub mod merge_base;
