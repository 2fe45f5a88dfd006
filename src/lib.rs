//! A minimal local version-control engine
//!
//! Content-addressed blob and commit stores, mutable branch pointers, a
//! staging index, and a three-way merge over first-parent history.

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
