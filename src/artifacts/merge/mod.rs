//! Three-way merge of tracked-file snapshots
//!
//! - `conflict`: per-file classification and conflict blob rendering
//! - `three_way`: the merge itself, producing the merged snapshot

pub mod conflict;
pub mod three_way;
