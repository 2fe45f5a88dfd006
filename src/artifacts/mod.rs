//! Version-control data structures and algorithms
//!
//! - `branch`: Branch names
//! - `graph`: Commit creation, history traversal and merge base search
//! - `merge`: Three-way reconciliation of tracked-file snapshots
//! - `objects`: Object ids, file names and the persisted record kinds
//! - `state`: The mutable repository state record

/// Macro for debug logging that is enabled with the debug_merge feature flag
///
/// # Usage
/// ```rust,ignore
/// debug_log!("Processing commit {}", commit_id);
/// ```
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "debug_merge")]
        {
            eprintln!($($arg)*);
        }
    };
}

pub mod branch;
pub mod graph;
pub mod merge;
pub mod objects;
pub mod state;
