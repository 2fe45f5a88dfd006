//! Porcelain commands
//!
//! ## Commands
//!
//! - `init`: Create the repository directory and the root commit
//! - `add`: Stage a working file
//! - `commit`: Record staged changes as a new commit
//! - `rm`: Unstage a file and stage its removal
//! - `log`, `global_log`: Show first-parent history or every commit
//! - `find`: Look commits up by message
//! - `status`: Show branches, staged changes and untracked files
//! - `checkout`: Restore files or switch branches
//! - `branch`, `rm_branch`: Create or delete branch pointers
//! - `reset`: Move the current branch to an arbitrary commit
//! - `merge`: Merge another branch into the current one

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod find;
pub mod init;
pub mod log;
pub mod merge;
pub mod reset;
pub mod rm;
pub mod status;
