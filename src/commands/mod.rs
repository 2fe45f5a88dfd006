//! User-facing operations
//!
//! Each command is an `impl Repository` block that validates its input, does
//! every read and computation first, and only then writes to the stores.

pub mod porcelain;
