//! Commit record
//!
//! Commits are immutable snapshots of the tracked files. They contain:
//! - The first parent (absent only for the root commit)
//! - The second parent (present only for merge commits)
//! - The branch the commit was created on
//! - A timestamp and a message
//! - The tracked files, mapping each file name to its content hash
//!
//! ## Format
//!
//! On disk (before compression):
//! ```text
//! commit v1 <size>\0
//! branch <name>
//! timestamp <unix-seconds> <timezone>
//! parent <first-parent-sha>
//! merge-parent <second-parent-sha>
//! file <content-sha> <name>
//!
//! <commit message>
//! ```
//!
//! `parent`, `merge-parent` and `file` lines are optional; files are written
//! in name order so the encoding, and therefore the id, is deterministic.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::file_name::FileName;
use crate::artifacts::objects::object::{Packable, Persisted, Unpackable, frame};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::record_kind::RecordKind;
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset, Timelike};
use std::collections::BTreeMap;
use std::io::BufRead;

/// Snapshot of tracked files: file name to content hash
pub type TrackedFiles = BTreeMap<FileName, ObjectId>;

/// Message of the root commit
pub const ROOT_COMMIT_MESSAGE: &str = "initial commit";

/// Environment variable pinning the timestamp of new commits
pub const COMMIT_DATE_ENV: &str = "MINIGIT_COMMIT_DATE";

/// Load the timestamp for a new commit
///
/// Reads `MINIGIT_COMMIT_DATE` (RFC 2822 or `%Y-%m-%d %H:%M:%S %z`) and falls
/// back to the current local time when it is unset or unparseable.
pub fn load_timestamp_from_env() -> DateTime<FixedOffset> {
    std::env::var(COMMIT_DATE_ENV)
        .ok()
        .and_then(|date_str| {
            DateTime::parse_from_rfc2822(&date_str)
                .or_else(|_| DateTime::parse_from_str(&date_str, "%Y-%m-%d %H:%M:%S %z"))
                .ok()
        })
        .unwrap_or_else(|| chrono::Local::now().fixed_offset())
}

fn root_timestamp() -> DateTime<FixedOffset> {
    DateTime::<chrono::Utc>::UNIX_EPOCH.fixed_offset()
}

/// Slim representation of a commit
///
/// Only what the merge base walk needs: the id and the first-parent link.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SlimCommit {
    pub oid: ObjectId,
    pub first_parent: Option<ObjectId>,
}

/// Immutable, content-addressed commit
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    /// Parent on the branch the commit was made on (None only for the root)
    first_parent: Option<ObjectId>,
    /// Tip of the merged branch (merge commits only)
    second_parent: Option<ObjectId>,
    /// Branch label at creation time
    branch: BranchName,
    /// Creation time, truncated to whole seconds
    timestamp: DateTime<FixedOffset>,
    message: String,
    tracked_files: TrackedFiles,
}

impl Commit {
    /// The root commit of a repository
    ///
    /// Has no parents, tracks nothing, and carries the epoch timestamp and the
    /// fixed root message, so its id only depends on the branch name.
    pub fn root(branch: BranchName) -> Self {
        Commit {
            first_parent: None,
            second_parent: None,
            branch,
            timestamp: root_timestamp(),
            message: ROOT_COMMIT_MESSAGE.to_string(),
            tracked_files: TrackedFiles::new(),
        }
    }

    pub fn new(
        parent: ObjectId,
        branch: BranchName,
        message: String,
        tracked_files: TrackedFiles,
        timestamp: DateTime<FixedOffset>,
    ) -> Self {
        Commit {
            first_parent: Some(parent),
            second_parent: None,
            branch,
            timestamp: truncate_to_seconds(timestamp),
            message,
            tracked_files,
        }
    }

    pub fn new_merge(
        first_parent: ObjectId,
        second_parent: ObjectId,
        branch: BranchName,
        message: String,
        tracked_files: TrackedFiles,
        timestamp: DateTime<FixedOffset>,
    ) -> Self {
        Commit {
            first_parent: Some(first_parent),
            second_parent: Some(second_parent),
            branch,
            timestamp: truncate_to_seconds(timestamp),
            message,
            tracked_files,
        }
    }

    pub fn first_parent(&self) -> Option<&ObjectId> {
        self.first_parent.as_ref()
    }

    pub fn second_parent(&self) -> Option<&ObjectId> {
        self.second_parent.as_ref()
    }

    pub fn is_merge(&self) -> bool {
        self.second_parent.is_some()
    }

    pub fn branch(&self) -> &BranchName {
        &self.branch
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// Format timestamp in human-readable form
    ///
    /// # Returns
    ///
    /// String like "Thu Jan 1 00:00:00 1970 +0000"
    pub fn readable_timestamp(&self) -> String {
        self.timestamp
            .format("%a %b %-d %H:%M:%S %Y %z")
            .to_string()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn tracked_files(&self) -> &TrackedFiles {
        &self.tracked_files
    }

    /// Content hash of a tracked file, if this commit tracks it
    pub fn lookup(&self, name: &FileName) -> Option<&ObjectId> {
        self.tracked_files.get(name)
    }

    pub fn slim(&self, oid: ObjectId) -> SlimCommit {
        SlimCommit {
            oid,
            first_parent: self.first_parent.clone(),
        }
    }
}

fn truncate_to_seconds(timestamp: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    timestamp.with_nanosecond(0).unwrap_or(timestamp)
}

fn format_timestamp(timestamp: &DateTime<FixedOffset>) -> String {
    format!("{} {}", timestamp.timestamp(), timestamp.format("%z"))
}

fn parse_timestamp(value: &str) -> anyhow::Result<DateTime<FixedOffset>> {
    let (seconds, timezone) = value
        .split_once(' ')
        .context("Invalid commit record: malformed timestamp")?;

    let seconds = seconds
        .parse::<i64>()
        .map_err(|_| anyhow::anyhow!("Invalid timestamp"))?;
    let offset = parse_timezone(timezone)?;

    let datetime =
        DateTime::from_timestamp(seconds, 0).ok_or_else(|| anyhow::anyhow!("Invalid timestamp"))?;

    Ok(datetime.with_timezone(&offset))
}

fn parse_timezone(timezone: &str) -> anyhow::Result<FixedOffset> {
    let (sign, digits) = match timezone.split_at_checked(1) {
        Some(("+", digits)) => (1, digits),
        Some(("-", digits)) => (-1, digits),
        _ => anyhow::bail!("Invalid timezone: {timezone}"),
    };

    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        anyhow::bail!("Invalid timezone: {timezone}");
    }

    let hours = digits[..2].parse::<i32>()?;
    let minutes = digits[2..].parse::<i32>()?;

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .ok_or_else(|| anyhow::anyhow!("Invalid timezone: {timezone}"))
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut lines = vec![];

        lines.push(format!("branch {}", self.branch));
        lines.push(format!("timestamp {}", format_timestamp(&self.timestamp)));
        if let Some(parent) = &self.first_parent {
            lines.push(format!("parent {parent}"));
        }
        if let Some(parent) = &self.second_parent {
            lines.push(format!("merge-parent {parent}"));
        }
        for (name, oid) in &self.tracked_files {
            lines.push(format!("file {oid} {name}"));
        }
        lines.push(String::new());
        lines.push(self.message.to_string());

        let body = lines.join("\n");

        Ok(frame(RecordKind::Commit, body.as_bytes()))
    }
}

impl Unpackable for Commit {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;
        let content = String::from_utf8(content)?;

        let (fields, message) = content
            .split_once("\n\n")
            .context("Invalid commit record: missing message separator")?;
        let mut lines = fields.lines();

        let branch = lines
            .next()
            .and_then(|line| line.strip_prefix("branch "))
            .context("Invalid commit record: missing branch line")?;
        let branch = BranchName::try_parse(branch.to_string())?;

        let timestamp = lines
            .next()
            .and_then(|line| line.strip_prefix("timestamp "))
            .context("Invalid commit record: missing timestamp line")?;
        let timestamp = parse_timestamp(timestamp)?;

        let mut first_parent = None;
        let mut second_parent = None;
        let mut tracked_files = TrackedFiles::new();

        for line in lines {
            if let Some(oid) = line.strip_prefix("parent ") {
                first_parent = Some(ObjectId::try_parse(oid.to_string())?);
            } else if let Some(oid) = line.strip_prefix("merge-parent ") {
                second_parent = Some(ObjectId::try_parse(oid.to_string())?);
            } else if let Some(entry) = line.strip_prefix("file ") {
                let (oid, name) = entry
                    .split_once(' ')
                    .context("Invalid commit record: malformed file line")?;
                tracked_files.insert(
                    FileName::try_parse(name)?,
                    ObjectId::try_parse(oid.to_string())?,
                );
            } else {
                anyhow::bail!("Invalid commit record: unexpected line {line:?}");
            }
        }

        Ok(Commit {
            first_parent,
            second_parent,
            branch,
            timestamp,
            message: message.to_string(),
            tracked_files,
        })
    }
}

impl Persisted for Commit {
    fn record_kind(&self) -> RecordKind {
        RecordKind::Commit
    }
}
