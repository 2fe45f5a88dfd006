//! Repository state record
//!
//! ## Format
//!
//! ```text
//! state v1 <size>\0
//! head <commit-sha>
//! current <branch>
//! branch <commit-sha> <name>
//! removed <file-name>
//! ```
//!
//! `branch` lines are written in name order and there is at least one of them;
//! `removed` lines are optional and sorted.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::file_name::FileName;
use crate::artifacts::objects::object::{Packable, Persisted, Unpackable, frame};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::record_kind::RecordKind;
use crate::errors::RepositoryError;
use anyhow::Context;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};
use std::io::BufRead;

/// HEAD, branch table and staged removals
///
/// Transitions are in-memory; the state store persists the whole record after
/// a transition succeeds, so a failed transition never reaches disk.
///
/// Invariants:
/// - `current_branch` is always a key of `branches`
/// - `branches[current_branch] == head` after every transition that moves HEAD
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryState {
    head: ObjectId,
    current_branch: BranchName,
    branches: BTreeMap<BranchName, ObjectId>,
    staged_removals: BTreeSet<FileName>,
}

impl RepositoryState {
    /// State of a freshly initialised repository: one branch at the root
    pub fn initialize(root: ObjectId, default_branch: BranchName) -> Self {
        let mut branches = BTreeMap::new();
        branches.insert(default_branch.clone(), root.clone());

        RepositoryState {
            head: root,
            current_branch: default_branch,
            branches,
            staged_removals: BTreeSet::new(),
        }
    }

    pub fn head(&self) -> &ObjectId {
        &self.head
    }

    pub fn current_branch(&self) -> &BranchName {
        &self.current_branch
    }

    pub fn branches(&self) -> &BTreeMap<BranchName, ObjectId> {
        &self.branches
    }

    pub fn branch_tip(&self, name: &BranchName) -> Option<&ObjectId> {
        self.branches.get(name)
    }

    pub fn staged_removals(&self) -> &BTreeSet<FileName> {
        &self.staged_removals
    }

    /// Move HEAD and the current branch pointer to `oid`
    pub fn set_head(&mut self, oid: ObjectId) {
        self.branches
            .insert(self.current_branch.clone(), oid.clone());
        self.head = oid;
    }

    /// Make `name` the current branch and HEAD its tip
    pub fn switch_branch(&mut self, name: &BranchName) -> anyhow::Result<()> {
        let tip = self
            .branches
            .get(name)
            .cloned()
            .ok_or_else(|| RepositoryError::UnknownBranch(name.clone()))?;

        self.current_branch = name.clone();
        self.head = tip;

        Ok(())
    }

    /// Point `name` at HEAD
    ///
    /// An existing branch with the same name is moved, not rejected.
    pub fn add_branch(&mut self, name: BranchName) {
        self.branches.insert(name, self.head.clone());
    }

    pub fn remove_branch(&mut self, name: &BranchName) -> anyhow::Result<()> {
        if !self.branches.contains_key(name) {
            return Err(RepositoryError::UnknownBranch(name.clone()).into());
        }
        if name == &self.current_branch {
            return Err(RepositoryError::CurrentBranch(name.clone()).into());
        }

        self.branches.remove(name);

        Ok(())
    }

    pub fn stage_removal(&mut self, name: FileName) {
        self.staged_removals.insert(name);
    }

    /// Cancel a pending removal; returns whether one was pending
    pub fn unstage_removal(&mut self, name: &FileName) -> bool {
        self.staged_removals.remove(name)
    }

    pub fn clear_staged_removals(&mut self) {
        self.staged_removals.clear();
    }
}

impl Packable for RepositoryState {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut lines = vec![];

        lines.push(format!("head {}", self.head));
        lines.push(format!("current {}", self.current_branch));
        for (name, oid) in &self.branches {
            lines.push(format!("branch {oid} {name}"));
        }
        for name in &self.staged_removals {
            lines.push(format!("removed {name}"));
        }

        let mut body = lines.join("\n");
        body.push('\n');

        Ok(frame(RecordKind::State, body.as_bytes()))
    }
}

impl Unpackable for RepositoryState {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let mut lines = reader.lines();

        let head = lines
            .next()
            .transpose()?
            .context("Invalid state record: missing head line")?;
        let head = head
            .strip_prefix("head ")
            .context("Invalid state record: invalid head line")?;
        let head = ObjectId::try_parse(head.to_string())?;

        let current = lines
            .next()
            .transpose()?
            .context("Invalid state record: missing current branch line")?;
        let current = current
            .strip_prefix("current ")
            .context("Invalid state record: invalid current branch line")?;
        let current_branch = BranchName::try_parse(current.to_string())?;

        let mut branches = BTreeMap::new();
        let mut staged_removals = BTreeSet::new();

        for line in lines {
            let line = line?;

            if let Some(entry) = line.strip_prefix("branch ") {
                let (oid, name) = entry
                    .split_once(' ')
                    .context("Invalid state record: malformed branch line")?;
                branches.insert(
                    BranchName::try_parse(name.to_string())?,
                    ObjectId::try_parse(oid.to_string())?,
                );
            } else if let Some(name) = line.strip_prefix("removed ") {
                staged_removals.insert(FileName::try_parse(name)?);
            } else if !line.is_empty() {
                anyhow::bail!("Invalid state record: unexpected line {line:?}");
            }
        }

        if !branches.contains_key(&current_branch) {
            anyhow::bail!(
                "Invalid state record: current branch {} has no entry",
                current_branch
            );
        }

        Ok(RepositoryState {
            head,
            current_branch,
            branches,
            staged_removals,
        })
    }
}

impl Persisted for RepositoryState {
    fn record_kind(&self) -> RecordKind {
        RecordKind::State
    }
}
