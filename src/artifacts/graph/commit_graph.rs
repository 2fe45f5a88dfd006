use crate::areas::commits::CommitStore;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::graph::merge_base::MergeBaseFinder;
use crate::artifacts::objects::commit::{Commit, TrackedFiles};
use crate::artifacts::objects::file_name::FileName;
use crate::artifacts::objects::object_id::ObjectId;
use chrono::{DateTime, FixedOffset};
use std::collections::BTreeSet;

/// Source of commits for graph traversal
pub trait CommitLoader {
    fn load_commit(&self, oid: &ObjectId) -> anyhow::Result<Commit>;
}

impl CommitLoader for CommitStore {
    fn load_commit(&self, oid: &ObjectId) -> anyhow::Result<Commit> {
        self.load(oid)
    }
}

/// Snapshot of a new commit: the parent's files minus removals, plus additions
///
/// Staged additions override parent entries with the same name.
pub fn next_snapshot(
    parent_files: &TrackedFiles,
    staged_adds: &TrackedFiles,
    staged_removals: &BTreeSet<FileName>,
) -> TrackedFiles {
    let mut tracked_files = parent_files
        .iter()
        .filter(|(name, _)| !staged_removals.contains(*name))
        .map(|(name, oid)| (name.clone(), oid.clone()))
        .collect::<TrackedFiles>();

    tracked_files.extend(
        staged_adds
            .iter()
            .map(|(name, oid)| (name.clone(), oid.clone())),
    );

    tracked_files
}

/// Read-only view of the commit history
#[derive(Debug)]
pub struct CommitGraph<'l, L: CommitLoader> {
    loader: &'l L,
}

impl<'l, L: CommitLoader> CommitGraph<'l, L> {
    pub fn new(loader: &'l L) -> Self {
        CommitGraph { loader }
    }

    pub fn create_root(&self, branch: BranchName) -> Commit {
        Commit::root(branch)
    }

    /// Build (but do not persist) a child of `parent`
    pub fn create_commit(
        &self,
        parent: &ObjectId,
        branch: BranchName,
        message: String,
        staged_adds: &TrackedFiles,
        staged_removals: &BTreeSet<FileName>,
        timestamp: DateTime<FixedOffset>,
    ) -> anyhow::Result<Commit> {
        let parent_commit = self.loader.load_commit(parent)?;
        let tracked_files = next_snapshot(
            parent_commit.tracked_files(),
            staged_adds,
            staged_removals,
        );

        Ok(Commit::new(
            parent.clone(),
            branch,
            message,
            tracked_files,
            timestamp,
        ))
    }

    /// First-parent history starting at `oid`, newest first, ending at the root
    pub fn ancestor_chain(&self, oid: &ObjectId) -> AncestorChain<'l, L> {
        AncestorChain {
            loader: self.loader,
            next: Some(oid.clone()),
        }
    }

    /// See [`MergeBaseFinder`] for the first-parent limitation
    pub fn find_merge_base(&self, a: &ObjectId, b: &ObjectId) -> anyhow::Result<ObjectId> {
        let finder = MergeBaseFinder::new(|oid: &ObjectId| {
            self.loader
                .load_commit(oid)
                .map(|commit| commit.slim(oid.clone()))
        });

        finder.find_merge_base(a, b)
    }
}

/// Iterator over a first-parent chain
///
/// Stops after the root commit, or after the first loading error.
pub struct AncestorChain<'l, L: CommitLoader> {
    loader: &'l L,
    next: Option<ObjectId>,
}

impl<L: CommitLoader> Iterator for AncestorChain<'_, L> {
    type Item = anyhow::Result<(ObjectId, Commit)>;

    fn next(&mut self) -> Option<Self::Item> {
        let oid = self.next.take()?;

        match self.loader.load_commit(&oid) {
            Ok(commit) => {
                self.next = commit.first_parent().cloned();
                Some(Ok((oid, commit)))
            }
            Err(error) => Some(Err(error)),
        }
    }
}
