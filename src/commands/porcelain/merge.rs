use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::merge::three_way::{MergeSide, ThreeWayMerge};
use crate::artifacts::objects::commit::{Commit, load_timestamp_from_env};
use crate::artifacts::objects::file_name::FileName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;
use std::collections::BTreeSet;

/// What a merge did to the current branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeReport {
    /// The other branch is already part of the current history
    AlreadyUpToDate,
    /// The current branch moved to the other tip without a new commit
    FastForward(ObjectId),
    /// A merge commit was recorded; `conflicts` lists the files holding
    /// conflict markers
    Merged {
        oid: ObjectId,
        conflicts: BTreeSet<FileName>,
    },
}

impl Repository {
    /// Merge `branch` into the current branch
    ///
    /// Refuses while additions or removals are staged. Every merged blob and
    /// the merge commit are stored before the working directory is rewritten
    /// and HEAD moves.
    pub fn merge(&self, branch: &str) -> anyhow::Result<MergeReport> {
        self.ensure_initialized()?;

        let other_branch = BranchName::try_parse(branch.to_string())?;
        let state = self.state().load()?;
        let current_branch = state.current_branch().clone();

        let other_tip = state
            .branch_tip(&other_branch)
            .cloned()
            .ok_or_else(|| RepositoryError::UnknownBranch(other_branch.clone()))?;
        if other_branch == current_branch {
            return Err(RepositoryError::SameBranch.into());
        }

        if !self.index().is_empty()? || !state.staged_removals().is_empty() {
            return Err(RepositoryError::UncommittedChanges.into());
        }

        let head = state.head().clone();
        if head == other_tip {
            writeln!(self.writer(), "Already up to date.")?;
            return Ok(MergeReport::AlreadyUpToDate);
        }

        let graph = self.commit_graph();
        let base = graph.find_merge_base(&head, &other_tip)?;
        let current = self.commits().load(&head)?;
        let other = self.commits().load(&other_tip)?;

        if base == other_tip {
            writeln!(self.writer(), "Given branch is an ancestor of the current branch.")?;
            return Ok(MergeReport::AlreadyUpToDate);
        }

        if base == head {
            self.rewrite_working_tree(current.tracked_files(), other.tracked_files())?;
            self.state().set_head(other_tip.clone())?;

            writeln!(self.writer(), "Current branch fast-forwarded.")?;
            return Ok(MergeReport::FastForward(other_tip));
        }

        let base_commit = self.commits().load(&base)?;
        let outcome = ThreeWayMerge::new(
            base_commit.tracked_files(),
            MergeSide::new(&current_branch, current.tracked_files()),
            MergeSide::new(&other_branch, other.tracked_files()),
            |name: &FileName, oid: &ObjectId| self.database().get(name, oid),
        )
        .merge()?;

        self.ensure_no_untracked_overwrite(current.tracked_files(), &outcome.tracked_files)?;

        for (name, blob) in &outcome.conflicts {
            self.database().put(name, blob)?;
        }

        let merge_commit = Commit::new_merge(
            head,
            other_tip,
            current_branch,
            outcome.message.clone(),
            outcome.tracked_files.clone(),
            load_timestamp_from_env(),
        );
        let merge_oid = self.commits().store(&merge_commit)?;

        self.rewrite_working_tree(current.tracked_files(), merge_commit.tracked_files())?;
        self.state().set_head(merge_oid.clone())?;

        if outcome.has_conflicts() {
            writeln!(self.writer(), "Encountered a merge conflict.")?;
        }
        writeln!(
            self.writer(),
            "[{} {}] {}",
            merge_commit.branch(),
            merge_oid.to_short_oid(),
            merge_commit.message()
        )?;

        Ok(MergeReport::Merged {
            oid: merge_oid,
            conflicts: outcome.conflicts.into_keys().collect(),
        })
    }
}
