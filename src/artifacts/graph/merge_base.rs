//! Merge base search
//!
//! Finds the split point of two branch tips by walking both first-parent
//! chains in lock-step:
//!
//! 1. Seed a visited set with both tips
//! 2. Each round, advance the source frontier one first-parent hop; if the hop
//!    lands on a visited commit, that commit is the merge base
//! 3. Otherwise record it and advance the target frontier the same way
//! 4. When both frontiers have run past their root commits without a hit, the
//!    histories are disjoint
//!
//! ## Limitation
//!
//! Only first-parent links are followed. Second parents of merge commits are
//! never walked, so once a branch has been merged before, the base found for a
//! later merge may be an older common ancestor than the nearest one:
//!
//! ```text
//! R - A - B ------ M      (master, M merges F1)
//!      \          /
//!       F1 ------+- F2    (feature)
//! ```
//!
//! Merging `feature` into `master` yields `A`, not `F1`.
//!
//! ## Debug Logging
//!
//! Each hop is printed to stderr when built with the `debug_merge` feature.

use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;
use std::collections::HashSet;

/// One side of the lock-step walk
#[derive(Debug)]
struct Frontier {
    #[cfg(feature = "debug_merge")]
    label: &'static str,
    commit: SlimCommit,
}

impl Frontier {
    fn exhausted(&self) -> bool {
        self.commit.first_parent.is_none()
    }
}

/// Merge base finder over an arbitrary commit source
///
/// # Type Parameters
///
/// * `CommitLoaderFn` - Loads the slim form of a commit by id. Loading errors
///   abort the search and are returned unchanged.
pub struct MergeBaseFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    commit_loader: CommitLoaderFn,
}

impl<CommitLoaderFn> MergeBaseFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    /// # Example
    ///
    /// ```rust,ignore
    /// let finder = MergeBaseFinder::new(|oid| {
    ///     commits.load(oid).map(|commit| commit.slim(oid.clone()))
    /// });
    /// ```
    pub fn new(commit_loader: CommitLoaderFn) -> Self {
        Self { commit_loader }
    }

    /// Find the merge base of `source` and `target`
    ///
    /// # Errors
    ///
    /// * `SameBranch` if both ids are equal
    /// * `NoCommonAncestor` if the first-parent chains never meet
    pub fn find_merge_base(
        &self,
        source: &ObjectId,
        target: &ObjectId,
    ) -> anyhow::Result<ObjectId> {
        if source == target {
            return Err(RepositoryError::SameBranch.into());
        }

        let mut visited = HashSet::from([source.clone(), target.clone()]);
        let mut frontiers = [
            Frontier {
                #[cfg(feature = "debug_merge")]
                label: "source",
                commit: (self.commit_loader)(source)?,
            },
            Frontier {
                #[cfg(feature = "debug_merge")]
                label: "target",
                commit: (self.commit_loader)(target)?,
            },
        ];

        while !frontiers.iter().all(Frontier::exhausted) {
            for frontier in frontiers.iter_mut() {
                let Some(parent) = frontier.commit.first_parent.clone() else {
                    continue;
                };

                debug_log!(
                    "{} steps {} -> {}",
                    frontier.label,
                    frontier.commit.oid,
                    parent
                );

                if !visited.insert(parent.clone()) {
                    debug_log!("{} reached visited commit {}", frontier.label, parent);
                    return Ok(parent);
                }

                frontier.commit = (self.commit_loader)(&parent)?;
            }
        }

        debug_log!("no common ancestor between {} and {}", source, target);
        Err(RepositoryError::NoCommonAncestor.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;
    use std::collections::HashMap;

    /// First-parent links keyed by commit id
    #[derive(Debug, Default)]
    struct InMemoryCommitStore {
        parents: HashMap<ObjectId, Option<ObjectId>>,
    }

    impl InMemoryCommitStore {
        fn add(&mut self, oid: &ObjectId, first_parent: Option<&ObjectId>) {
            self.parents.insert(oid.clone(), first_parent.cloned());
        }

        fn load(&self, oid: &ObjectId) -> anyhow::Result<SlimCommit> {
            let first_parent = self
                .parents
                .get(oid)
                .cloned()
                .ok_or_else(|| RepositoryError::UnknownCommit(oid.to_string()))?;

            Ok(SlimCommit {
                oid: oid.clone(),
                first_parent,
            })
        }

        fn find_merge_base(&self, a: &ObjectId, b: &ObjectId) -> anyhow::Result<ObjectId> {
            MergeBaseFinder::new(|oid| self.load(oid)).find_merge_base(a, b)
        }
    }

    fn create_oid(label: &str) -> ObjectId {
        ObjectId::hash(label.as_bytes())
    }

    /// Builds a linear chain of commits and returns their ids, oldest first
    fn chain(store: &mut InMemoryCommitStore, from: Option<&ObjectId>, labels: &[&str]) -> Vec<ObjectId> {
        let mut parent = from.cloned();
        let mut ids = vec![];

        for label in labels {
            let oid = create_oid(label);
            store.add(&oid, parent.as_ref());
            parent = Some(oid.clone());
            ids.push(oid);
        }

        ids
    }

    fn error_of(result: anyhow::Result<ObjectId>) -> RepositoryError {
        let error = result.unwrap_err();
        RepositoryError::of(&error).cloned().unwrap()
    }

    #[test]
    fn diverged_branches_meet_at_the_split_point() {
        //     R - C1 - C2   (master)
        //          \
        //           F1      (feature)
        let mut store = InMemoryCommitStore::default();
        let master = chain(&mut store, None, &["R", "C1", "C2"]);
        let feature = chain(&mut store, Some(&master[1]), &["F1"]);

        assert_eq!(
            store.find_merge_base(&master[2], &feature[0]).unwrap(),
            master[1]
        );
        assert_eq!(
            store.find_merge_base(&feature[0], &master[2]).unwrap(),
            master[1]
        );
    }

    #[rstest]
    #[case::target_is_parent(3, 2)]
    #[case::target_is_distant_ancestor(4, 0)]
    #[case::source_is_ancestor(1, 4)]
    fn linear_history_yields_the_older_commit(#[case] source: usize, #[case] target: usize) {
        let mut store = InMemoryCommitStore::default();
        let ids = chain(&mut store, None, &["R", "A", "B", "C", "D"]);

        let base = store.find_merge_base(&ids[source], &ids[target]).unwrap();

        assert_eq!(base, ids[source.min(target)]);
    }

    #[test]
    fn uneven_branch_lengths_still_meet() {
        // R - A - B - C - D   (source)
        //      \
        //       E             (target)
        let mut store = InMemoryCommitStore::default();
        let main = chain(&mut store, None, &["R", "A", "B", "C", "D"]);
        let side = chain(&mut store, Some(&main[1]), &["E"]);

        assert_eq!(store.find_merge_base(&main[4], &side[0]).unwrap(), main[1]);
    }

    #[test]
    fn prior_merges_are_not_followed_through_second_parents() {
        // R - A - B ----- M     (master, M merged F1 in)
        //      \         /
        //       F1 -----+- F2   (feature)
        //
        // The nearest common ancestor is F1, but only first parents are walked.
        let mut store = InMemoryCommitStore::default();
        let master = chain(&mut store, None, &["R", "A", "B", "M"]);
        let feature = chain(&mut store, Some(&master[1]), &["F1", "F2"]);

        let base = store.find_merge_base(&master[3], &feature[1]).unwrap();

        assert_eq!(base, master[1]);
        assert_ne!(base, feature[0]);
    }

    #[test]
    fn disjoint_histories_have_no_common_ancestor() {
        let mut store = InMemoryCommitStore::default();
        let left = chain(&mut store, None, &["R1", "X"]);
        let right = chain(&mut store, None, &["R2", "Y", "Z"]);

        assert_eq!(
            error_of(store.find_merge_base(&left[1], &right[2])),
            RepositoryError::NoCommonAncestor
        );
    }

    #[test]
    fn missing_commits_abort_the_search() {
        let mut store = InMemoryCommitStore::default();
        let ids = chain(&mut store, None, &["R", "A"]);
        store.add(&create_oid("orphan"), Some(&create_oid("gone")));

        assert!(matches!(
            error_of(store.find_merge_base(&create_oid("orphan"), &ids[1])),
            RepositoryError::UnknownCommit(_)
        ));
    }

    proptest! {
        #[test]
        fn a_commit_merged_with_itself_is_rejected(depth in 1usize..8, pick in 0usize..8) {
            let mut store = InMemoryCommitStore::default();
            let labels = (0..depth).map(|i| format!("c{i}")).collect::<Vec<_>>();
            let labels = labels.iter().map(String::as_str).collect::<Vec<_>>();
            let ids = chain(&mut store, None, &labels);
            let oid = &ids[pick % depth];

            prop_assert_eq!(
                error_of(store.find_merge_base(oid, oid)),
                RepositoryError::SameBranch
            );
        }
    }
}
