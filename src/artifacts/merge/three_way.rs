//! Three-way merge
//!
//! Reconciles the tracked files of the merge base, the current branch tip and
//! the other branch tip. Every file name present in any of the three snapshots
//! is classified on its own with [`FileResolution::classify`]; conflicting
//! files are replaced by a synthetic blob embedding both sides.
//!
//! The merge is pure: it reads blobs through the supplied reader and never
//! writes. Conflict blobs are returned so the caller can persist them before
//! recording the merge commit.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::merge::conflict::{FileResolution, render_conflict};
use crate::artifacts::objects::commit::TrackedFiles;
use crate::artifacts::objects::file_name::FileName;
use crate::artifacts::objects::object_id::ObjectId;
use bytes::Bytes;
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};

/// Result of a three-way merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Snapshot of the merge commit
    pub tracked_files: TrackedFiles,
    /// Synthetic conflict blobs by file name; each is referenced by
    /// `tracked_files` under its content hash
    pub conflicts: BTreeMap<FileName, Bytes>,
    /// Message of the merge commit
    pub message: String,
}

impl MergeOutcome {
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}

/// Commit message for a merge of `other` into `current`
pub fn merge_message(current: &BranchName, other: &BranchName, conflicted: bool) -> String {
    let mut message = format!("Merged {other} into {current}.");
    if conflicted {
        message.push_str(" Encountered a merge conflict.");
    }

    message
}

/// One side of a merge: a branch name and its tip snapshot
#[derive(Debug, Clone, Copy, new)]
pub struct MergeSide<'m> {
    pub branch: &'m BranchName,
    pub tracked_files: &'m TrackedFiles,
}

/// Three-way merge over an arbitrary blob source
///
/// # Type Parameters
///
/// * `BlobReaderFn` - Reads a stored version of a file. Only called for files
///   in conflict.
#[derive(new)]
pub struct ThreeWayMerge<'m, BlobReaderFn>
where
    BlobReaderFn: Fn(&FileName, &ObjectId) -> anyhow::Result<Bytes>,
{
    base: &'m TrackedFiles,
    current: MergeSide<'m>,
    other: MergeSide<'m>,
    blob_reader: BlobReaderFn,
}

impl<BlobReaderFn> ThreeWayMerge<'_, BlobReaderFn>
where
    BlobReaderFn: Fn(&FileName, &ObjectId) -> anyhow::Result<Bytes>,
{
    pub fn merge(&self) -> anyhow::Result<MergeOutcome> {
        let names = self
            .base
            .keys()
            .chain(self.current.tracked_files.keys())
            .chain(self.other.tracked_files.keys())
            .collect::<BTreeSet<_>>();

        let mut tracked_files = TrackedFiles::new();
        let mut conflicts = BTreeMap::new();

        for name in names {
            let base = self.base.get(name);
            let current = self.current.tracked_files.get(name);
            let other = self.other.tracked_files.get(name);

            let resolution = FileResolution::classify(base, current, other);
            debug_log!("{name}: {resolution:?}");

            let merged = match resolution {
                FileResolution::KeepCurrent => current.cloned(),
                FileResolution::TakeOther => other.cloned(),
                FileResolution::Conflict => {
                    let blob = render_conflict(
                        self.current.branch,
                        self.read_side(name, current)?.as_deref(),
                        self.other.branch,
                        self.read_side(name, other)?.as_deref(),
                    );
                    let oid = ObjectId::hash(&blob);
                    conflicts.insert(name.clone(), blob);

                    Some(oid)
                }
            };

            if let Some(oid) = merged {
                tracked_files.insert(name.clone(), oid);
            }
        }

        let message = merge_message(
            self.current.branch,
            self.other.branch,
            !conflicts.is_empty(),
        );

        Ok(MergeOutcome {
            tracked_files,
            conflicts,
            message,
        })
    }

    fn read_side(&self, name: &FileName, oid: Option<&ObjectId>) -> anyhow::Result<Option<Bytes>> {
        oid.map(|oid| (self.blob_reader)(name, oid)).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RepositoryError;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::collections::HashMap;

    /// Blob contents keyed by (file name, content hash)
    #[derive(Debug, Default)]
    struct InMemoryBlobStore {
        blobs: HashMap<(FileName, ObjectId), Bytes>,
    }

    impl InMemoryBlobStore {
        /// Store every file of a snapshot given as (name, content) pairs
        fn snapshot(&mut self, entries: &[(&str, &str)]) -> TrackedFiles {
            entries
                .iter()
                .map(|(file, content)| {
                    let oid = ObjectId::hash(content.as_bytes());
                    self.blobs.insert(
                        (name(file), oid.clone()),
                        Bytes::copy_from_slice(content.as_bytes()),
                    );
                    (name(file), oid)
                })
                .collect()
        }

        fn read(&self, name: &FileName, oid: &ObjectId) -> anyhow::Result<Bytes> {
            self.blobs
                .get(&(name.clone(), oid.clone()))
                .cloned()
                .ok_or_else(|| {
                    RepositoryError::ObjectNotFound {
                        name: name.clone(),
                        oid: oid.clone(),
                    }
                    .into()
                })
        }

        fn merge(
            &self,
            base: &TrackedFiles,
            current: &TrackedFiles,
            other: &TrackedFiles,
        ) -> anyhow::Result<MergeOutcome> {
            let master = BranchName::default_branch();
            let feature = BranchName::try_parse("feature".to_string())?;

            ThreeWayMerge::new(
                base,
                MergeSide::new(&master, current),
                MergeSide::new(&feature, other),
                |name: &FileName, oid: &ObjectId| self.read(name, oid),
            )
            .merge()
        }
    }

    fn name(value: &str) -> FileName {
        FileName::try_parse(value).unwrap()
    }

    #[test]
    fn diverging_edits_conflict_and_embed_both_sides() {
        // root -> C1 {a: 1}; master C2 {a: 3}; feature F1 {a: 2}
        let mut store = InMemoryBlobStore::default();
        let base = store.snapshot(&[("a.txt", "1")]);
        let current = store.snapshot(&[("a.txt", "3")]);
        let other = store.snapshot(&[("a.txt", "2")]);

        let outcome = store.merge(&base, &current, &other).unwrap();

        assert!(outcome.has_conflicts());
        let blob = String::from_utf8_lossy(&outcome.conflicts[&name("a.txt")]).to_string();
        assert!(blob.contains("3"));
        assert!(blob.contains("2"));
        assert!(blob.find("3") < blob.find("======="));
        assert_eq!(
            outcome.tracked_files[&name("a.txt")],
            ObjectId::hash(outcome.conflicts[&name("a.txt")].as_ref())
        );
        assert_eq!(
            outcome.message,
            "Merged feature into master. Encountered a merge conflict."
        );
    }

    #[test]
    fn additions_on_the_other_side_are_taken() {
        // root -> C1 {a: 1}; master C2 {a: 3}; feature adds b.txt only
        let mut store = InMemoryBlobStore::default();
        let base = store.snapshot(&[("a.txt", "1")]);
        let current = store.snapshot(&[("a.txt", "3")]);
        let other = store.snapshot(&[("a.txt", "1"), ("b.txt", "x")]);

        let outcome = store.merge(&base, &current, &other).unwrap();

        assert!(!outcome.has_conflicts());
        assert_eq!(
            outcome.tracked_files,
            store.snapshot(&[("a.txt", "3"), ("b.txt", "x")])
        );
        assert_eq!(outcome.message, "Merged feature into master.");
    }

    #[test]
    fn one_sided_removals_are_applied() {
        let mut store = InMemoryBlobStore::default();
        let base = store.snapshot(&[("a.txt", "1"), ("b.txt", "2")]);
        let current = store.snapshot(&[("b.txt", "2")]);
        let other = store.snapshot(&[("a.txt", "1")]);

        let outcome = store.merge(&base, &current, &other).unwrap();

        assert!(outcome.tracked_files.is_empty());
        assert!(!outcome.has_conflicts());
    }

    #[test]
    fn removal_against_modification_conflicts() {
        let mut store = InMemoryBlobStore::default();
        let base = store.snapshot(&[("a.txt", "1")]);
        let current = TrackedFiles::new();
        let other = store.snapshot(&[("a.txt", "changed")]);

        let outcome = store.merge(&base, &current, &other).unwrap();

        assert_eq!(
            String::from_utf8_lossy(&outcome.conflicts[&name("a.txt")]),
            "<<<<<<< current (master)\n=======\nchanged\n>>>>>>> other (feature)\n"
        );
    }

    #[test]
    fn missing_blobs_fail_the_merge() {
        let store = InMemoryBlobStore::default();
        let base = TrackedFiles::from([(name("a.txt"), ObjectId::hash(b"1"))]);
        let current = TrackedFiles::from([(name("a.txt"), ObjectId::hash(b"2"))]);
        let other = TrackedFiles::from([(name("a.txt"), ObjectId::hash(b"3"))]);

        let error = store.merge(&base, &current, &other).unwrap_err();

        assert!(matches!(
            RepositoryError::of(&error),
            Some(RepositoryError::ObjectNotFound { .. })
        ));
    }

    proptest! {
        #[test]
        fn merging_identical_snapshots_changes_nothing(
            files in prop::collection::btree_map("[a-z]{1,8}\\.txt", "[a-z0-9]{0,16}", 0..8)
        ) {
            let mut store = InMemoryBlobStore::default();
            let entries = files
                .iter()
                .map(|(file, content)| (file.as_str(), content.as_str()))
                .collect::<Vec<_>>();
            let base = store.snapshot(&entries);

            let outcome = store.merge(&base, &base, &base).unwrap();

            prop_assert_eq!(&outcome.tracked_files, &base);
            prop_assert!(!outcome.has_conflicts());
        }
    }
}
