use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::file_name::FileName;
use colored::Colorize;
use derive_new::new;
use std::collections::BTreeSet;

/// Snapshot of what `status` reports, every list sorted
//
// Terminology:
// - staged files: files with a version in the staging area
// - removed files: files staged for removal
// - untracked files: working files that are neither staged nor tracked by
//   HEAD, or tracked but staged for removal
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct StatusReport {
    pub current_branch: BranchName,
    pub branches: Vec<BranchName>,
    pub staged: BTreeSet<FileName>,
    pub removed: BTreeSet<FileName>,
    pub untracked: BTreeSet<FileName>,
}

impl Repository {
    pub fn status(&self) -> anyhow::Result<StatusReport> {
        self.ensure_initialized()?;

        let state = self.state().load()?;
        let (_, head) = self.head_commit()?;
        let staged = self.index().entries()?.into_keys().collect::<BTreeSet<_>>();
        let removed = state.staged_removals().clone();

        let untracked = self
            .workspace()
            .list_files()?
            .into_iter()
            .filter(|name| !staged.contains(name))
            .filter(|name| head.lookup(name).is_none() || removed.contains(name))
            .collect();

        let report = StatusReport::new(
            state.current_branch().clone(),
            state.branches().keys().cloned().collect(),
            staged,
            removed,
            untracked,
        );

        self.show_status(&report)?;

        Ok(report)
    }

    fn show_status(&self, report: &StatusReport) -> anyhow::Result<()> {
        writeln!(self.writer(), "{}", "=== Branches ===".bold())?;
        for branch in &report.branches {
            if branch == &report.current_branch {
                writeln!(self.writer(), "{}", format!("*{branch}").green())?;
            } else {
                writeln!(self.writer(), "{branch}")?;
            }
        }

        self.show_section("=== Staged Files ===", &report.staged)?;
        self.show_section("=== Removed Files ===", &report.removed)?;
        self.show_section("=== Untracked Files ===", &report.untracked)?;

        Ok(())
    }

    fn show_section(&self, header: &str, files: &BTreeSet<FileName>) -> anyhow::Result<()> {
        writeln!(self.writer())?;
        writeln!(self.writer(), "{}", header.bold())?;
        for file in files {
            writeln!(self.writer(), "{file}")?;
        }

        Ok(())
    }
}
