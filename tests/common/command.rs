use crate::common::file::{FileSpec, write_file};
use crate::common::redirect_temp_dir;
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

pub const COMMIT_DATE: &str = "2023-01-01 12:00:00 +0000";

#[fixture]
pub fn repository_dir() -> TempDir {
    redirect_temp_dir();
    TempDir::new().expect("Failed to create temp dir")
}

#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_minigit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    repository_dir
}

/// Repository with `a.txt = "1"` committed on master
#[fixture]
pub fn committed_repository_dir(init_repository_dir: TempDir) -> TempDir {
    write_file(FileSpec::new(
        init_repository_dir.path().join("a.txt"),
        "1".to_string(),
    ));
    run_minigit_command(init_repository_dir.path(), &["add", "a.txt"])
        .assert()
        .success();
    minigit_commit(init_repository_dir.path(), "C1")
        .assert()
        .success();

    init_repository_dir
}

pub fn run_minigit_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("minigit").expect("Failed to find minigit binary");
    cmd.envs(vec![("NO_COLOR", "1"), ("MINIGIT_COMMIT_DATE", COMMIT_DATE)]);
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn minigit_commit(dir: &Path, message: &str) -> Command {
    run_minigit_command(dir, &["commit", "-m", message])
}

/// Write a file, stage it and commit it with `message` as the message
pub fn commit_file(dir: &Path, file: &str, content: &str, message: &str) {
    write_file(FileSpec::new(dir.join(file), content.to_string()));
    run_minigit_command(dir, &["add", file]).assert().success();
    minigit_commit(dir, message).assert().success();
}

/// Ids printed by `find` for a message
pub fn find_commits(dir: &Path, message: &str) -> Vec<String> {
    let output = run_minigit_command(dir, &["find", message])
        .output()
        .expect("Failed to run find");

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

/// Id of the only commit with the given message
pub fn commit_id(dir: &Path, message: &str) -> String {
    let ids = find_commits(dir, message);
    assert_eq!(ids.len(), 1, "expected exactly one commit with message {message}");
    ids[0].clone()
}

pub fn stdout_of(mut cmd: Command) -> String {
    let output = cmd.output().expect("Failed to run minigit");
    assert!(output.status.success(), "minigit failed: {:?}", output);
    String::from_utf8_lossy(&output.stdout).to_string()
}
