use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

mod common;

use common::command::{
    commit_file, commit_id, committed_repository_dir, run_minigit_command, stdout_of,
};
use common::file::{FileSpec, read_file, write_file};

#[rstest]
fn checkout_file_restores_the_head_version(committed_repository_dir: TempDir) {
    let dir = committed_repository_dir.path();
    write_file(FileSpec::new(dir.join("a.txt"), "scratch".to_string()));

    run_minigit_command(dir, &["checkout", "--", "a.txt"])
        .assert()
        .success();

    assert_eq!(read_file(&dir.join("a.txt")), "1");
    assert!(
        stdout_of(run_minigit_command(dir, &["status"])).contains("=== Staged Files ===\n\n")
    );
}

#[rstest]
fn checkout_file_at_accepts_abbreviated_ids(committed_repository_dir: TempDir) {
    let dir = committed_repository_dir.path();
    commit_file(dir, "a.txt", "2", "C2");
    let first = commit_id(dir, "C1");

    run_minigit_command(dir, &["checkout", &first[..6], "--", "a.txt"])
        .assert()
        .success();

    assert_eq!(read_file(&dir.join("a.txt")), "1");
}

#[rstest]
fn checkout_file_missing_from_the_commit_fails(committed_repository_dir: TempDir) {
    run_minigit_command(committed_repository_dir.path(), &["checkout", "--", "b.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("file b.txt does not exist in commit"));
}

#[rstest]
fn checkout_file_from_an_unknown_commit_fails(committed_repository_dir: TempDir) {
    run_minigit_command(
        committed_repository_dir.path(),
        &["checkout", "0000000", "--", "a.txt"],
    )
    .assert()
    .failure()
    .stderr(predicate::str::contains("no commit with id 0000000 exists"));
}

#[rstest]
fn checkout_branch_rewrites_the_working_directory(committed_repository_dir: TempDir) {
    let dir = committed_repository_dir.path();
    run_minigit_command(dir, &["branch", "feature"])
        .assert()
        .success();
    commit_file(dir, "b.txt", "master only", "C2");
    commit_file(dir, "a.txt", "master", "C3");

    run_minigit_command(dir, &["checkout", "feature"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Switched to branch 'feature'"));

    assert_eq!(read_file(&dir.join("a.txt")), "1");
    assert!(!dir.join("b.txt").exists());
    assert!(stdout_of(run_minigit_command(dir, &["status"])).contains("*feature\nmaster\n"));

    run_minigit_command(dir, &["checkout", "master"])
        .assert()
        .success();

    assert_eq!(read_file(&dir.join("a.txt")), "master");
    assert_eq!(read_file(&dir.join("b.txt")), "master only");
}

#[rstest]
fn checkout_branch_refuses_to_overwrite_untracked_files(committed_repository_dir: TempDir) {
    let dir = committed_repository_dir.path();
    run_minigit_command(dir, &["branch", "feature"])
        .assert()
        .success();
    run_minigit_command(dir, &["checkout", "feature"])
        .assert()
        .success();
    commit_file(dir, "b.txt", "feature", "F1");
    run_minigit_command(dir, &["checkout", "master"])
        .assert()
        .success();
    write_file(FileSpec::new(dir.join("b.txt"), "precious".to_string()));

    run_minigit_command(dir, &["checkout", "feature"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "untracked working file b.txt would be overwritten",
        ));

    assert_eq!(read_file(&dir.join("b.txt")), "precious");
    assert!(stdout_of(run_minigit_command(dir, &["status"])).contains("*master\n"));
}

#[rstest]
fn checkout_branch_clears_the_staging_area(committed_repository_dir: TempDir) {
    let dir = committed_repository_dir.path();
    run_minigit_command(dir, &["branch", "feature"])
        .assert()
        .success();
    write_file(FileSpec::new(dir.join("a.txt"), "staged".to_string()));
    run_minigit_command(dir, &["add", "a.txt"]).assert().success();

    run_minigit_command(dir, &["checkout", "feature"])
        .assert()
        .success();

    assert_eq!(read_file(&dir.join("a.txt")), "1");
    assert!(
        stdout_of(run_minigit_command(dir, &["status"])).contains("=== Staged Files ===\n\n")
    );
}

#[rstest]
fn checkout_of_the_current_branch_changes_nothing(committed_repository_dir: TempDir) {
    let dir = committed_repository_dir.path();
    write_file(FileSpec::new(dir.join("a.txt"), "edited".to_string()));

    run_minigit_command(dir, &["checkout", "master"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Already on 'master'"));

    assert_eq!(read_file(&dir.join("a.txt")), "edited");
}

#[rstest]
fn checkout_of_an_unknown_branch_fails(committed_repository_dir: TempDir) {
    run_minigit_command(committed_repository_dir.path(), &["checkout", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("a branch with name nope does not exist"));
}

#[rstest]
fn reset_moves_the_branch_and_the_working_directory(committed_repository_dir: TempDir) {
    let dir = committed_repository_dir.path();
    commit_file(dir, "b.txt", "b", "C2");
    let first = commit_id(dir, "C1");

    run_minigit_command(dir, &["reset", &first]).assert().success();

    assert!(!dir.join("b.txt").exists());
    assert_eq!(read_file(&dir.join("a.txt")), "1");
    let log = stdout_of(run_minigit_command(dir, &["log"]));
    assert!(log.starts_with(&format!("===\ncommit {first}\n")));
    assert!(!log.contains("C2"));
}

#[rstest]
fn reset_refuses_to_overwrite_untracked_files(committed_repository_dir: TempDir) {
    let dir = committed_repository_dir.path();
    commit_file(dir, "b.txt", "b", "C2");
    let second = commit_id(dir, "C2");
    run_minigit_command(dir, &["rm", "b.txt"]).assert().success();
    commit_file(dir, "a.txt", "3", "C3");
    write_file(FileSpec::new(dir.join("b.txt"), "untracked".to_string()));

    run_minigit_command(dir, &["reset", &second])
        .assert()
        .failure()
        .stderr(predicate::str::contains("untracked working file b.txt"));

    assert_eq!(read_file(&dir.join("b.txt")), "untracked");
}

#[rstest]
fn reset_to_an_unknown_commit_fails(committed_repository_dir: TempDir) {
    run_minigit_command(committed_repository_dir.path(), &["reset", "abcdef"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no commit with id abcdef exists"));
}
