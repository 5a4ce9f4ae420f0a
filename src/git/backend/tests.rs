// ripple-rs: Git commit propagation and branch refresh
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{GitMutation, GitQuery, GixBackend, ShellBackend};
use crate::error::GitError;
use crate::git::fixture::{commit_file, git, head, init_repo, tip};
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

#[test]
fn test_gix_backend_is_git_repo() {
    let temp = temp_dir();
    assert!(!GixBackend::is_git_repo(temp.path()));

    gix::init(temp.path()).expect("failed to init repo");
    assert!(GixBackend::is_git_repo(temp.path()));
}

#[test]
fn test_bare_repository_is_not_a_work_tree() {
    let temp = temp_dir();
    gix::init_bare(temp.path()).expect("failed to init bare repo");

    assert!(!GixBackend::is_git_repo(temp.path()));
    assert!(GixBackend::work_tree(temp.path()).is_err());
}

#[test]
fn test_work_tree_from_subdirectory() {
    let temp = temp_dir();
    init_repo(temp.path());
    let nested = temp.path().join("a").join("b");
    std::fs::create_dir_all(&nested).expect("failed to create nested dir");

    let root = GixBackend::work_tree(&nested).expect("work tree");
    assert_eq!(
        root.canonicalize().expect("canonical root"),
        temp.path().canonicalize().expect("canonical temp")
    );
}

#[test]
fn test_current_branch_and_detached_head() {
    let temp = temp_dir();
    init_repo(temp.path());

    assert_eq!(
        GixBackend::current_branch(temp.path()).expect("branch").as_deref(),
        Some("main")
    );

    let id = head(temp.path());
    ShellBackend::checkout_detached(temp.path(), &id).expect("detach");
    assert_eq!(GixBackend::current_branch(temp.path()).expect("branch"), None);
}

#[test]
fn test_uncommitted_changes_include_untracked() {
    let temp = temp_dir();
    init_repo(temp.path());
    assert!(!GixBackend::has_uncommitted_changes(temp.path()).expect("status"));

    std::fs::write(temp.path().join("scratch.txt"), "x").expect("write");
    assert!(GixBackend::has_uncommitted_changes(temp.path()).expect("status"));
}

#[test]
fn test_gix_agrees_with_git_cli() {
    let temp = temp_dir();
    init_repo(temp.path());
    git(temp.path(), &["checkout", "--quiet", "-b", "topic"]);

    assert_eq!(
        GixBackend::current_branch(temp.path()).expect("gix"),
        Some(git(temp.path(), &["symbolic-ref", "--short", "HEAD"]))
    );
    assert_eq!(
        GixBackend::work_tree(temp.path()).expect("gix").canonicalize().expect("canonical"),
        std::path::PathBuf::from(git(temp.path(), &["rev-parse", "--show-toplevel"]))
            .canonicalize()
            .expect("canonical")
    );
}

#[test]
fn test_cherry_pick_conflict_reports_files() {
    let temp = temp_dir();
    let repo = temp.path();
    init_repo(repo);
    git(repo, &["checkout", "--quiet", "-b", "other"]);
    commit_file(repo, "README.md", "other side\n", "other edit");
    git(repo, &["checkout", "--quiet", "main"]);
    let theirs = commit_file(repo, "README.md", "main side\n", "main edit");
    git(repo, &["checkout", "--quiet", "other"]);

    let err = ShellBackend::cherry_pick(repo, &theirs, None).expect_err("should conflict");
    match err.as_git() {
        Some(GitError::CherryPickConflict { files, .. }) => {
            assert_eq!(files, &vec!["README.md".to_string()]);
        }
        other => panic!("expected conflict, got {other:?}"),
    }

    ShellBackend::abort_cherry_pick(repo).expect("abort");
    assert!(!GixBackend::has_uncommitted_changes(repo).expect("status"));
}

#[test]
fn test_cherry_pick_unknown_commit_is_not_a_conflict() {
    let temp = temp_dir();
    init_repo(temp.path());

    let err = ShellBackend::cherry_pick(temp.path(), "0123456789abcdef", None)
        .expect_err("unknown commit");
    assert_eq!(err.tag(), "cherry-pick-failed");
}

#[test]
fn test_update_ref_is_compare_and_swap() {
    let temp = temp_dir();
    let repo = temp.path();
    init_repo(repo);
    let base = head(repo);
    git(repo, &["branch", "side"]);
    let newer = commit_file(repo, "a.txt", "a\n", "a");

    ShellBackend::update_ref(repo, "refs/heads/side", &newer, &base).expect("cas");
    assert_eq!(tip(repo, "side"), newer);

    // Stale expectation must be refused.
    let result = ShellBackend::update_ref(repo, "refs/heads/side", &base, &base);
    assert!(result.is_err());
    assert_eq!(tip(repo, "side"), newer);
}

#[test]
fn test_checkout_missing_branch_fails_with_checkout_error() {
    let temp = temp_dir();
    init_repo(temp.path());

    let err = ShellBackend::checkout(temp.path(), "nope").expect_err("missing");
    assert_eq!(err.tag(), "checkout-failed");
}
