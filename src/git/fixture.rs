// ripple-rs: Git commit propagation and branch refresh
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Throwaway repositories for unit tests.
//!
//! Uses shell git so fixtures do not depend on the code under test.

use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Run git in `cwd`, panicking with stderr on failure. Returns trimmed stdout.
pub fn git(cwd: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .env("GIT_AUTHOR_NAME", "Test")
        .env("GIT_AUTHOR_EMAIL", "test@example.com")
        .env("GIT_COMMITTER_NAME", "Test")
        .env("GIT_COMMITTER_EMAIL", "test@example.com")
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {} failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn configure(path: &Path) {
    git(path, &["config", "user.email", "test@example.com"]);
    git(path, &["config", "user.name", "Test"]);
    git(path, &["config", "commit.gpgsign", "false"]);
}

/// Initialise a repository on `main` with one commit.
pub fn init_repo(path: &Path) {
    std::fs::create_dir_all(path).expect("failed to create repo dir");
    git(path, &["init", "--quiet"]);
    git(path, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    configure(path);
    commit_file(path, "README.md", "init\n", "Initial commit");
}

/// Write `file` and commit it, returning the new commit id.
pub fn commit_file(repo: &Path, file: &str, content: &str, message: &str) -> String {
    let full = repo.join(file);
    if let Some(parent) = full.parent() {
        std::fs::create_dir_all(parent).expect("failed to create parent dir");
    }
    std::fs::write(&full, content).expect("failed to write file");
    git(repo, &["add", file]);
    git(repo, &["commit", "--quiet", "-m", message]);
    head(repo)
}

pub fn head(repo: &Path) -> String {
    git(repo, &["rev-parse", "HEAD"])
}

pub fn tip(repo: &Path, branch: &str) -> String {
    git(repo, &["rev-parse", &format!("refs/heads/{branch}")])
}

/// A working clone with a bare `origin` and a second clone that can push.
pub struct Fixture {
    _temp: TempDir,
    pub work: PathBuf,
    pub origin: PathBuf,
    pub peer: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let temp = tempfile::tempdir().expect("failed to create temp dir");
        let work = temp.path().join("work");
        let origin = temp.path().join("origin.git");
        let peer = temp.path().join("peer");

        init_repo(&work);
        git(
            temp.path(),
            &["clone", "--quiet", "--bare", "work", "origin.git"],
        );
        git(&work, &["remote", "add", "origin", origin.to_str().expect("utf-8 path")]);
        git(&work, &["fetch", "--quiet", "origin"]);
        git(&work, &["branch", "--set-upstream-to=origin/main", "main"]);
        git(temp.path(), &["clone", "--quiet", "origin.git", "peer"]);
        configure(&peer);

        Self {
            _temp: temp,
            work,
            origin,
            peer,
        }
    }

    /// Commit on `branch` in the peer clone and push it to origin.
    pub fn push_from_peer(&self, branch: &str, file: &str, content: &str) -> String {
        git(&self.peer, &["fetch", "--quiet", "origin"]);
        git(&self.peer, &["checkout", "--quiet", "-B", branch, &format!("origin/{branch}")]);
        let id = commit_file(&self.peer, file, content, &format!("peer: {file}"));
        git(&self.peer, &["push", "--quiet", "origin", branch]);
        id
    }

    /// Create `branch` in the work clone from `main`, publish it and track it.
    pub fn tracked_branch(&self, branch: &str) {
        git(&self.work, &["branch", branch, "main"]);
        git(&self.work, &["push", "--quiet", "-u", "origin", branch]);
    }

    pub fn fetch(&self) {
        git(&self.work, &["fetch", "--quiet", "origin"]);
    }
}
