// ripple-rs: Git commit propagation and branch refresh
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git backend abstraction layer.
//!
//! ```text
//! GitQuery (read)     --> GixBackend (pure Rust gix)
//! GitMutation (write) --> ShellBackend (git CLI)
//! ```
//!
//! Every ref, index and working-tree write goes through the git CLI so that
//! hooks, credentials and transport configuration behave exactly as they do
//! for the user.

use crate::error::{GitError, GixError, RippleResult};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

// --- Query Trait (Read-only operations) ---

/// Read-only git query operations.
pub trait GitQuery {
    /// Check if path is inside a git work tree.
    fn is_git_repo(path: &Path) -> bool;

    /// Root of the work tree containing `path`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if no repository is found or it is bare.
    fn work_tree(path: &Path) -> RippleResult<PathBuf>;

    /// Get current branch name (None if HEAD is detached).
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if repository discovery or head resolution fails.
    fn current_branch(path: &Path) -> RippleResult<Option<String>>;

    /// Check for uncommitted changes (staged, unstaged, or untracked files).
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if repository discovery or status check fails.
    fn has_uncommitted_changes(path: &Path) -> RippleResult<bool>;
}

// --- Mutation Trait (Write operations) ---

/// Git operations that modify refs, the index or the working tree.
pub trait GitMutation {
    /// Fetch from remote, optionally pruning deleted remote branches.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the fetch operation fails.
    fn fetch(repo_path: &Path, remote: &str, prune: bool) -> RippleResult<()>;

    /// Checkout a branch.
    ///
    /// # Errors
    ///
    /// Returns `GitError::CheckoutFailed` if git refuses the checkout.
    fn checkout(repo_path: &Path, what: &str) -> RippleResult<()>;

    /// Checkout a commit on a detached HEAD.
    ///
    /// # Errors
    ///
    /// Returns `GitError::CheckoutFailed` if git refuses the checkout.
    fn checkout_detached(repo_path: &Path, commit: &str) -> RippleResult<()>;

    /// Create `name` at `base` without switching to it.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the branch already exists or `base` is unknown.
    fn create_branch(repo_path: &Path, name: &str, base: &str) -> RippleResult<()>;

    /// Cherry-pick one commit onto HEAD. `mainline` is git's 1-based `-m`.
    ///
    /// # Errors
    ///
    /// Returns `GitError::CherryPickConflict` when unmerged paths remain,
    /// `GitError::CherryPickFailed` for any other refusal.
    fn cherry_pick(repo_path: &Path, commit: &str, mainline: Option<usize>) -> RippleResult<()>;

    /// Abort an in-progress cherry-pick.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if no cherry-pick is in progress.
    fn abort_cherry_pick(repo_path: &Path) -> RippleResult<()>;

    /// Reset HEAD, index and work tree to `commit`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the reset fails.
    fn reset_hard(repo_path: &Path, commit: &str) -> RippleResult<()>;

    /// Move HEAD to `commit`, keeping index and work tree.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the reset fails.
    fn reset_soft(repo_path: &Path, commit: &str) -> RippleResult<()>;

    /// Commit the index with `message`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if there is nothing to commit or identity is unset.
    fn commit(repo_path: &Path, message: &str) -> RippleResult<()>;

    /// Push `branch` to `remote` and record it as upstream (`-u`).
    ///
    /// # Errors
    ///
    /// Returns `GitError::PushFailed` if the remote rejects the push.
    fn push_upstream(repo_path: &Path, remote: &str, branch: &str) -> RippleResult<()>;

    /// Compare-and-swap update of `refname` from `old` to `new`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the ref no longer points at `old`.
    fn update_ref(repo_path: &Path, refname: &str, new: &str, old: &str) -> RippleResult<()>;

    /// Fast-forward the checked-out branch to `commit`, moving ref and work tree.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the merge is not a fast-forward or the tree
    /// update fails.
    fn merge_ff_only(repo_path: &Path, commit: &str) -> RippleResult<()>;
}

// --- GixBackend Implementation (Pure Rust) ---

/// Pure Rust git backend using gix.
///
/// Provides read-only operations without spawning subprocesses.
pub struct GixBackend;

fn discover(path: &Path) -> RippleResult<gix::Repository> {
    gix::discover(path)
        .map_err(|e| GitError::Gix(GixError::Discover(Box::new(e))).into())
}

impl GitQuery for GixBackend {
    fn is_git_repo(path: &Path) -> bool {
        gix::discover(path).is_ok_and(|repo| repo.workdir().is_some())
    }

    fn work_tree(path: &Path) -> RippleResult<PathBuf> {
        let repo = discover(path)?;
        repo.workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| GitError::Gix(GixError::BareRepository).into())
    }

    fn current_branch(path: &Path) -> RippleResult<Option<String>> {
        let repo = discover(path)?;
        let head = repo
            .head_name()
            .map_err(|e| GitError::Gix(GixError::Head(e)))?;
        Ok(head.map(|name| name.shorten().to_string()))
    }

    fn has_uncommitted_changes(path: &Path) -> RippleResult<bool> {
        use gix::status::UntrackedFiles;

        let repo = discover(path)?;

        let has_changes = repo
            .status(gix::progress::Discard)
            .map_err(|_| GitError::CommandFailed {
                command: "status".to_string(),
                message: "failed to prepare status check".to_string(),
            })?
            .untracked_files(UntrackedFiles::Files)
            .into_iter(None)
            .map_err(|_| GitError::CommandFailed {
                command: "status".to_string(),
                message: "failed to check repository status".to_string(),
            })?
            .next()
            .is_some();

        Ok(has_changes)
    }
}

// --- ShellBackend Implementation (Git CLI) ---

/// Shell-based git backend using git CLI.
pub struct ShellBackend;

impl ShellBackend {
    /// Execute a git command and return trimmed stdout.
    /// Sets `GCM_INTERACTIVE=never` and `GIT_TERMINAL_PROMPT=0` so that a
    /// missing credential fails the command instead of blocking on a prompt.
    pub(crate) fn git_command(args: &[&str], cwd: &Path) -> RippleResult<String> {
        use std::process::Command;

        debug!(cwd = %cwd.display(), "git {}", args.join(" "));

        let output = Command::new("git")
            .args(args)
            .current_dir(cwd)
            .env("GCM_INTERACTIVE", "never")
            .env("GIT_TERMINAL_PROMPT", "0")
            .env("GIT_EDITOR", "true")
            .output()
            .map_err(|e| std::io::Error::new(e.kind(), format!("failed to execute git: {e}")))?;

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: format!("git {}", args.join(" ")),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        trace!(stdout = %stdout, "git output");
        Ok(stdout)
    }

    /// Paths with unmerged index entries, sorted and deduplicated.
    fn unmerged_paths(repo_path: &Path) -> RippleResult<Vec<String>> {
        let output = Self::git_command(&["diff", "--name-only", "--diff-filter=U"], repo_path)?;
        let mut files: Vec<String> = output.lines().map(str::to_string).collect();
        files.sort();
        files.dedup();
        Ok(files)
    }
}

/// Pull the stderr text back out of a `CommandFailed`.
fn failure_message(err: &crate::error::RippleError) -> String {
    match err.as_git() {
        Some(GitError::CommandFailed { message, .. }) => message.clone(),
        _ => err.to_string(),
    }
}

impl GitMutation for ShellBackend {
    fn fetch(repo_path: &Path, remote: &str, prune: bool) -> RippleResult<()> {
        let mut args = vec!["fetch", "--quiet"];
        if prune {
            args.push("--prune");
        }
        args.push(remote);
        Self::git_command(&args, repo_path)?;
        Ok(())
    }

    fn checkout(repo_path: &Path, what: &str) -> RippleResult<()> {
        Self::git_command(&["checkout", "-q", what, "--"], repo_path)
            .map(|_| ())
            .map_err(|e| {
                GitError::CheckoutFailed {
                    what: what.to_string(),
                    message: failure_message(&e),
                }
                .into()
            })
    }

    fn checkout_detached(repo_path: &Path, commit: &str) -> RippleResult<()> {
        Self::git_command(&["checkout", "-q", "--detach", commit], repo_path)
            .map(|_| ())
            .map_err(|e| {
                GitError::CheckoutFailed {
                    what: commit.to_string(),
                    message: failure_message(&e),
                }
                .into()
            })
    }

    fn create_branch(repo_path: &Path, name: &str, base: &str) -> RippleResult<()> {
        Self::git_command(&["branch", "--no-track", name, base], repo_path)?;
        Ok(())
    }

    fn cherry_pick(repo_path: &Path, commit: &str, mainline: Option<usize>) -> RippleResult<()> {
        let mainline_arg = mainline.map(|m| m.to_string());
        let mut args = vec!["cherry-pick"];
        if let Some(m) = mainline_arg.as_deref() {
            args.extend(["-m", m]);
        }
        args.push(commit);

        match Self::git_command(&args, repo_path) {
            Ok(_) => Ok(()),
            Err(e) => {
                let files = Self::unmerged_paths(repo_path).unwrap_or_default();
                if files.is_empty() {
                    Err(GitError::CherryPickFailed {
                        commit: commit.to_string(),
                        message: failure_message(&e),
                    }
                    .into())
                } else {
                    Err(GitError::CherryPickConflict {
                        commit: commit.to_string(),
                        files,
                    }
                    .into())
                }
            }
        }
    }

    fn abort_cherry_pick(repo_path: &Path) -> RippleResult<()> {
        Self::git_command(&["cherry-pick", "--abort"], repo_path)?;
        Ok(())
    }

    fn reset_hard(repo_path: &Path, commit: &str) -> RippleResult<()> {
        Self::git_command(&["reset", "--hard", "-q", commit], repo_path)?;
        Ok(())
    }

    fn reset_soft(repo_path: &Path, commit: &str) -> RippleResult<()> {
        Self::git_command(&["reset", "--soft", "-q", commit], repo_path)?;
        Ok(())
    }

    fn commit(repo_path: &Path, message: &str) -> RippleResult<()> {
        Self::git_command(&["commit", "-q", "-m", message], repo_path)?;
        Ok(())
    }

    fn push_upstream(repo_path: &Path, remote: &str, branch: &str) -> RippleResult<()> {
        Self::git_command(&["push", "--quiet", "-u", remote, branch], repo_path)
            .map(|_| ())
            .map_err(|e| {
                GitError::PushFailed {
                    branch: branch.to_string(),
                    remote: remote.to_string(),
                    message: failure_message(&e),
                }
                .into()
            })
    }

    fn update_ref(repo_path: &Path, refname: &str, new: &str, old: &str) -> RippleResult<()> {
        Self::git_command(
            &["update-ref", "-m", "ripple: fast-forward", refname, new, old],
            repo_path,
        )?;
        Ok(())
    }

    fn merge_ff_only(repo_path: &Path, commit: &str) -> RippleResult<()> {
        Self::git_command(&["merge", "--ff-only", "-q", commit], repo_path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests;
