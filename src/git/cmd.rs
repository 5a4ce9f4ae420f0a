// ripple-rs: Git commit propagation and branch refresh
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git command operations using shell backend.
//!
//! ```text
//! cmd.rs --> ShellBackend --> git (hooks, credentials, transports)
//! ```

use crate::error::RippleResult;
use std::path::Path;

use super::backend::{GitMutation, ShellBackend};

/// Execute git command with standard environment variables.
/// ALWAYS sets `GCM_INTERACTIVE=never` and `GIT_TERMINAL_PROMPT=0`.
///
/// Exposed to the inventory and history readers, which issue batched
/// plumbing queries.
pub(crate) fn git_command(args: &[&str], cwd: &Path) -> RippleResult<String> {
    ShellBackend::git_command(args, cwd)
}

/// Resolve `rev` to a full commit id, or `None` if it does not name a commit.
///
/// # Errors
///
/// Never fails for unknown revisions; only spawn failures are returned.
pub fn resolve_commit(repo_path: &Path, rev: &str) -> RippleResult<Option<String>> {
    let spec = format!("{rev}^{{commit}}");
    match git_command(&["rev-parse", "--verify", "--quiet", &spec], repo_path) {
        Ok(id) if !id.is_empty() => Ok(Some(id)),
        Ok(_) => Ok(None),
        Err(e) if e.as_git().is_some() => Ok(None),
        Err(e) => Err(e),
    }
}

/// True if `ancestor` is reachable from `descendant` (or equal to it).
///
/// # Errors
///
/// Returns a `GitError` if either revision is unknown.
pub fn is_ancestor(repo_path: &Path, ancestor: &str, descendant: &str) -> RippleResult<bool> {
    let range = format!("{descendant}..{ancestor}");
    let count = git_command(&["rev-list", "--count", &range], repo_path)?;
    Ok(count == "0")
}

/// Fetch from remote.
///
/// # Errors
///
/// Returns a `GitError` if the fetch operation fails.
pub fn fetch(repo_path: &Path, remote: &str, prune: bool) -> RippleResult<()> {
    ShellBackend::fetch(repo_path, remote, prune)
}

/// Checkout a branch.
///
/// # Errors
///
/// Returns `GitError::CheckoutFailed` if the checkout operation fails.
pub fn checkout(repo_path: &Path, what: &str) -> RippleResult<()> {
    ShellBackend::checkout(repo_path, what)
}

/// Checkout a commit on a detached HEAD.
///
/// # Errors
///
/// Returns `GitError::CheckoutFailed` if the checkout operation fails.
pub fn checkout_detached(repo_path: &Path, commit: &str) -> RippleResult<()> {
    ShellBackend::checkout_detached(repo_path, commit)
}

/// Create a branch at `base` without switching to it.
///
/// # Errors
///
/// Returns a `GitError` if the branch exists or `base` is unknown.
pub fn create_branch(repo_path: &Path, name: &str, base: &str) -> RippleResult<()> {
    ShellBackend::create_branch(repo_path, name, base)
}

/// Cherry-pick `commit` onto HEAD; `mainline` is git's 1-based parent number.
///
/// # Errors
///
/// Returns `GitError::CherryPickConflict` or `GitError::CherryPickFailed`.
pub fn cherry_pick(repo_path: &Path, commit: &str, mainline: Option<usize>) -> RippleResult<()> {
    ShellBackend::cherry_pick(repo_path, commit, mainline)
}

/// Abort an in-progress cherry-pick.
///
/// # Errors
///
/// Returns a `GitError` if there is nothing to abort.
pub fn abort_cherry_pick(repo_path: &Path) -> RippleResult<()> {
    ShellBackend::abort_cherry_pick(repo_path)
}

/// Hard reset to `commit`.
///
/// # Errors
///
/// Returns a `GitError` if the reset fails.
pub fn reset_hard(repo_path: &Path, commit: &str) -> RippleResult<()> {
    ShellBackend::reset_hard(repo_path, commit)
}

/// Soft reset to `commit`.
///
/// # Errors
///
/// Returns a `GitError` if the reset fails.
pub fn reset_soft(repo_path: &Path, commit: &str) -> RippleResult<()> {
    ShellBackend::reset_soft(repo_path, commit)
}

/// Commit the index.
///
/// # Errors
///
/// Returns a `GitError` if the commit fails.
pub fn commit(repo_path: &Path, message: &str) -> RippleResult<()> {
    ShellBackend::commit(repo_path, message)
}

/// Push with upstream tracking.
///
/// # Errors
///
/// Returns `GitError::PushFailed` if the remote rejects the push.
pub fn push_upstream(repo_path: &Path, remote: &str, branch: &str) -> RippleResult<()> {
    ShellBackend::push_upstream(repo_path, remote, branch)
}

/// Compare-and-swap ref update.
///
/// # Errors
///
/// Returns a `GitError` if the ref moved since `old` was read.
pub fn update_ref(repo_path: &Path, refname: &str, new: &str, old: &str) -> RippleResult<()> {
    ShellBackend::update_ref(repo_path, refname, new, old)
}

/// Fast-forward the checked-out branch.
///
/// # Errors
///
/// Returns a `GitError` if the merge is not a fast-forward.
pub fn merge_ff_only(repo_path: &Path, commit: &str) -> RippleResult<()> {
    ShellBackend::merge_ff_only(repo_path, commit)
}
