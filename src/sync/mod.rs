// ripple-rs: Git commit propagation and branch refresh
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Fetch/pull orchestration and the shared fast-forward primitive.
//!
//! ```text
//! fetch(repo)          snapshot remote refs -> git fetch -> snapshot -> delta
//! pull(repo, branch)   fetch -> checks -> fast_forward (no checkout)
//!
//! fast_forward:
//!   not checked out   is-ancestor? -> update-ref new old   (compare-and-swap)
//!   checked out       is-ancestor? -> merge --ff-only new
//!                     on failure   -> reset --hard to whichever tip the ref
//!                                     now holds, so ref and tree agree
//! ```


use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use crate::error::{GitError, RippleResult};
use crate::git::cmd;
use crate::git::repo::short_id;
use crate::git::{RefInventory, Repository, query};

/// Move `refs/heads/<branch>` from `old_tip` to `new_tip` without merging.
///
/// # Errors
///
/// Returns `GitError::NonFastForward` if `old_tip` is not an ancestor of
/// `new_tip`, `GitError::UncommittedChanges` if an in-place update finds the
/// tree dirty, or the git error from the update itself.
pub fn fast_forward(
    repo_path: &Path,
    branch: &str,
    old_tip: &str,
    new_tip: &str,
    checked_out: bool,
) -> RippleResult<()> {
    if !cmd::is_ancestor(repo_path, old_tip, new_tip)? {
        return Err(GitError::NonFastForward {
            branch: branch.to_string(),
        }
        .into());
    }

    if !checked_out {
        return cmd::update_ref(repo_path, &format!("refs/heads/{branch}"), new_tip, old_tip);
    }

    if query::has_uncommitted_changes(repo_path)? {
        return Err(GitError::UncommittedChanges {
            path: repo_path.display().to_string(),
        }
        .into());
    }
    if let Err(e) = cmd::merge_ff_only(repo_path, new_tip) {
        settle_in_place(repo_path, branch, old_tip, new_tip);
        return Err(e);
    }
    Ok(())
}

/// After a failed in-place fast-forward, make the work tree match whatever
/// the branch ref points at: finish the move if the ref already advanced,
/// otherwise roll back to the old tip.
fn settle_in_place(repo_path: &Path, branch: &str, old_tip: &str, new_tip: &str) {
    let current = cmd::resolve_commit(repo_path, &format!("refs/heads/{branch}"))
        .ok()
        .flatten();
    let target = if current.as_deref() == Some(new_tip) {
        new_tip
    } else {
        old_tip
    };
    warn!(branch, target = short_id(target), "settling interrupted fast-forward");
    if let Err(e) = cmd::reset_hard(repo_path, target) {
        warn!(branch, "failed to settle work tree: {e}");
    }
}

/// Remote-tracking refs that changed during a fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FetchSummary {
    pub remote: String,
    pub added: Vec<String>,
    pub updated: Vec<String>,
    pub removed: Vec<String>,
}

impl FetchSummary {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }
}

fn remote_snapshot(repo: &Repository, remote: &str) -> RippleResult<BTreeMap<String, String>> {
    let inventory = RefInventory::collect(repo, Some(remote))?;
    Ok(inventory
        .remote_tips_of(remote)
        .into_iter()
        .map(|(name, tip)| (name.to_string(), tip.to_string()))
        .collect())
}

/// Fetch `remote` and report which remote-tracking refs changed.
///
/// # Errors
///
/// Returns a `GitError` if the fetch or either snapshot fails.
pub fn fetch(repo: &Repository, remote: &str, prune: bool) -> RippleResult<FetchSummary> {
    let before = remote_snapshot(repo, remote)?;
    cmd::fetch(repo.path(), remote, prune)?;
    let after = remote_snapshot(repo, remote)?;

    let mut summary = FetchSummary {
        remote: remote.to_string(),
        ..FetchSummary::default()
    };
    for (name, tip) in &after {
        match before.get(name) {
            None => summary.added.push(name.clone()),
            Some(old) if old != tip => summary.updated.push(name.clone()),
            Some(_) => {}
        }
    }
    summary.removed = before
        .keys()
        .filter(|name| !after.contains_key(*name))
        .cloned()
        .collect();

    info!(
        remote,
        added = summary.added.len(),
        updated = summary.updated.len(),
        removed = summary.removed.len(),
        "fetched"
    );
    Ok(summary)
}

/// Result of a successful pull.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum PullOutcome {
    UpToDate,
    FastForwarded { from: String, to: String },
}

/// Fetch `remote`, then fast-forward `branch` to its upstream without
/// checking it out.
///
/// # Errors
///
/// Returns `GitError::BranchNotFound`, `GitError::NoUpstream`,
/// `GitError::UncommittedChanges` (branch is checked out and dirty),
/// `GitError::CheckedOutElsewhere` (a linked worktree has it checked out) or
/// `GitError::NonFastForward` (branch has diverged).
pub fn pull(repo: &mut Repository, branch: &str, remote: &str) -> RippleResult<PullOutcome> {
    fetch(repo, remote, false)?;
    repo.reload()?;

    let inventory = repo.inventory(None)?;
    let local = inventory
        .local_branch(branch)
        .ok_or_else(|| GitError::BranchNotFound {
            branch: branch.to_string(),
        })?;
    let upstream_tip = inventory
        .upstream_tip(local)
        .ok_or_else(|| GitError::NoUpstream {
            branch: branch.to_string(),
        })?;

    if upstream_tip == local.tip {
        return Ok(PullOutcome::UpToDate);
    }

    let checked_out = repo.current_branch() == Some(branch);
    if checked_out {
        repo.ensure_clean()?;
    } else if let Some(worktree) = &local.worktree {
        return Err(GitError::CheckedOutElsewhere {
            branch: branch.to_string(),
            worktree: worktree.display().to_string(),
        }
        .into());
    }
    fast_forward(repo.path(), branch, &local.tip, upstream_tip, checked_out)?;
    info!(
        branch,
        from = short_id(&local.tip),
        to = short_id(upstream_tip),
        "fast-forwarded"
    );
    Ok(PullOutcome::FastForwarded {
        from: local.tip.clone(),
        to: upstream_tip.to_string(),
    })
}
