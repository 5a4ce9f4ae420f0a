// ripple-rs: Git commit propagation and branch refresh
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Commit propagation engine.
//!
//! ```text
//! plan.validate()          pure, fails before any mutation
//!      |
//! ensure clean tree
//!      |
//! WorktreeLease::acquire   remembers HEAD
//!      |
//! [combine] build composite once on detached base
//!      |
//! for target in plan order:
//!     cancelled? -> skipped
//!     missing?   -> create from base | BranchNotFound
//!     checkout, note pre-tip
//!     cherry-pick each step (-m for merges)
//!         conflict -> abort, reset to pre-tip, failed
//!     [auto_push] push -u
//!      |
//! lease.release()          HEAD restored
//! ```
//!
//! Failures local to one target are downgraded to that target's report;
//! sibling targets still run.

pub mod lease;
pub mod plan;

#[cfg(test)]
mod tests;

use std::path::Path;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::error::{GitError, RippleError, RippleResult};
use crate::git::cmd;
use crate::git::{RefInventory, Repository};
use crate::logging::LogContext;
use crate::report::OperationReport;

pub use lease::WorktreeLease;
pub use plan::{PickStep, PropagationPlan, resolve_parent};

/// Report detail for a target that was cherry-picked (and not pushed).
pub const APPLIED: &str = "applied";
/// Report detail for a target that was cherry-picked and pushed.
pub const PUSHED: &str = "pushed";
/// Report detail for units skipped after cancellation.
pub const CANCELLED: &str = "cancelled";

/// Apply `plan` to every target and return one report per target, in plan
/// order.
///
/// # Errors
///
/// Returns `PlanError` if the plan is invalid, `GitError::UncommittedChanges`
/// if the working tree is dirty, or a `GitError` if the ref inventory cannot
/// be read. All of these occur before the first mutation. Per-target
/// failures are reported, not returned.
pub fn propagate(
    repo: &mut Repository,
    plan: &PropagationPlan,
    cancel: &CancellationToken,
) -> RippleResult<Vec<OperationReport>> {
    let steps = plan.validate()?;
    repo.reload()?;
    repo.ensure_clean()?;
    let inventory = repo.inventory(None)?;

    let repo_name = repo.name();
    let mut ctx = LogContext::for_repo(repo.path());
    let lease = WorktreeLease::acquire(repo);
    let path = lease.path().to_path_buf();

    let steps = if plan.combine() {
        match build_composite(&path, plan) {
            Ok(composite) => vec![PickStep {
                commit: composite,
                mainline: None,
            }],
            Err(e) => {
                warn!("{}failed to build composite commit: {e}", ctx.prefix());
                let reports = plan
                    .targets()
                    .iter()
                    .map(|t| OperationReport::failed(&repo_name, t, &e))
                    .collect();
                finish(lease, repo);
                return Ok(reports);
            }
        }
    } else {
        steps
    };

    let mut reports = Vec::with_capacity(plan.targets().len());
    for target in plan.targets() {
        ctx.set_unit(target.as_str());
        if cancel.is_cancelled() {
            info!("{}skipped: cancelled", ctx.prefix());
            reports.push(OperationReport::skipped(
                &repo_name,
                target,
                CANCELLED,
                "run cancelled before this target",
            ));
            continue;
        }

        let report = match apply_to_target(&path, plan, &inventory, target, &steps) {
            Ok(detail) => {
                info!("{}{detail}", ctx.prefix());
                OperationReport::success(&repo_name, target, detail)
            }
            Err(e) => {
                warn!("{}{e}", ctx.prefix());
                OperationReport::failed(&repo_name, target, &e)
            }
        };
        reports.push(report);
    }
    ctx.clear_unit();

    finish(lease, repo);
    Ok(reports)
}

/// Release the lease and refresh the handle. Failures are logged, not
/// returned, so the caller still gets every report.
fn finish(lease: WorktreeLease, repo: &mut Repository) {
    if let Err(e) = lease.release() {
        error!(head = %repo.head(), "could not restore original checkout: {e}");
    }
    if let Err(e) = repo.reload() {
        warn!(repo = %repo.path().display(), "could not reload repository state: {e}");
    }
}

/// Cherry-pick every step onto `target`, rolling the target back on failure.
fn apply_to_target(
    path: &Path,
    plan: &PropagationPlan,
    inventory: &RefInventory,
    target: &str,
    steps: &[PickStep],
) -> RippleResult<&'static str> {
    if inventory.local_branch(target).is_none() {
        if !plan.create_missing() {
            return Err(GitError::BranchNotFound {
                branch: target.to_string(),
            }
            .into());
        }
        let base = plan.base_ref();
        if cmd::resolve_commit(path, base)?.is_none() {
            return Err(GitError::BranchNotFound {
                branch: base.to_string(),
            }
            .into());
        }
        cmd::create_branch(path, target, base)?;
        info!(branch = target, base, "created target branch");
    }

    cmd::checkout(path, target)?;
    let pre_tip = cmd::resolve_commit(path, "HEAD")?.ok_or_else(|| GitError::BranchNotFound {
        branch: target.to_string(),
    })?;

    for step in steps {
        if let Err(e) = cmd::cherry_pick(path, &step.commit, step.mainline) {
            rollback(path, &pre_tip);
            return Err(e);
        }
    }

    if plan.auto_push() {
        cmd::push_upstream(path, plan.remote(), target)?;
        return Ok(PUSHED);
    }
    Ok(APPLIED)
}

/// Abort any in-progress pick and put the branch back at `pre_tip`.
fn rollback(path: &Path, pre_tip: &str) {
    if matches!(cmd::resolve_commit(path, "CHERRY_PICK_HEAD"), Ok(Some(_)))
        && let Err(e) = cmd::abort_cherry_pick(path)
    {
        warn!("cherry-pick --abort failed: {e}");
    }
    if let Err(e) = cmd::reset_hard(path, pre_tip) {
        warn!("failed to reset to {pre_tip}: {e}");
    }
}

/// Squash the selection into one commit on a detached HEAD at the oldest
/// commit's first parent. Returns the composite commit id.
fn build_composite(path: &Path, plan: &PropagationPlan) -> RippleResult<String> {
    let commits = plan.commits();
    let base = commits
        .first()
        .and_then(|c| c.parents.first())
        .ok_or_else(|| RippleError::Other("composite needs a parent commit".into()))?;

    cmd::checkout_detached(path, base)?;
    for commit in commits {
        if let Err(e) = cmd::cherry_pick(path, &commit.id, None) {
            rollback(path, base);
            return Err(e);
        }
    }
    cmd::reset_soft(path, base)?;
    cmd::commit(path, &plan.composite_message())?;
    let composite = cmd::resolve_commit(path, "HEAD")?
        .ok_or_else(|| RippleError::Other("composite commit not found".into()))?;
    info!(commit = %composite, count = commits.len(), "built composite commit");
    Ok(composite)
}
