// ripple-rs: Git commit propagation and branch refresh
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Branch safety classifier.
//!
//! ```text
//! no upstream in snapshot           -> skip-no-upstream
//! local tip == upstream tip         -> up-to-date
//! checked out here  AND dirty       -> skip-dirty
//! checked out in another worktree   -> skip-current
//! checked out here  AND clean       -> refreshable (in place)
//! otherwise                         -> refreshable (ref only)
//! ```
//!
//! The order is the safety invariant: a dirty active branch can never come
//! out refreshable.

use std::fmt;

use serde::Serialize;

use crate::git::{BranchRef, RefInventory, Repository};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    Refreshable,
    SkipDirty,
    SkipCurrent,
    SkipNoUpstream,
    UpToDate,
}

impl Verdict {
    /// Stable tag, also used as report detail for skipped branches.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Refreshable => "refreshable",
            Self::SkipDirty => "skip-dirty",
            Self::SkipCurrent => "skip-current",
            Self::SkipNoUpstream => "skip-no-upstream",
            Self::UpToDate => "up-to-date",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Classification of one local branch for one refresh run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchClassification {
    pub branch: String,
    pub verdict: Verdict,
    pub reason: String,
    /// Checked out in this work tree; refreshed in place.
    pub checked_out: bool,
    pub local_tip: String,
    pub upstream_tip: Option<String>,
}

/// Working tree facts the classifier needs.
#[derive(Debug, Clone, Copy)]
pub struct WorktreeState<'a> {
    pub current_branch: Option<&'a str>,
    pub dirty: bool,
}

/// Classify one branch. Pure.
#[must_use]
pub fn classify_branch(
    branch: &BranchRef,
    upstream_tip: Option<&str>,
    state: WorktreeState<'_>,
) -> BranchClassification {
    let checked_out = state.current_branch == Some(branch.name.as_str());
    let (verdict, reason) = match (upstream_tip, branch.upstream.as_deref()) {
        (None, _) | (_, None) => (
            Verdict::SkipNoUpstream,
            "no upstream tracking branch".to_string(),
        ),
        (Some(up), Some(name)) if up == branch.tip => {
            (Verdict::UpToDate, format!("already at {name}"))
        }
        _ if checked_out && state.dirty => (
            Verdict::SkipDirty,
            "checked out with uncommitted changes".to_string(),
        ),
        _ if !checked_out && branch.worktree.is_some() => (
            Verdict::SkipCurrent,
            format!(
                "checked out in another worktree at {}",
                branch
                    .worktree
                    .as_deref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default()
            ),
        ),
        (_, Some(name)) if checked_out => (
            Verdict::Refreshable,
            format!("fast-forward in place to {name}"),
        ),
        (_, Some(name)) => (Verdict::Refreshable, format!("fast-forward to {name}")),
    };

    BranchClassification {
        branch: branch.name.clone(),
        verdict,
        reason,
        checked_out,
        local_tip: branch.tip.clone(),
        upstream_tip: upstream_tip.map(str::to_string),
    }
}

/// Classify every local branch of `repo` in inventory order.
#[must_use]
pub fn classify(repo: &Repository, inventory: &RefInventory) -> Vec<BranchClassification> {
    let state = WorktreeState {
        current_branch: repo.current_branch(),
        dirty: repo.is_dirty(),
    };
    inventory
        .local()
        .map(|branch| classify_branch(branch, inventory.upstream_tip(branch), state))
        .collect()
}
