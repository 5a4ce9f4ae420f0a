// ripple-rs: Git commit propagation and branch refresh
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git query operations using gix backend.
//!
//! ```text
//! query.rs --> GixBackend --> .git/ (no subprocess)
//! ```

use crate::error::RippleResult;
use std::path::{Path, PathBuf};

use super::backend::{GitQuery, GixBackend};

#[must_use]
pub fn is_git_repo(path: &Path) -> bool {
    GixBackend::is_git_repo(path)
}

/// Root of the work tree containing `path`.
///
/// # Errors
///
/// Returns a `GitError` if no non-bare repository contains `path`.
pub fn work_tree(path: &Path) -> RippleResult<PathBuf> {
    GixBackend::work_tree(path)
}

/// Get current branch name (None if HEAD is detached).
///
/// # Errors
///
/// Returns a `GitError` if repository discovery or head resolution fails.
pub fn current_branch(path: &Path) -> RippleResult<Option<String>> {
    GixBackend::current_branch(path)
}

/// Check for uncommitted changes (staged, unstaged, or untracked files).
///
/// # Errors
///
/// Returns a `GitError` if repository discovery or status check fails.
pub fn has_uncommitted_changes(path: &Path) -> RippleResult<bool> {
    GixBackend::has_uncommitted_changes(path)
}
