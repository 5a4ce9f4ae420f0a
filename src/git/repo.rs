// ripple-rs: Git commit propagation and branch refresh
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository handle.
//!
//! A [`Repository`] is a snapshot of one working tree taken at the start of a
//! pipeline step. HEAD and dirtiness change under our feet as soon as we
//! check anything out, so handles are cheap to [`reload`](Repository::reload)
//! and are never kept across runs.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::cmd::resolve_commit;
use super::history::{self, History};
use super::inventory::RefInventory;
use super::query;
use crate::error::{GitError, RippleResult};

/// What HEAD points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    /// A local branch (possibly unborn).
    Branch(String),
    /// A detached commit.
    Detached(String),
}

impl fmt::Display for Head {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Branch(name) => f.write_str(name),
            Self::Detached(id) => write!(f, "(detached at {})", short_id(id)),
        }
    }
}

/// One checked-out repository, identified by its canonical work tree path.
#[derive(Debug, Clone)]
pub struct Repository {
    path: PathBuf,
    head: Head,
    dirty: bool,
}

impl Repository {
    /// Open the work tree containing `path`.
    ///
    /// # Errors
    ///
    /// Returns `GitError::RepositoryAccess` if `path` does not exist or is not
    /// inside a non-bare git repository.
    pub fn open(path: &Path) -> RippleResult<Self> {
        let access = |message: String| GitError::RepositoryAccess {
            path: path.display().to_string(),
            message,
        };

        let canonical = path
            .canonicalize()
            .map_err(|e| access(e.to_string()))?;
        if !query::is_git_repo(&canonical) {
            return Err(access("not a git work tree".to_string()).into());
        }
        let root = query::work_tree(&canonical)
            .and_then(|root| Ok(root.canonicalize()?))
            .map_err(|e| access(e.to_string()))?;

        let mut repo = Self {
            path: root,
            head: Head::Detached(String::new()),
            dirty: false,
        };
        repo.reload()?;
        debug!(path = %repo.path.display(), head = %repo.head, dirty = repo.dirty, "opened repository");
        Ok(repo)
    }

    /// Re-read HEAD and working tree state.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if HEAD or status cannot be read.
    pub fn reload(&mut self) -> RippleResult<()> {
        self.head = match query::current_branch(&self.path)? {
            Some(branch) => Head::Branch(branch),
            None => Head::Detached(resolve_commit(&self.path, "HEAD")?.unwrap_or_default()),
        };
        self.dirty = query::has_uncommitted_changes(&self.path)?;
        Ok(())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Final path component, used in logs and reports.
    #[must_use]
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map_or_else(|| self.path.display().to_string(), |n| n.to_string_lossy().into_owned())
    }

    #[must_use]
    pub const fn head(&self) -> &Head {
        &self.head
    }

    /// Checked-out branch name, `None` when detached.
    #[must_use]
    pub fn current_branch(&self) -> Option<&str> {
        match &self.head {
            Head::Branch(name) => Some(name),
            Head::Detached(_) => None,
        }
    }

    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Fail with `UncommittedChanges` if the working tree is dirty.
    ///
    /// # Errors
    ///
    /// Returns `GitError::UncommittedChanges` when dirty.
    pub fn ensure_clean(&self) -> RippleResult<()> {
        if self.dirty {
            return Err(GitError::UncommittedChanges {
                path: self.path.display().to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Take a ref inventory snapshot; remote-tracking refs of `remote` are
    /// included when given.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the batched ref query fails.
    pub fn inventory(&self, remote: Option<&str>) -> RippleResult<RefInventory> {
        RefInventory::collect(self, remote)
    }

    /// Stream history of `rev`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `GitError::BranchNotFound` if `rev` does not name a commit.
    pub fn history(&self, rev: &str, limit: Option<usize>) -> RippleResult<History> {
        history::history(&self.path, rev, limit)
    }
}

/// First seven characters of a commit id.
#[must_use]
pub fn short_id(id: &str) -> &str {
    id.get(..7).unwrap_or(id)
}
