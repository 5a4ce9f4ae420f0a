// ripple-rs: Git commit propagation and branch refresh
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Scoped ownership of a working tree.
//!
//! A [`WorktreeLease`] remembers what HEAD pointed at when it was taken and
//! puts it back when released or dropped, on every exit path including
//! early returns and panics that unwind.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::RippleResult;
use crate::git::cmd;
use crate::git::{Head, Repository};

pub struct WorktreeLease {
    path: PathBuf,
    original: Head,
    released: bool,
}

impl WorktreeLease {
    #[must_use]
    pub fn acquire(repo: &Repository) -> Self {
        debug!(head = %repo.head(), "acquired working tree");
        Self {
            path: repo.path().to_path_buf(),
            original: repo.head().clone(),
            released: false,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Restore the original HEAD and report whether that worked.
    ///
    /// # Errors
    ///
    /// Returns the checkout error if the original HEAD cannot be restored.
    pub fn release(mut self) -> RippleResult<()> {
        self.released = true;
        self.restore()
    }

    fn restore(&self) -> RippleResult<()> {
        if cmd::resolve_commit(&self.path, "CHERRY_PICK_HEAD")?.is_some() {
            warn!("aborting leftover cherry-pick before restoring HEAD");
            cmd::abort_cherry_pick(&self.path)?;
        }
        match &self.original {
            Head::Branch(name) => cmd::checkout(&self.path, name)?,
            Head::Detached(id) if !id.is_empty() => cmd::checkout_detached(&self.path, id)?,
            Head::Detached(_) => {}
        }
        debug!(head = %self.original, "restored working tree");
        Ok(())
    }
}

impl Drop for WorktreeLease {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = self.restore() {
            warn!(head = %self.original, "failed to restore original checkout: {e}");
        }
    }
}
