// ripple-rs: Git commit propagation and branch refresh
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git plumbing boundary.
//!
//! ```text
//!           Public API
//!   repo.rs  inventory.rs  history.rs
//!      |          |            |
//!   query.rs    cmd.rs  <------'
//!        \      /
//!         v    v
//!      ,------------------,
//!      | backend (traits) |
//!      '--+----------+----'
//!         |          |
//!         v          v
//!    GitQuery    GitMutation
//!   (gix, read)  (CLI, write)
//!         |          |
//!         v          v
//!    GixBackend  ShellBackend
//!    .is_repo    .checkout / cherry_pick
//!    .work_tree  .update_ref / merge_ff_only
//!    .branch     .fetch / push_upstream
//!    .uncommit   .reset / commit
//! ```
//!
//! **`GixBackend`**: pure Rust, no subprocess, read-only.
//! **`ShellBackend`**: git CLI for every write and for batched plumbing
//! queries. Git itself is the only source of truth for refs and objects.

pub mod backend;
pub mod cmd;
pub mod history;
pub mod inventory;
pub mod query;
pub mod repo;

pub use history::{CommitRecord, History};
pub use inventory::{BranchRef, RefInventory, RefKind};
pub use repo::{Head, Repository};

#[cfg(test)]
pub(crate) mod fixture;
