// ripple-rs: Git commit propagation and branch refresh
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!          RippleError (~24 bytes)
//!                 |
//!     +------+------+------+------+
//!     |      |      |      |      |
//!     v      v      v      v      v
//!    Git   Plan   Cfg     Io   Other
//!    Box   Box    Box    Box  Box<str>
//!
//! Sub-errors (unboxed internally):
//!   Git     RepositoryAccess, BranchNotFound, CherryPickConflict,
//!           NonFastForward, CheckedOutElsewhere, PushFailed, ...
//!   Plan    InvalidPlan, InvalidParentSelection
//!   Config  ReadError, ParseError, InvalidValue
//! ```
//!
//! Per-unit failures (one target branch, one tracked branch) are downgraded
//! to an [`OperationReport`](crate::report::OperationReport) using
//! [`GitError::tag`]. Plan errors and repository access errors abort the run
//! before any mutation.

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`RippleError`].
pub type RippleResult<T> = std::result::Result<T, RippleError>;

/// Top-level library error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum RippleError {
    /// Git operation failed.
    #[error("git error: {0}")]
    Git(#[from] Box<GitError>),

    /// Propagation plan rejected before any mutation.
    #[error("plan error: {0}")]
    Plan(#[from] Box<PlanError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

impl RippleError {
    /// Returns the wrapped git error, if any.
    #[must_use]
    pub fn as_git(&self) -> Option<&GitError> {
        match self {
            Self::Git(e) => Some(e),
            _ => None,
        }
    }

    /// Stable machine-readable tag used as report detail.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Git(e) => e.tag(),
            Self::Plan(e) => e.tag(),
            Self::Config(_) => "config-error",
            Self::Io(_) => "io-error",
            Self::Other(_) => "error",
        }
    }
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for RippleError {
                fn from(err: $error) -> Self {
                    RippleError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    GitError => Git,
    PlanError => Plan,
    ConfigError => Config,
    std::io::Error => Io,
}

// --- Gix Errors ---

/// Wrapper for gix-specific errors.
///
/// Large error types are boxed to keep enum size manageable.
#[derive(Debug, Error)]
pub enum GixError {
    /// Failed to discover repository from path.
    #[error("failed to discover repository: {0}")]
    Discover(#[from] Box<gix::discover::Error>),

    /// Failed to get HEAD reference.
    #[error("failed to get head reference: {0}")]
    Head(#[from] gix::reference::find::existing::Error),

    /// Repository has no worktree (bare repository).
    #[error("repository has no worktree (bare repository)")]
    BareRepository,
}

// --- Git Errors ---

/// Git operation errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// Path is not a readable git repository. Fatal to the whole run.
    #[error("cannot access repository {path}: {message}")]
    RepositoryAccess { path: String, message: String },

    /// Git command execution failed.
    #[error("git command failed: {command} - {message}")]
    CommandFailed { command: String, message: String },

    /// Error from gix library.
    #[error("gix error: {0}")]
    Gix(#[from] GixError),

    /// Uncommitted changes detected when clean working tree required.
    #[error("uncommitted changes in {path}")]
    UncommittedChanges { path: String },

    /// Branch not found.
    #[error("branch not found: {branch}")]
    BranchNotFound { branch: String },

    /// Branch has no resolvable upstream.
    #[error("branch '{branch}' has no upstream")]
    NoUpstream { branch: String },

    /// Checkout operation failed.
    #[error("failed to checkout {what}: {message}")]
    CheckoutFailed { what: String, message: String },

    /// Cherry-pick stopped on conflicting paths.
    #[error("cherry-pick of {commit} conflicts in: {}", .files.join(", "))]
    CherryPickConflict { commit: String, files: Vec<String> },

    /// Cherry-pick failed without leaving conflicts (empty pick, bad object, ...).
    #[error("cherry-pick of {commit} failed: {message}")]
    CherryPickFailed { commit: String, message: String },

    /// Branch is checked out in another linked worktree; moving its ref
    /// would desync that worktree.
    #[error("branch '{branch}' is checked out in another worktree at {worktree}")]
    CheckedOutElsewhere { branch: String, worktree: String },

    /// Local branch is not an ancestor of its upstream.
    #[error("cannot fast-forward '{branch}': local commits are not in upstream")]
    NonFastForward { branch: String },

    /// Push to the remote failed.
    #[error("failed to push {branch} to {remote}: {message}")]
    PushFailed {
        branch: String,
        remote: String,
        message: String,
    },
}

impl GitError {
    /// Stable machine-readable tag used as report detail.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::RepositoryAccess { .. } => "repository-access",
            Self::CommandFailed { .. } | Self::Gix(_) => "git-error",
            Self::UncommittedChanges { .. } => "dirty",
            Self::BranchNotFound { .. } => "branch-not-found",
            Self::NoUpstream { .. } => "no-upstream",
            Self::CheckoutFailed { .. } => "checkout-failed",
            Self::CherryPickConflict { .. } => "conflict",
            Self::CherryPickFailed { .. } => "cherry-pick-failed",
            Self::CheckedOutElsewhere { .. } => "checked-out-elsewhere",
            Self::NonFastForward { .. } => "non-fast-forward",
            Self::PushFailed { .. } => "push-error",
        }
    }
}

// --- Plan Errors ---

/// Propagation plan errors, raised before any repository mutation.
#[derive(Debug, Error)]
pub enum PlanError {
    /// The plan as a whole cannot be executed.
    #[error("invalid plan: {reason}")]
    InvalidPlan { reason: String },

    /// Mainline parent index outside `0..parents`.
    #[error("invalid parent selection for {commit}: index {index} but commit has {parents} parent(s)")]
    InvalidParentSelection {
        commit: String,
        index: usize,
        parents: usize,
    },
}

impl PlanError {
    /// Stable machine-readable tag.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::InvalidPlan { .. } => "invalid-plan",
            Self::InvalidParentSelection { .. } => "invalid-parent-selection",
        }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidPlan {
            reason: reason.into(),
        }
    }
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

#[cfg(test)]
mod tests;
