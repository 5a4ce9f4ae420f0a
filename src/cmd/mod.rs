// ripple-rs: Git commit propagation and branch refresh
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers
//!   config (options, inis), propagate, refresh, repo (branches, log,
//!   fetch, pull), repos
//! ```
//!
//! Handlers print human-readable output (or JSON) to stdout; logs go to
//! stderr. A run in which any unit failed returns an error so the process
//! exits non-zero.

pub mod config;
pub mod propagate;
pub mod refresh;
pub mod repo;
pub mod repos;


use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::Config;
use crate::config::prefs::{self, Preferences};
use crate::error::Result;
use crate::git::query;
use crate::report::{OperationReport, RunSummary};

/// Location of the preferences document for this run.
///
/// # Errors
///
/// Returns an error if no override is configured and the home directory
/// cannot be determined.
pub fn prefs_path(config: &Config) -> Result<PathBuf> {
    match &config.preferences.path {
        Some(path) => Ok(path.clone()),
        None => prefs::default_path(),
    }
}

/// Load the preferences document for this run.
///
/// # Errors
///
/// Returns an error if the document exists but cannot be read or parsed.
pub fn load_prefs(config: &Config) -> Result<(PathBuf, Preferences)> {
    let path = prefs_path(config)?;
    let prefs = Preferences::load(&path)
        .with_context(|| format!("failed to load preferences from {}", path.display()))?;
    Ok((path, prefs))
}

/// Pick the repository to work on: the explicit `-C` path, else the current
/// directory if it is a work tree, else the last repository used.
#[must_use]
pub fn resolve_repo_path(explicit: Option<&Path>, prefs: &Preferences) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    let cwd = PathBuf::from(".");
    if query::is_git_repo(&cwd) {
        return cwd;
    }
    match &prefs.last_repo_path {
        Some(last) => {
            debug!(path = %last.display(), "using last repository");
            last.clone()
        }
        None => cwd,
    }
}

/// Token cancelled on the first Ctrl+C. Work in progress finishes its
/// current unit; the rest is reported as skipped.
#[must_use]
pub fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, finishing current step");
            child.cancel();
        }
    });
    token
}

/// Print reports and the summary line, or the reports as JSON.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn print_reports(reports: &[OperationReport], json: bool) -> Result<RunSummary> {
    let summary = RunSummary::of(reports);
    if json {
        println!("{}", serde_json::to_string_pretty(reports)?);
    } else {
        for report in reports {
            println!("{report}");
        }
        println!("{summary}");
    }
    Ok(summary)
}

/// Turn a summary with failures into the command's error.
///
/// # Errors
///
/// Returns an error if any unit failed.
pub fn check_summary(summary: &RunSummary) -> Result<()> {
    if summary.has_failures() {
        bail!("{} unit(s) failed", summary.failed);
    }
    Ok(())
}
