// ripple-rs: Git commit propagation and branch refresh
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Refresh engine.
//!
//! ```text
//! refresh_all(tracked repos)
//!   dedup canonical paths
//!   JoinSet + Semaphore(max_parallel)
//!     spawn_blocking(refresh_repository)      one worker per repository
//!   reorder to tracked-set order
//!
//! refresh_repository(tracked)
//!   open -> [fetch] -> inventory -> classify -> filter -> refresh
//!
//! refresh(classifications)
//!   refreshable   -> sync::fast_forward      success(fast-forward) | failed
//!   anything else -> skipped(verdict, reason)
//! ```
//!
//! Branches of one repository are always updated one after another; only
//! distinct repositories run concurrently.

pub mod classify;


use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bon::Builder;
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::prefs::TrackedRepo;
use crate::error::{GitError, RippleError, RippleResult};
use crate::git::Repository;
use crate::logging::LogContext;
use crate::propagate::CANCELLED;
use crate::report::OperationReport;
use crate::sync;

pub use classify::{BranchClassification, Verdict, WorktreeState, classify, classify_branch};

/// Report detail for a branch that was moved to its upstream.
pub const FAST_FORWARD: &str = "fast-forward";
/// Report detail for a failed fetch before classification.
pub const FETCH_ERROR: &str = "fetch-error";
/// Report target used when a whole repository failed.
pub const REPOSITORY_UNIT: &str = "*";

/// Knobs shared by every repository in one refresh run.
#[derive(Debug, Clone, Builder)]
pub struct RefreshOptions {
    #[builder(into, default = "origin".to_string())]
    remote: String,
    #[builder(default = true)]
    fetch_first: bool,
    #[builder(default)]
    prune: bool,
    /// Classify only; never touch refs.
    #[builder(default)]
    dry: bool,
}

impl RefreshOptions {
    #[must_use]
    pub fn remote(&self) -> &str {
        &self.remote
    }

    #[must_use]
    pub const fn fetch_first(&self) -> bool {
        self.fetch_first
    }

    #[must_use]
    pub const fn prune(&self) -> bool {
        self.prune
    }

    #[must_use]
    pub const fn dry(&self) -> bool {
        self.dry
    }
}

/// Everything one repository produced in a refresh run.
#[derive(Debug, Clone, Serialize)]
pub struct RepoRefresh {
    pub repository: String,
    pub path: PathBuf,
    pub classifications: Vec<BranchClassification>,
    pub reports: Vec<OperationReport>,
}

impl RepoRefresh {
    fn failed(path: &Path, err: &RippleError) -> Self {
        let repository = display_name(path);
        Self {
            reports: vec![OperationReport::failed(&repository, REPOSITORY_UNIT, err)],
            repository,
            path: path.to_path_buf(),
            classifications: Vec::new(),
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

/// Refresh every refreshable branch in `classifications`, in order.
///
/// Non-refreshable branches are reported as skipped with their verdict as
/// detail. Never force-updates: a branch whose tip is not an ancestor of its
/// upstream fails with `non-fast-forward`.
pub fn refresh(
    repo: &Repository,
    classifications: &[BranchClassification],
    cancel: &CancellationToken,
) -> Vec<OperationReport> {
    let repo_name = repo.name();
    let mut ctx = LogContext::for_repo(repo.path());

    let reports = classifications
        .iter()
        .map(|c| {
            ctx.set_unit(c.branch.as_str());
            if cancel.is_cancelled() {
                return OperationReport::skipped(
                    &repo_name,
                    &c.branch,
                    CANCELLED,
                    "run cancelled before this branch",
                );
            }
            if c.verdict != Verdict::Refreshable {
                debug!("{}{}: {}", ctx.prefix(), c.verdict, c.reason);
                return OperationReport::skipped(&repo_name, &c.branch, c.verdict.as_str(), &c.reason);
            }
            match fast_forward_branch(repo, c) {
                Ok(()) => {
                    info!("{}{}", ctx.prefix(), c.reason);
                    OperationReport::success(&repo_name, &c.branch, FAST_FORWARD)
                }
                Err(e) => {
                    warn!("{}{e}", ctx.prefix());
                    OperationReport::failed(&repo_name, &c.branch, &e)
                }
            }
        })
        .collect();
    ctx.clear_unit();
    reports
}

fn fast_forward_branch(repo: &Repository, c: &BranchClassification) -> RippleResult<()> {
    let upstream = c.upstream_tip.as_deref().ok_or_else(|| GitError::NoUpstream {
        branch: c.branch.clone(),
    })?;
    sync::fast_forward(repo.path(), &c.branch, &c.local_tip, upstream, c.checked_out)
}

/// Keep the classifications `tracked` asks for. Named branches that do not
/// exist come back as failed reports.
fn select(
    repo_name: &str,
    classifications: Vec<BranchClassification>,
    tracked: &TrackedRepo,
) -> (Vec<BranchClassification>, Vec<OperationReport>) {
    let missing = tracked
        .branches
        .iter()
        .filter(|b| !classifications.iter().any(|c| &c.branch == *b))
        .map(|b| {
            let err: RippleError = GitError::BranchNotFound { branch: b.clone() }.into();
            OperationReport::failed(repo_name, b, &err)
        })
        .collect();
    let selected = classifications
        .into_iter()
        .filter(|c| tracked.includes(&c.branch))
        .collect();
    (selected, missing)
}

/// Fetch, classify and refresh one repository, restricted to the branches
/// `tracked` names (all when empty).
///
/// A failed fetch is reported as a `fetch-error` unit and the run carries on
/// against the refs already present locally.
///
/// # Errors
///
/// Returns `GitError::RepositoryAccess` if `tracked.path` is not a readable work tree
/// or its ref inventory cannot be taken.
pub fn refresh_repository(
    tracked: &TrackedRepo,
    options: &RefreshOptions,
    cancel: &CancellationToken,
) -> RippleResult<RepoRefresh> {
    let mut repo = Repository::open(&tracked.path)?;
    let repo_name = repo.name();
    let mut reports = Vec::new();

    if options.fetch_first() && !cancel.is_cancelled() {
        if let Err(e) = sync::fetch(&repo, options.remote(), options.prune()) {
            warn!(repo = %repo_name, remote = options.remote(), "fetch failed: {e}");
            reports.push(OperationReport::failed_with(
                &repo_name,
                options.remote(),
                FETCH_ERROR,
                &e,
            ));
        }
        repo.reload()?;
    }

    let inventory = repo.inventory(Some(options.remote()))?;
    let (classifications, missing) = select(&repo_name, classify(&repo, &inventory), tracked);
    reports.extend(missing);

    if !options.dry() {
        reports.extend(refresh(&repo, &classifications, cancel));
        repo.reload()?;
    }

    Ok(RepoRefresh {
        repository: repo_name,
        path: repo.path().to_path_buf(),
        classifications,
        reports,
    })
}

/// Drop repositories that resolve to a working tree already in the list.
fn dedup(repos: &[TrackedRepo]) -> Vec<TrackedRepo> {
    let mut seen = HashSet::new();
    repos
        .iter()
        .filter(|r| {
            let key = r.path.canonicalize().unwrap_or_else(|_| r.path.clone());
            let fresh = seen.insert(key);
            if !fresh {
                debug!(path = %r.path.display(), "skipping duplicate repository");
            }
            fresh
        })
        .cloned()
        .collect()
}

/// Refresh every tracked repository, up to `parallelism` at a time.
///
/// Results come back in the order of `repos` (after duplicates are removed).
/// A repository that cannot be opened yields a single failed report and does
/// not affect the others.
pub async fn refresh_all(
    repos: &[TrackedRepo],
    options: &RefreshOptions,
    parallelism: usize,
    cancel: &CancellationToken,
) -> Vec<RepoRefresh> {
    let repos = dedup(repos);
    let semaphore = Arc::new(Semaphore::new(parallelism.max(1)));
    let mut set = JoinSet::new();

    for (index, tracked) in repos.iter().cloned().enumerate() {
        let semaphore = Arc::clone(&semaphore);
        let options = options.clone();
        let cancel = cancel.clone();
        set.spawn(async move {
            let path = tracked.path.clone();
            let result = match semaphore.acquire_owned().await {
                Ok(permit) => tokio::task::spawn_blocking(move || {
                    let _permit = permit;
                    refresh_repository(&tracked, &options, &cancel)
                })
                .await
                .unwrap_or_else(|e| Err(RippleError::Other(format!("refresh worker panicked: {e}").into()))),
                Err(e) => Err(RippleError::Other(e.to_string().into())),
            };
            (index, result.unwrap_or_else(|e| RepoRefresh::failed(&path, &e)))
        });
    }

    let mut results: Vec<Option<RepoRefresh>> = vec![None; repos.len()];
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((index, outcome)) => results[index] = Some(outcome),
            Err(e) => error!("refresh task failed: {e}"),
        }
    }

    results
        .into_iter()
        .zip(&repos)
        .map(|(outcome, tracked)| {
            outcome.unwrap_or_else(|| {
                RepoRefresh::failed(&tracked.path, &RippleError::Other("refresh task aborted".into()))
            })
        })
        .collect()
}
