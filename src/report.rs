// ripple-rs: Git commit propagation and branch refresh
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Per-unit outcome records.
//!
//! Every propagation target and every tracked branch yields exactly one
//! [`OperationReport`]. Reports are built fresh per run and never merged with
//! earlier ones.

use std::fmt;

use serde::Serialize;

use crate::error::RippleError;

/// Outcome of one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Success,
    Skipped,
    Failed,
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Success => "success",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
        })
    }
}

/// Outcome record for one target branch or tracked branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationReport {
    /// Repository name (final path component).
    pub repository: String,
    pub target: String,
    pub status: OutcomeStatus,
    /// Machine tag: `conflict`, `skip-dirty`, `fast-forward`, ...
    pub detail: String,
    /// Human-readable explanation.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,
}

impl OperationReport {
    pub fn success(repository: &str, target: &str, detail: &str) -> Self {
        Self::new(repository, target, OutcomeStatus::Success, detail, String::new())
    }

    pub fn skipped(repository: &str, target: &str, detail: &str, message: impl Into<String>) -> Self {
        Self::new(repository, target, OutcomeStatus::Skipped, detail, message.into())
    }

    /// Downgrade a unit-local error into a failed report.
    pub fn failed(repository: &str, target: &str, err: &RippleError) -> Self {
        Self::new(
            repository,
            target,
            OutcomeStatus::Failed,
            err.tag(),
            err.to_string(),
        )
    }

    /// A failed report whose detail is fixed by the caller, not the error.
    pub fn failed_with(repository: &str, target: &str, detail: &str, err: &RippleError) -> Self {
        Self::new(repository, target, OutcomeStatus::Failed, detail, err.to_string())
    }

    fn new(
        repository: &str,
        target: &str,
        status: OutcomeStatus,
        detail: &str,
        message: String,
    ) -> Self {
        Self {
            repository: repository.to_string(),
            target: target.to_string(),
            status,
            detail: detail.to_string(),
            message,
        }
    }
}

impl fmt::Display for OperationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<8} {}/{} ({})",
            self.status, self.repository, self.target, self.detail
        )?;
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        Ok(())
    }
}

/// Totals over a report list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub success: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunSummary {
    #[must_use]
    pub fn of(reports: &[OperationReport]) -> Self {
        reports.iter().fold(Self::default(), |mut acc, r| {
            match r.status {
                OutcomeStatus::Success => acc.success += 1,
                OutcomeStatus::Skipped => acc.skipped += 1,
                OutcomeStatus::Failed => acc.failed += 1,
            }
            acc
        })
    }

    #[must_use]
    pub const fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Success: {}, Skipped: {}, Failed: {}",
            self.success, self.skipped, self.failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{OperationReport, OutcomeStatus, RunSummary};
    use crate::error::GitError;

    #[test]
    fn test_failed_report_carries_error_tag() {
        let err = GitError::NonFastForward {
            branch: "main".to_string(),
        }
        .into();
        let report = OperationReport::failed("api", "main", &err);
        assert_eq!(report.status, OutcomeStatus::Failed);
        assert_eq!(report.detail, "non-fast-forward");
        insta::assert_snapshot!(report.to_string(), @"failed   api/main (non-fast-forward): git error: cannot fast-forward 'main': local commits are not in upstream");
    }

    #[test]
    fn test_summary_counts() {
        let reports = vec![
            OperationReport::success("r", "a", "fast-forward"),
            OperationReport::skipped("r", "b", "skip-dirty", "dirty"),
            OperationReport::success("r", "c", "fast-forward"),
        ];
        let summary = RunSummary::of(&reports);
        assert!(!summary.has_failures());
        insta::assert_snapshot!(summary.to_string(), @"Success: 2, Skipped: 1, Failed: 0");
    }

    #[test]
    fn test_json_shape() {
        let report = OperationReport::skipped("r", "feature", "skip-dirty", "");
        let json = serde_json::to_string(&report).expect("json");
        insta::assert_snapshot!(json, @r#"{"repository":"r","target":"feature","status":"skipped","detail":"skip-dirty"}"#);
    }
}
