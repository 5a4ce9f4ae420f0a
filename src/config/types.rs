// ripple-rs: Git commit propagation and branch refresh
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration section types.
//!
//! ```text
//! Config: GlobalConfig, GitConfig, PropagateConfig, RefreshConfig,
//!         PreferencesConfig
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::logging::LogLevel;

/// Global configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Validate and print what would happen without touching any repository.
    pub dry: bool,
    /// Log level for console output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Path to log file; no file logging when unset.
    pub log_file: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            dry: false,
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::DEBUG,
            log_file: None,
        }
    }
}

/// Git transport options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitConfig {
    /// Remote used for fetch, push and upstream comparison.
    pub remote: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
        }
    }
}

/// Defaults for commit propagation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PropagateConfig {
    /// Commits listed by `log` when no limit is given.
    pub max_commits: usize,
    /// Push each target with upstream tracking after a successful pick.
    pub auto_push: bool,
    /// Create missing targets from the base ref instead of failing them.
    pub create_missing: bool,
    /// Show merge commits in `log` by default.
    pub include_merges: bool,
}

impl Default for PropagateConfig {
    fn default() -> Self {
        Self {
            max_commits: 50,
            auto_push: false,
            create_missing: false,
            include_merges: false,
        }
    }
}

/// Defaults for branch refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RefreshConfig {
    /// Fetch the remote before classifying.
    pub fetch_first: bool,
    /// Prune deleted remote branches while fetching.
    pub prune: bool,
    /// Repositories refreshed at once; 0 means one per CPU.
    pub max_parallel: usize,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            fetch_first: true,
            prune: false,
            max_parallel: 0,
        }
    }
}

impl RefreshConfig {
    /// Effective parallelism, resolving 0 to the number of CPUs.
    #[must_use]
    pub fn parallelism(&self) -> usize {
        if self.max_parallel > 0 {
            return self.max_parallel;
        }
        std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
    }
}

/// Where the preferences document lives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreferencesConfig {
    /// Override for `~/.ripple/preferences.json`.
    pub path: Option<PathBuf>,
}

/// Parse a `--mainline ID=INDEX` pair.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` when the pair is malformed.
pub fn parse_mainline(raw: &str) -> std::result::Result<(String, usize), ConfigError> {
    let invalid = |message: String| ConfigError::InvalidValue {
        section: "propagate".to_string(),
        key: "mainline".to_string(),
        message,
    };
    let (id, index) = raw
        .split_once('=')
        .ok_or_else(|| invalid(format!("expected COMMIT=INDEX, got '{raw}'")))?;
    if id.trim().is_empty() {
        return Err(invalid(format!("missing commit in '{raw}'")));
    }
    let index = index
        .trim()
        .parse::<usize>()
        .map_err(|e| invalid(format!("bad parent index in '{raw}': {e}")))?;
    Ok((id.trim().to_string(), index))
}
