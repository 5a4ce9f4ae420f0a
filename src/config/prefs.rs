// ripple-rs: Git commit propagation and branch refresh
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Preferences document.
//!
//! # Storage layout
//!
//! ```text
//! ~/.ripple/
//!   preferences.json   last repo, tracked repositories, last-used defaults
//! ```
//!
//! # API pattern
//!
//! Path helpers come in two forms:
//! - `fn_at(home: &Path)`: explicit home, used by tests with `TempDir`
//! - `fn()`: derives home from `dirs::home_dir()`, delegates to `_at`
//!
//! The document is read once when a command starts and written back only by
//! explicit mutations (`repos add/remove`, last-used defaults after a
//! successful propagation).

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{ConfigError, Result, RippleResult};
use crate::git::Repository;

const PREFS_DIR: &str = ".ripple";
const PREFS_FILE: &str = "preferences.json";

/// `<home>/.ripple/preferences.json`; pure, no I/O.
#[must_use]
pub fn default_path_at(home: &Path) -> PathBuf {
    home.join(PREFS_DIR).join(PREFS_FILE)
}

/// `default_path_at` using `dirs::home_dir()`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn default_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("cannot determine home directory")?;
    Ok(default_path_at(&home))
}

/// One repository considered by multi-repository refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedRepo {
    /// Canonical work tree path.
    pub path: PathBuf,
    /// Branches to refresh; empty means every local branch with an upstream.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub branches: Vec<String>,
}

impl TrackedRepo {
    /// True if `branch` is in scope for refresh.
    #[must_use]
    pub fn includes(&self, branch: &str) -> bool {
        self.branches.is_empty() || self.branches.iter().any(|b| b == branch)
    }
}

/// Ordered, duplicate-free list of tracked repositories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackedRepoSet(Vec<TrackedRepo>);

impl TrackedRepoSet {
    /// Track the repository containing `path`.
    ///
    /// # Errors
    ///
    /// Returns `GitError::RepositoryAccess` if `path` is not a repository, or
    /// `ConfigError::InvalidValue` if it is already tracked.
    pub fn add(&mut self, path: &Path, branches: Vec<String>) -> RippleResult<&TrackedRepo> {
        let repo = Repository::open(path)?;
        let canonical = repo.path().to_path_buf();
        if self.0.iter().any(|t| t.path == canonical) {
            return Err(ConfigError::InvalidValue {
                section: "tracked_repos".to_string(),
                key: canonical.display().to_string(),
                message: "repository is already tracked".to_string(),
            }
            .into());
        }
        self.0.push(TrackedRepo {
            path: canonical,
            branches,
        });
        Ok(&self.0[self.0.len() - 1])
    }

    /// Stop tracking `path`. Returns the removed entry.
    ///
    /// Matches on the canonical path when `path` still exists, so a deleted
    /// repository can still be removed by its stored path.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `path` is not tracked.
    pub fn remove(&mut self, path: &Path) -> RippleResult<TrackedRepo> {
        let index = self.position(path).ok_or_else(|| not_tracked(path))?;
        Ok(self.0.remove(index))
    }

    /// Replace the branch filter of a tracked repository.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `path` is not tracked.
    pub fn set_branches(&mut self, path: &Path, branches: Vec<String>) -> RippleResult<()> {
        let index = self.position(path).ok_or_else(|| not_tracked(path))?;
        self.0[index].branches = branches;
        Ok(())
    }

    fn position(&self, path: &Path) -> Option<usize> {
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        self.0.iter().position(|t| t.path == key || t.path == path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackedRepo> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn not_tracked(path: &Path) -> crate::error::RippleError {
    ConfigError::InvalidValue {
        section: "tracked_repos".to_string(),
        key: path.display().to_string(),
        message: "repository is not tracked".to_string(),
    }
    .into()
}

/// Last-used propagation defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropagatePrefs {
    pub max_commits: usize,
    pub auto_push: bool,
}

impl Default for PropagatePrefs {
    fn default() -> Self {
        Self {
            max_commits: 50,
            auto_push: false,
        }
    }
}

/// Cleanup defaults; stored for the cleanup tool, unused by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupPrefs {
    pub default_prefix: String,
    pub default_days: u32,
}

impl Default for CleanupPrefs {
    fn default() -> Self {
        Self {
            default_prefix: "feature/".to_string(),
            default_days: 30,
        }
    }
}

/// The preferences document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub last_repo_path: Option<PathBuf>,
    pub tracked_repos: TrackedRepoSet,
    pub propagate: PropagatePrefs,
    pub cleanup: CleanupPrefs,
}

impl Preferences {
    /// Load from `path`; a missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadError` if the file exists but cannot be read,
    /// `ConfigError::ParseError` if it is not a valid document.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no preferences file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::ReadError {
                    path: path.display().to_string(),
                    source,
                }
                .into());
            }
        };
        serde_json::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Write to `path`, creating the parent directory. The document goes to a
    /// uniquely named temp file beside `path` and is persisted over it, so
    /// concurrent runs never see a half-written file.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;

        let mut file = NamedTempFile::new_in(parent)
            .with_context(|| format!("failed to create temp file in {}", parent.display()))?;
        serde_json::to_writer_pretty(&mut file, self)?;
        file.flush()
            .with_context(|| format!("failed to write {}", file.path().display()))?;
        file.persist(path)
            .with_context(|| format!("failed to replace {}", path.display()))?;
        debug!(path = %path.display(), "saved preferences");
        Ok(())
    }
}
