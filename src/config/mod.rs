// ripple-rs: Git commit propagation and branch refresh
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for ripple-rs.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low -> high)
//! 1. defaults
//! 2. ripple.toml (cwd, optional)
//! 3. --ini files (in order)
//! 4. RIPPLE_* env vars
//! 5. CLI overrides
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! RIPPLE_GLOBAL__DRY=true            -> global.dry = true
//! RIPPLE_GIT__REMOTE=upstream        -> git.remote = "upstream"
//! RIPPLE_REFRESH__MAX_PARALLEL=4     -> refresh.max_parallel = 4
//! ```
//!
//! The preferences document ([`prefs`]) is separate: it is JSON state that
//! the tool reads at the start of a run and writes back on explicit changes.

pub mod loader;
pub mod prefs;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ConfigError, Result};

use loader::ConfigLoader;
use types::{GitConfig, GlobalConfig, PreferencesConfig, PropagateConfig, RefreshConfig};

/// Name of the per-directory configuration file.
pub const LOCAL_CONFIG_FILE: &str = "ripple.toml";

/// Environment prefix for overrides.
pub const ENV_PREFIX: &str = "RIPPLE";

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Remote selection.
    pub git: GitConfig,
    /// Commit propagation defaults.
    pub propagate: PropagateConfig,
    /// Branch refresh defaults.
    pub refresh: RefreshConfig,
    /// Preferences document location.
    pub preferences: PreferencesConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use ripple_rs::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("ripple.toml")
    ///     .with_env_prefix("RIPPLE")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Reject values that deserialize but cannot work.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an empty remote name or a zero
    /// `max_commits`.
    pub fn validate(&self) -> Result<()> {
        if self.git.remote.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                section: "git".to_string(),
                key: "remote".to_string(),
                message: "remote name must not be empty".to_string(),
            }
            .into());
        }
        if self.propagate.max_commits == 0 {
            return Err(ConfigError::InvalidValue {
                section: "propagate".to_string(),
                key: "max_commits".to_string(),
                message: "must be at least 1".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Format configuration options for display.
    ///
    /// Output is deterministically ordered using `BTreeMap`.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_git_options(&mut options);
        self.format_propagate_options(&mut options);
        self.format_refresh_options(&mut options);

        let prefs = self
            .preferences
            .path
            .as_ref()
            .map_or_else(|| "(none)".to_string(), |p| p.display().to_string());
        options.insert("preferences.path".into(), prefs);

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("global.dry".into(), self.global.dry.to_string());
        options.insert(
            "global.output_log_level".into(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.log_file".into(),
            self.global
                .log_file
                .as_ref()
                .map_or_else(|| "(none)".to_string(), |p| p.display().to_string()),
        );
    }

    fn format_git_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("git.remote".into(), self.git.remote.clone());
    }

    fn format_propagate_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "propagate.max_commits".into(),
            self.propagate.max_commits.to_string(),
        );
        options.insert(
            "propagate.auto_push".into(),
            self.propagate.auto_push.to_string(),
        );
        options.insert(
            "propagate.create_missing".into(),
            self.propagate.create_missing.to_string(),
        );
        options.insert(
            "propagate.include_merges".into(),
            self.propagate.include_merges.to_string(),
        );
    }

    fn format_refresh_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "refresh.fetch_first".into(),
            self.refresh.fetch_first.to_string(),
        );
        options.insert("refresh.prune".into(), self.refresh.prune.to_string());
        options.insert(
            "refresh.max_parallel".into(),
            self.refresh.max_parallel.to_string(),
        );
    }
}
