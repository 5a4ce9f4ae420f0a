// ripple-rs: Git commit propagation and branch refresh
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration loading from multiple sources.
//!
//! # Loader Pipeline
//!
//! ```text
//! ConfigLoader::new()
//!   .add_toml_file_optional("ripple.toml")   lowest
//!   .add_toml_file(--ini ...)
//!   .add_toml_str(...)
//!   .with_env_prefix("RIPPLE")
//!   .set() / .set_pair("k=v")                highest
//!        |
//!        v
//!    build() --> Config --> validate()
//! ```
//!
//! Environment keys use `_` after the prefix and `__` between section and
//! key, so `RIPPLE_PROPAGATE__MAX_COMMITS=20` sets `propagate.max_commits`.

use std::fmt;
use std::path::{Path, PathBuf};

use config::{ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};

use super::Config;
use crate::error::{ConfigError, Result};

/// A file-like layer that made it into the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// `--ini` or an explicit path; must exist.
    File(PathBuf),
    /// Picked up because it exists, e.g. `ripple.toml` in the current directory.
    Discovered(PathBuf),
    /// TOML given as a string.
    Inline,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "[file] {}", path.display()),
            Self::Discovered(path) => write!(f, "[discovered] {}", path.display()),
            Self::Inline => f.write_str("[inline]"),
        }
    }
}

/// Layered builder over `config::ConfigBuilder`; later layers win.
pub struct ConfigLoader {
    builder: ConfigBuilder<DefaultState>,
    env_prefix: Option<String>,
    sources: Vec<ConfigSource>,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: config::Config::builder(),
            env_prefix: None,
            sources: Vec::new(),
        }
    }

    /// Add a TOML file that must exist when `build()` runs.
    #[must_use]
    pub fn add_toml_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        let path = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(path).format(FileFormat::Toml).required(true));
        self.sources.push(ConfigSource::File(path.to_path_buf()));
        self
    }

    /// Add a TOML file if present. Only files that exist are listed by
    /// `loaded_files`.
    #[must_use]
    pub fn add_toml_file_optional<P: AsRef<Path>>(mut self, path: P) -> Self {
        let path = path.as_ref();
        if path.exists() {
            self.sources.push(ConfigSource::Discovered(path.to_path_buf()));
        }
        self.builder = self
            .builder
            .add_source(File::from(path).format(FileFormat::Toml).required(false));
        self
    }

    #[must_use]
    pub fn add_toml_str(mut self, content: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(content, FileFormat::Toml));
        self.sources.push(ConfigSource::Inline);
        self
    }

    /// Read `<PREFIX>_SECTION__KEY` variables at build time.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Override one key; overrides beat every other source.
    ///
    /// # Errors
    ///
    /// Returns an error if the key path is malformed.
    pub fn set<T: Into<config::Value>>(mut self, key: &str, value: T) -> Result<Self> {
        self.builder = self
            .builder
            .set_override(key, value)
            .map_err(|e| anyhow::anyhow!("cannot override '{key}': {e}"))?;
        Ok(self)
    }

    /// Override from a `section.key=value` string, as given to `--set`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if there is no `=` or no dotted
    /// key.
    pub fn set_pair(self, pair: &str) -> Result<Self> {
        let invalid = |message: &str| ConfigError::InvalidValue {
            section: "cli".to_string(),
            key: pair.to_string(),
            message: message.to_string(),
        };
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| invalid("expected section.key=value"))?;
        let key = key.trim();
        if !key.contains('.') {
            return Err(invalid("key must be section.key").into());
        }
        self.set(key, value.trim())
    }

    /// Merge every layer, deserialize and validate.
    ///
    /// # Errors
    ///
    /// Returns an error if a required file is missing, a file is not valid
    /// TOML, an environment value cannot be parsed, the merged tree does not
    /// fit `Config`, or `Config::validate` rejects it.
    pub fn build(self) -> Result<Config> {
        let builder = match &self.env_prefix {
            Some(prefix) => self.builder.add_source(
                Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            ),
            None => self.builder,
        };
        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn loaded_files(&self) -> &[ConfigSource] {
        &self.sources
    }

    /// Numbered lines for the `inis` command.
    #[must_use]
    pub fn format_loaded_files(&self) -> Vec<String> {
        self.sources
            .iter()
            .enumerate()
            .map(|(i, source)| format!("{}. {source}", i + 1))
            .collect()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
