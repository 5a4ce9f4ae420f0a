// ripple-rs: Git commit propagation and branch refresh
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Config-related commands and configuration assembly.

use crate::cli::global::GlobalOptions;
use crate::config::loader::ConfigLoader;
use crate::config::{Config, ENV_PREFIX, LOCAL_CONFIG_FILE};
use crate::error::Result;

/// Layer every configuration source for this invocation: defaults,
/// `ripple.toml`, `--ini` files, `RIPPLE_*` environment, then CLI overrides.
///
/// # Errors
///
/// Returns an error if an override is not of the form `section.key=value`.
/// Files are only read by `build()`.
pub fn build_config_loader(global: &GlobalOptions) -> Result<ConfigLoader> {
    let mut loader = ConfigLoader::new().add_toml_file_optional(LOCAL_CONFIG_FILE);
    for ini_path in &global.inis {
        loader = loader.add_toml_file(ini_path);
    }
    loader = loader.with_env_prefix(ENV_PREFIX);

    for option in global.to_config_overrides() {
        loader = loader.set_pair(&option)?;
    }
    Ok(loader)
}

/// Load the configuration for this invocation.
///
/// # Errors
///
/// Returns an error if any source is invalid or the result fails validation.
pub fn load_config(global: &GlobalOptions) -> Result<Config> {
    build_config_loader(global)?.build()
}

/// Display current configuration options.
pub fn run_options_command(config: &Config) {
    for line in config.format_options() {
        println!("{line}");
    }
}

/// Display loaded configuration files.
pub fn run_inis_command(config_files: &[String]) {
    if config_files.is_empty() {
        println!("No configuration files loaded");
    } else {
        for line in config_files {
            println!("{line}");
        }
    }
}
