// ripple-rs: Git commit propagation and branch refresh
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Refresh and tracked-repository arguments.
//!
//! ```text
//! refresh [-C REPO | --all] [--no-fetch] [--prune] [--json]
//! repos add PATH [--branch B]...
//! repos remove PATH
//! repos list
//! ```

use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Arguments for the `refresh` command.
#[derive(Debug, Clone, Args)]
pub struct RefreshArgs {
    /// Repository to refresh (default: current directory).
    #[arg(short = 'C', long = "repo", value_name = "DIR", conflicts_with = "all")]
    pub repo: Option<PathBuf>,

    /// Refresh every tracked repository.
    #[arg(short = 'a', long)]
    pub all: bool,

    /// Use the remote-tracking refs as they are.
    #[arg(long = "no-fetch")]
    pub no_fetch: bool,

    /// Prune deleted remote branches while fetching.
    #[arg(long)]
    pub prune: bool,

    /// Only refresh these branches. Can be repeated.
    #[arg(short = 'b', long = "branch", value_name = "BRANCH")]
    pub branches: Vec<String>,

    /// Print the results as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `repos` command.
#[derive(Debug, Clone, Args)]
pub struct ReposArgs {
    #[command(subcommand)]
    pub subcommand: ReposSubcommand,
}

/// Tracked repository management.
#[derive(Debug, Clone, Subcommand)]
pub enum ReposSubcommand {
    /// Track a repository for `refresh --all`.
    Add {
        /// Repository work tree.
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Restrict refresh to these branches. Can be repeated.
        #[arg(short = 'b', long = "branch", value_name = "BRANCH")]
        branches: Vec<String>,
    },

    /// Stop tracking a repository.
    Remove {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },

    /// List tracked repositories.
    List,
}
