// ripple-rs: Git commit propagation and branch refresh
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Single-repository read and sync commands.
//!
//! ```text
//! branches [-C REPO] [--remotes]        inventory listing
//! log      [-C REPO] [REF] [-n N]       newest-first history
//! fetch    [-C REPO] [--prune]          fetch + changed refs
//! pull     [-C REPO] BRANCH             fetch + fast-forward, no checkout
//! ```

use clap::Args;
use std::path::PathBuf;

/// `-C REPO`, shared by every single-repository command.
#[derive(Debug, Clone, Default, Args)]
pub struct RepoArg {
    /// Repository to operate on (default: current directory, then the last
    /// repository used).
    #[arg(short = 'C', long = "repo", value_name = "DIR")]
    pub repo: Option<PathBuf>,
}

/// Arguments for the `branches` command.
#[derive(Debug, Clone, Args)]
pub struct BranchesArgs {
    #[command(flatten)]
    pub repo: RepoArg,

    /// Also list remote-tracking branches of the configured remote.
    #[arg(short = 'r', long)]
    pub remotes: bool,

    /// Print the inventory as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `log` command.
#[derive(Debug, Clone, Args)]
pub struct LogArgs {
    #[command(flatten)]
    pub repo: RepoArg,

    /// Branch or commit to list (default: HEAD).
    #[arg(value_name = "REF", default_value = "HEAD")]
    pub rev: String,

    /// Number of commits to show (default: last used, then propagate.max_commits).
    #[arg(short = 'n', long = "max-count", value_name = "N")]
    pub limit: Option<usize>,

    /// Include merge commits.
    #[arg(long)]
    pub merges: bool,

    /// Print the commits as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `fetch` command.
#[derive(Debug, Clone, Args)]
pub struct FetchArgs {
    #[command(flatten)]
    pub repo: RepoArg,

    /// Remove remote-tracking refs that no longer exist on the remote.
    #[arg(short = 'p', long)]
    pub prune: bool,

    /// Print the fetch summary as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `pull` command.
#[derive(Debug, Clone, Args)]
pub struct PullArgs {
    #[command(flatten)]
    pub repo: RepoArg,

    /// Local branch to fast-forward to its upstream.
    #[arg(value_name = "BRANCH")]
    pub branch: String,
}
