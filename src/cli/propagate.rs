// ripple-rs: Git commit propagation and branch refresh
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Propagate command arguments.
//!
//! ```text
//! propagate --source dev --commit a1b2 --commit c3d4 --target release/1 --target release/2
//!           [--combine [--message MSG]]
//!           [--mainline MERGE=INDEX]...
//!           [--create [--base REF]]
//!           [--push | --no-push] [--remote NAME]
//! ```

use clap::Args;

use super::repo::RepoArg;
use crate::config::types::parse_mainline;

/// Arguments for the `propagate` command.
#[derive(Debug, Clone, Args)]
pub struct PropagateArgs {
    #[command(flatten)]
    pub repo: RepoArg,

    /// Ref the commits are taken from.
    #[arg(long, value_name = "REF")]
    pub source: String,

    /// Commits to pick, oldest first. Can be repeated.
    #[arg(short = 'c', long = "commit", value_name = "ID", required = true, num_args = 1..)]
    pub commits: Vec<String>,

    /// Branches to apply the commits to, in order. Can be repeated.
    #[arg(short = 't', long = "target", value_name = "BRANCH", required = true, num_args = 1..)]
    pub targets: Vec<String>,

    /// Squash the commits into one before applying.
    #[arg(long)]
    pub combine: bool,

    /// Message for the combined commit (default: the subjects joined).
    #[arg(short = 'm', long, value_name = "MSG", requires = "combine")]
    pub message: Option<String>,

    /// Mainline parent for a merge commit, as MERGE=INDEX (0-based).
    #[arg(long, value_name = "MERGE=INDEX", value_parser = parse_mainline)]
    pub mainline: Vec<(String, usize)>,

    /// Create missing targets instead of failing them.
    #[arg(long)]
    pub create: bool,

    /// Base for created targets (default: the source ref).
    #[arg(long, value_name = "REF", requires = "create")]
    pub base: Option<String>,

    /// Push each updated target and set its upstream.
    #[arg(long, overrides_with = "no_push")]
    pub push: bool,

    /// Do not push, even if propagate.auto_push is set.
    #[arg(long = "no-push", overrides_with = "push")]
    pub no_push: bool,

    /// Remote to push to (default: git.remote).
    #[arg(long, value_name = "NAME")]
    pub remote: Option<String>,

    /// Print the reports as JSON.
    #[arg(long)]
    pub json: bool,
}

impl PropagateArgs {
    /// Resolve `--push` / `--no-push` against the configured default.
    #[must_use]
    pub const fn auto_push(&self, default: bool) -> bool {
        if self.push {
            true
        } else if self.no_push {
            false
        } else {
            default
        }
    }
}
