// ripple-rs: Git commit propagation and branch refresh
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for ripple-rs using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! ripple [global options] <command>
//! version | options | inis
//! branches | log
//! propagate
//! refresh
//! fetch | pull
//! repos {add|remove|list}
//! ```

pub mod global;
pub mod propagate;
pub mod refresh;
pub mod repo;


use crate::cli::global::GlobalOptions;
use crate::cli::propagate::PropagateArgs;
use crate::cli::refresh::{RefreshArgs, ReposArgs};
use crate::cli::repo::{BranchesArgs, FetchArgs, LogArgs, PullArgs};
use clap::{Parser, Subcommand};

/// Propagate commits across branches and keep local branches up to date.
#[derive(Debug, Parser)]
#[command(
    name = "ripple",
    author,
    version,
    about = "Git commit propagation and branch refresh",
    long_about = "ripple-rs Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Cherry-picks a set of commits onto many branches, and\n\
                  fast-forwards local branches to their upstreams across one or\n\
                  more repositories. See `ripple <command> --help` for more\n\
                  information about a command.",
    after_help = "CONFIGURATION:\n\n\
                  ripple reads `ripple.toml` from the current directory if present,\n\
                  then every --ini file in order, then RIPPLE_* environment\n\
                  variables (RIPPLE_GIT__REMOTE=upstream), then --set and the\n\
                  other global flags. Tracked repositories and last-used values are\n\
                  kept in ~/.ripple/preferences.json."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their values.
    Options,

    /// Lists the configuration files used.
    Inis,

    /// Lists local branches with their upstream and ahead/behind counts.
    Branches(BranchesArgs),

    /// Lists commits, newest first.
    Log(LogArgs),

    /// Cherry-picks commits onto target branches.
    Propagate(PropagateArgs),

    /// Fast-forwards branches that are behind their upstream.
    Refresh(RefreshArgs),

    /// Fetches the configured remote.
    Fetch(FetchArgs),

    /// Fetches, then fast-forwards one branch without checking it out.
    Pull(PullArgs),

    /// Manages the tracked repositories.
    Repos(ReposArgs),
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
