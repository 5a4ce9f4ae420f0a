// ripple-rs: Git commit propagation and branch refresh
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Single-repository commands: branches, log, fetch, pull.

use anyhow::Context;

use super::{load_prefs, resolve_repo_path};
use crate::cli::repo::{BranchesArgs, FetchArgs, LogArgs, PullArgs};
use crate::config::Config;
use crate::error::Result;
use crate::git::history::log_view;
use crate::git::{BranchRef, Repository};
use crate::sync::{self, PullOutcome};

fn track_summary(branch: &BranchRef) -> String {
    match (&branch.upstream, branch.ahead, branch.behind) {
        (Some(upstream), Some(ahead), Some(behind)) => {
            format!("[{upstream}: ahead {ahead}, behind {behind}]")
        }
        (Some(upstream), ..) => format!("[{upstream}]"),
        (None, ..) => String::new(),
    }
}

/// Format one inventory row the way `branches` prints it.
#[must_use]
pub fn format_branch(branch: &BranchRef, current: Option<&str>) -> String {
    let marker = if current == Some(branch.name.as_str()) { '*' } else { ' ' };
    let line = format!(
        "{marker} {:<24} {} {}",
        branch.name,
        crate::git::repo::short_id(&branch.tip),
        track_summary(branch)
    );
    line.trim_end().to_string()
}

/// List branches with upstream and ahead/behind counts.
///
/// # Errors
///
/// Returns an error if the repository cannot be opened or its refs read.
pub fn run_branches_command(args: &BranchesArgs, config: &Config) -> Result<()> {
    let (_, prefs) = load_prefs(config)?;
    let repo = Repository::open(&resolve_repo_path(args.repo.repo.as_deref(), &prefs))?;
    let remote = args.remotes.then_some(config.git.remote.as_str());
    let inventory = repo.inventory(remote)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&inventory)?);
        return Ok(());
    }
    for branch in inventory.refs() {
        println!("{}", format_branch(branch, repo.current_branch()));
    }
    Ok(())
}

/// List history newest first. Without `-n` the last limit used is applied,
/// falling back to `propagate.max_commits`.
///
/// # Errors
///
/// Returns an error if the repository cannot be opened or `REF` does not
/// resolve.
pub fn run_log_command(args: &LogArgs, config: &Config) -> Result<()> {
    let (prefs_path, mut prefs) = load_prefs(config)?;
    let repo = Repository::open(&resolve_repo_path(args.repo.repo.as_deref(), &prefs))?;
    let limit = match args.limit {
        Some(n) => n,
        None if prefs_path.exists() => prefs.propagate.max_commits,
        None => config.propagate.max_commits,
    };
    let include_merges = args.merges || config.propagate.include_merges;

    let commits = log_view(repo.path(), &args.rev, Some(limit), include_merges)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    if let Some(n) = args.limit
        && n != prefs.propagate.max_commits
    {
        prefs.propagate.max_commits = n;
        prefs.save(&prefs_path)?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&commits)?);
        return Ok(());
    }
    for commit in &commits {
        let merge = if commit.is_merge() { " (merge)" } else { "" };
        println!(
            "{} {}{merge} <{}>",
            commit.short_id(),
            commit.subject,
            commit.author_name
        );
    }
    Ok(())
}

/// Fetch the configured remote and list changed remote-tracking refs.
///
/// # Errors
///
/// Returns an error if the repository cannot be opened or the fetch fails.
pub fn run_fetch_command(args: &FetchArgs, config: &Config) -> Result<()> {
    let (_, prefs) = load_prefs(config)?;
    let repo = Repository::open(&resolve_repo_path(args.repo.repo.as_deref(), &prefs))?;
    let prune = args.prune || config.refresh.prune;
    if config.global.dry {
        println!("would fetch {}{}", config.git.remote, if prune { " --prune" } else { "" });
        return Ok(());
    }
    let summary = sync::fetch(&repo, &config.git.remote, prune)
        .with_context(|| format!("failed to fetch {}", config.git.remote))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }
    if summary.is_empty() {
        println!("{}: no changes", summary.remote);
    }
    for (label, names) in [
        ("new", &summary.added),
        ("updated", &summary.updated),
        ("pruned", &summary.removed),
    ] {
        for name in names {
            println!("{label:<8} {name}");
        }
    }
    Ok(())
}

/// Fast-forward one branch to its upstream without checking it out.
///
/// # Errors
///
/// Returns an error if the branch is missing, has no upstream, has diverged,
/// or is checked out with uncommitted changes.
pub fn run_pull_command(args: &PullArgs, config: &Config) -> Result<()> {
    let (_, prefs) = load_prefs(config)?;
    let mut repo = Repository::open(&resolve_repo_path(args.repo.repo.as_deref(), &prefs))?;
    if config.global.dry {
        println!("would fast-forward {} from {}", args.branch, config.git.remote);
        return Ok(());
    }
    match sync::pull(&mut repo, &args.branch, &config.git.remote)? {
        PullOutcome::UpToDate => println!("{}: up to date", args.branch),
        PullOutcome::FastForwarded { from, to } => println!(
            "{}: {}..{}",
            args.branch,
            crate::git::repo::short_id(&from),
            crate::git::repo::short_id(&to)
        ),
    }
    Ok(())
}
