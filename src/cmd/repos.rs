// ripple-rs: Git commit propagation and branch refresh
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tracked repository management.

use super::load_prefs;
use crate::cli::refresh::{ReposArgs, ReposSubcommand};
use crate::config::Config;
use crate::config::prefs::TrackedRepo;
use crate::error::Result;

/// One `repos list` line.
#[must_use]
pub fn format_tracked(repo: &TrackedRepo) -> String {
    if repo.branches.is_empty() {
        repo.path.display().to_string()
    } else {
        format!("{} [{}]", repo.path.display(), repo.branches.join(", "))
    }
}

/// Handler for the `repos` command.
///
/// # Errors
///
/// Returns an error if the path is not a repository, is already (or not)
/// tracked, or the preferences cannot be saved.
pub fn run_repos_command(args: &ReposArgs, config: &Config) -> Result<()> {
    let (path, mut prefs) = load_prefs(config)?;

    match &args.subcommand {
        ReposSubcommand::Add { path: repo, branches } => {
            let added = prefs.tracked_repos.add(repo, branches.clone())?;
            println!("tracking {}", format_tracked(added));
        }
        ReposSubcommand::Remove { path: repo } => {
            let removed = prefs.tracked_repos.remove(repo)?;
            println!("no longer tracking {}", removed.path.display());
        }
        ReposSubcommand::List => {
            if prefs.tracked_repos.is_empty() {
                println!("No tracked repositories");
            }
            for repo in prefs.tracked_repos.iter() {
                println!("{}", format_tracked(repo));
            }
            return Ok(());
        }
    }

    if config.global.dry {
        return Ok(());
    }
    prefs.save(&path)
}
