// ripple-rs: Git commit propagation and branch refresh
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Refresh command implementation.

use anyhow::bail;

use super::{cancel_on_ctrl_c, check_summary, load_prefs, print_reports, resolve_repo_path};
use crate::cli::refresh::RefreshArgs;
use crate::config::Config;
use crate::config::prefs::TrackedRepo;
use crate::error::Result;
use crate::refresh::{RefreshOptions, RepoRefresh, refresh_all};
use crate::report::RunSummary;

fn options(args: &RefreshArgs, config: &Config) -> RefreshOptions {
    RefreshOptions::builder()
        .remote(config.git.remote.as_str())
        .fetch_first(config.refresh.fetch_first && !args.no_fetch)
        .prune(config.refresh.prune || args.prune)
        .dry(config.global.dry)
        .build()
}

fn print_classifications(runs: &[RepoRefresh]) {
    for run in runs {
        println!("{}:", run.repository);
        for c in &run.classifications {
            println!("  {:<16} {}: {}", c.verdict, c.branch, c.reason);
        }
    }
}

/// Run the refresh command over one repository or every tracked one.
///
/// # Errors
///
/// Returns an error if nothing is tracked for `--all`, the preferences cannot
/// be loaded, or any branch failed.
pub async fn run_refresh_command(args: &RefreshArgs, config: &Config) -> Result<()> {
    let (_, prefs) = load_prefs(config)?;

    let repos: Vec<TrackedRepo> = if args.all {
        if prefs.tracked_repos.is_empty() {
            bail!("no tracked repositories; add one with `ripple repos add PATH`");
        }
        prefs
            .tracked_repos
            .iter()
            .map(|tracked| TrackedRepo {
                path: tracked.path.clone(),
                branches: if args.branches.is_empty() {
                    tracked.branches.clone()
                } else {
                    args.branches.clone()
                },
            })
            .collect()
    } else {
        vec![TrackedRepo {
            path: resolve_repo_path(args.repo.as_deref(), &prefs),
            branches: args.branches.clone(),
        }]
    };

    let options = options(args, config);
    let runs = refresh_all(&repos, &options, config.refresh.parallelism(), &cancel_on_ctrl_c()).await;

    if options.dry() {
        if args.json {
            println!("{}", serde_json::to_string_pretty(&runs)?);
        } else {
            print_classifications(&runs);
        }
    }

    let reports: Vec<_> = runs.into_iter().flat_map(|r| r.reports).collect();
    if options.dry() && args.json {
        return check_summary(&RunSummary::of(&reports));
    }
    let summary = print_reports(&reports, args.json)?;
    check_summary(&summary)
}
