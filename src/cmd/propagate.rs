// ripple-rs: Git commit propagation and branch refresh
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Propagate command implementation.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, anyhow};
use tracing::info;

use super::{check_summary, load_prefs, print_reports, resolve_repo_path};
use crate::cli::propagate::PropagateArgs;
use crate::config::Config;
use crate::error::Result;
use crate::git::history::lookup;
use crate::git::{Repository, cmd};
use crate::propagate::{PropagationPlan, propagate};

/// Map `--mainline` pairs to full commit ids.
fn resolve_parent_choices(
    repo_path: &Path,
    pairs: &[(String, usize)],
) -> Result<BTreeMap<String, usize>> {
    pairs
        .iter()
        .map(|(id, index)| {
            let full = cmd::resolve_commit(repo_path, id)?
                .ok_or_else(|| anyhow!("--mainline names unknown commit '{id}'"))?;
            Ok((full, *index))
        })
        .collect()
}

/// Build the plan described by `args` for the repository at `repo_path`.
///
/// # Errors
///
/// Returns an error if a selected commit or `--mainline` id does not resolve.
pub fn build_plan(args: &PropagateArgs, config: &Config, repo_path: &Path) -> Result<PropagationPlan> {
    let commits = lookup(repo_path, &args.commits)?;
    let parent_choices = resolve_parent_choices(repo_path, &args.mainline)?;
    let remote = args.remote.clone().unwrap_or_else(|| config.git.remote.clone());

    Ok(PropagationPlan::builder()
        .source(args.source.as_str())
        .commits(commits)
        .combine(args.combine)
        .maybe_message(args.message.clone())
        .parent_choices(parent_choices)
        .targets(args.targets.clone())
        .create_missing(args.create || config.propagate.create_missing)
        .maybe_base_ref(args.base.clone())
        .auto_push(args.auto_push(config.propagate.auto_push))
        .remote(remote)
        .build())
}

/// Run the propagate command.
///
/// With `--dry` the plan is validated and its steps printed; nothing is
/// checked out.
///
/// # Errors
///
/// Returns an error if the repository cannot be opened, the plan is invalid,
/// the working tree is dirty, or any target failed.
pub async fn run_propagate_command(args: &PropagateArgs, config: &Config) -> Result<()> {
    let (prefs_path, mut prefs) = load_prefs(config)?;
    let repo_path = resolve_repo_path(args.repo.repo.as_deref(), &prefs);
    let mut repo = Repository::open(&repo_path)?;
    let plan = build_plan(args, config, repo.path())?;

    if config.global.dry {
        for line in plan.describe()? {
            println!("{line}");
        }
        return Ok(());
    }

    let cancel = super::cancel_on_ctrl_c();
    let task_plan = plan.clone();
    let (repo, reports) = tokio::task::spawn_blocking(move || {
        let reports = propagate(&mut repo, &task_plan, &cancel);
        (repo, reports)
    })
    .await
    .context("propagation worker panicked")?;
    let reports = reports?;

    let summary = print_reports(&reports, args.json)?;

    prefs.last_repo_path = Some(repo.path().to_path_buf());
    prefs.propagate.auto_push = plan.auto_push();
    prefs
        .save(&prefs_path)
        .with_context(|| format!("failed to save preferences to {}", prefs_path.display()))?;
    info!(repo = %repo.name(), %summary, "propagation finished");

    check_summary(&summary)
}
