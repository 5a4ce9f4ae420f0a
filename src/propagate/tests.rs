// ripple-rs: Git commit propagation and branch refresh
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::collections::BTreeMap;
use std::path::Path;

use proptest::prelude::*;
use tokio_util::sync::CancellationToken;

use super::lease::WorktreeLease;
use super::{PropagationPlan, finish, propagate, resolve_parent};
use crate::error::PlanError;
use crate::git::fixture::{Fixture, commit_file, git, head, init_repo, tip};
use crate::git::history::lookup;
use crate::git::{CommitRecord, Head, Repository};
use crate::report::OutcomeStatus;

fn record(id: &str, parents: usize) -> CommitRecord {
    CommitRecord {
        id: id.to_string(),
        parents: (0..parents).map(|i| format!("{id}-p{i}")).collect(),
        author_name: "Test".to_string(),
        author_email: "test@example.com".to_string(),
        timestamp: 0,
        subject: format!("subject {id}"),
    }
}

fn refs_snapshot(path: &Path) -> String {
    git(path, &["for-each-ref", "--format=%(refname) %(objectname)"])
}

/// `main` with targets `b1`, `b2` and a `source` branch holding three
/// commits; `b2` already has its own `conflict.txt`, so the second pick
/// conflicts there.
struct Scenario {
    _temp: tempfile::TempDir,
    path: std::path::PathBuf,
    picks: Vec<String>,
}

impl Scenario {
    fn new() -> Self {
        let temp = tempfile::tempdir().expect("temp");
        let path = temp.path().join("repo");
        init_repo(&path);
        git(&path, &["branch", "b1"]);
        git(&path, &["branch", "b2"]);

        git(&path, &["checkout", "--quiet", "-b", "source"]);
        let c1 = commit_file(&path, "a.txt", "a\n", "add a");
        let c2 = commit_file(&path, "conflict.txt", "source\n", "add conflict");
        let c3 = commit_file(&path, "c.txt", "c\n", "add c");

        git(&path, &["checkout", "--quiet", "b2"]);
        commit_file(&path, "conflict.txt", "b2\n", "b2 own conflict");
        git(&path, &["checkout", "--quiet", "main"]);

        Self {
            _temp: temp,
            path,
            picks: vec![c1, c2, c3],
        }
    }

    fn records(&self) -> Vec<CommitRecord> {
        lookup(&self.path, &self.picks).expect("lookup")
    }

    fn plan(&self, targets: &[&str]) -> PropagationPlan {
        PropagationPlan::builder()
            .source("source")
            .commits(self.records())
            .targets(targets.iter().map(|t| (*t).to_string()).collect())
            .build()
    }
}

fn subjects(path: &Path, range: &str) -> Vec<String> {
    git(path, &["log", "--format=%s", range])
        .lines()
        .map(str::to_string)
        .collect()
}

// =============================================================================
// Pure plan validation
// =============================================================================

#[test]
fn test_resolve_parent_defaults_to_mainline() {
    let merge = record("m", 2);
    assert_eq!(resolve_parent(&merge, None).expect("default"), 0);
    assert_eq!(resolve_parent(&merge, Some(1)).expect("explicit"), 1);
    assert!(matches!(
        resolve_parent(&merge, Some(2)),
        Err(PlanError::InvalidParentSelection {
            index: 2,
            parents: 2,
            ..
        })
    ));
}

#[test]
fn test_validate_resolves_mainline_only_for_merges() {
    let plan = PropagationPlan::builder()
        .source("dev")
        .commits(vec![record("a", 1), record("m", 3)])
        .parent_choices(BTreeMap::from([("m".to_string(), 2)]))
        .targets(vec!["release".to_string()])
        .build();

    let steps = plan.validate().expect("valid");
    assert_eq!(steps[0].mainline, None);
    assert_eq!(steps[1].mainline, Some(3), "git -m is one-based");
}

#[test]
fn test_validate_rejects_bad_plans() {
    let base = || {
        PropagationPlan::builder()
            .source("dev")
            .targets(vec!["release".to_string()])
    };

    let cases: Vec<(&str, PropagationPlan)> = vec![
        ("no commits", base().commits(vec![]).build()),
        (
            "no targets",
            PropagationPlan::builder()
                .source("dev")
                .commits(vec![record("a", 1)])
                .targets(vec![])
                .build(),
        ),
        (
            "duplicate commit",
            base().commits(vec![record("a", 1), record("a", 1)]).build(),
        ),
        (
            "target is source",
            PropagationPlan::builder()
                .source("dev")
                .commits(vec![record("a", 1)])
                .targets(vec!["dev".to_string()])
                .build(),
        ),
        (
            "choice for unselected commit",
            base()
                .commits(vec![record("a", 1)])
                .parent_choices(BTreeMap::from([("zzz".to_string(), 0)]))
                .build(),
        ),
        (
            "combine across merge",
            base()
                .commits(vec![record("a", 1), record("m", 2)])
                .combine(true)
                .build(),
        ),
        (
            "combine from root",
            base().commits(vec![record("r", 0)]).combine(true).build(),
        ),
    ];

    for (name, plan) in cases {
        let err = plan.validate().expect_err(name);
        assert_eq!(err.tag(), "invalid-plan", "{name}: {err}");
    }
}

#[test]
fn test_describe_lists_steps() {
    let plan = PropagationPlan::builder()
        .source("dev")
        .commits(vec![record("aaaaaaaaaa", 1), record("mmmmmmmmmm", 2)])
        .targets(vec!["release".to_string()])
        .create_missing(true)
        .auto_push(true)
        .build();
    insta::assert_snapshot!(plan.describe().expect("valid").join("\n"), @r"
    create release from dev if missing
    checkout release
    cherry-pick aaaaaaa
    cherry-pick -m 1 mmmmmmm
    push -u origin release
    ");
}

fn arb_commits() -> impl Strategy<Value = Vec<CommitRecord>> {
    prop::collection::vec(1usize..=3, 1..6).prop_map(|counts| {
        counts
            .into_iter()
            .enumerate()
            .map(|(i, parents)| record(&format!("c{i}"), parents))
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_combine_with_merge_is_invalid(commits in arb_commits()) {
        let has_merge = commits.iter().any(CommitRecord::is_merge);
        let plan = PropagationPlan::builder()
            .source("dev")
            .commits(commits)
            .combine(true)
            .targets(vec!["t".to_string()])
            .build();
        let result = plan.validate();
        if has_merge {
            prop_assert!(
                matches!(result, Err(PlanError::InvalidPlan { .. })),
                "combining a merge must be rejected, got {:?}",
                result
            );
        } else {
            prop_assert!(result.is_ok());
        }
    }

    #[test]
    fn prop_parent_index_bounds(parents in 1usize..5, index in 0usize..8) {
        let commit = record("m", parents);
        let result = resolve_parent(&commit, Some(index));
        prop_assert_eq!(result.is_ok(), index < parents);
    }
}

// =============================================================================
// Engine against real repositories
// =============================================================================

#[test]
fn test_conflict_on_one_target_is_isolated() {
    let sc = Scenario::new();
    let b2_before = tip(&sc.path, "b2");
    let mut repo = Repository::open(&sc.path).expect("open");

    let reports = propagate(&mut repo, &sc.plan(&["b1", "b2"]), &CancellationToken::new())
        .expect("propagate");

    let outcome: Vec<_> = reports
        .iter()
        .map(|r| (r.target.as_str(), r.status, r.detail.as_str()))
        .collect();
    assert_eq!(
        outcome,
        vec![
            ("b1", OutcomeStatus::Success, "applied"),
            ("b2", OutcomeStatus::Failed, "conflict"),
        ]
    );

    assert_eq!(
        subjects(&sc.path, "main..b1"),
        vec!["add c", "add conflict", "add a"]
    );
    assert_eq!(tip(&sc.path, "b2"), b2_before, "b2 left at its pre-run tip");
    assert_eq!(repo.head(), &Head::Branch("main".to_string()));
    assert!(!repo.is_dirty());
}

#[test]
fn test_combine_across_merge_mutates_nothing() {
    let temp = tempfile::tempdir().expect("temp");
    let path = temp.path();
    init_repo(path);
    git(path, &["branch", "target"]);
    git(path, &["checkout", "--quiet", "-b", "side"]);
    commit_file(path, "s.txt", "s\n", "side");
    git(path, &["checkout", "--quiet", "main"]);
    let a = commit_file(path, "a.txt", "a\n", "a");
    git(path, &["merge", "--quiet", "--no-ff", "-m", "merge side", "side"]);
    let merge = head(path);

    let before = refs_snapshot(path);
    let mut repo = Repository::open(path).expect("open");
    let plan = PropagationPlan::builder()
        .source("main")
        .commits(lookup(path, &[a, merge]).expect("lookup"))
        .combine(true)
        .targets(vec!["target".to_string()])
        .build();

    let err = propagate(&mut repo, &plan, &CancellationToken::new()).expect_err("invalid");
    assert_eq!(err.tag(), "invalid-plan");
    assert_eq!(refs_snapshot(path), before);
}

#[test]
fn test_out_of_range_parent_fails_before_checkout() {
    let temp = tempfile::tempdir().expect("temp");
    let path = temp.path();
    init_repo(path);
    git(path, &["branch", "target"]);
    git(path, &["checkout", "--quiet", "-b", "side"]);
    commit_file(path, "s.txt", "s\n", "side");
    git(path, &["checkout", "--quiet", "main"]);
    git(path, &["merge", "--quiet", "--no-ff", "-m", "merge side", "side"]);
    let merge = head(path);
    let reflog_before = git(path, &["reflog", "--format=%H"]);

    let mut repo = Repository::open(path).expect("open");
    let plan = PropagationPlan::builder()
        .source("main")
        .commits(lookup(path, std::slice::from_ref(&merge)).expect("lookup"))
        .parent_choices(BTreeMap::from([(merge, 2)]))
        .targets(vec!["target".to_string()])
        .build();

    let err = propagate(&mut repo, &plan, &CancellationToken::new()).expect_err("invalid");
    assert_eq!(err.tag(), "invalid-parent-selection");
    assert_eq!(git(path, &["reflog", "--format=%H"]), reflog_before);
}

#[test]
fn test_merge_commit_picked_against_chosen_parent() {
    let temp = tempfile::tempdir().expect("temp");
    let path = temp.path();
    init_repo(path);
    git(path, &["branch", "target"]);
    git(path, &["checkout", "--quiet", "-b", "side"]);
    commit_file(path, "s.txt", "s\n", "side");
    git(path, &["checkout", "--quiet", "main"]);
    git(path, &["merge", "--quiet", "--no-ff", "-m", "merge side", "side"]);
    let merge = head(path);

    let mut repo = Repository::open(path).expect("open");
    let plan = PropagationPlan::builder()
        .source("main")
        .commits(lookup(path, &[merge]).expect("lookup"))
        .targets(vec!["target".to_string()])
        .build();

    let reports = propagate(&mut repo, &plan, &CancellationToken::new()).expect("propagate");
    assert_eq!(reports[0].status, OutcomeStatus::Success);
    assert_eq!(git(path, &["show", "target:s.txt"]), "s");
}

#[test]
fn test_missing_target_fails_alone_or_is_created() {
    let sc = Scenario::new();
    let mut repo = Repository::open(&sc.path).expect("open");

    let reports = propagate(&mut repo, &sc.plan(&["ghost", "b1"]), &CancellationToken::new())
        .expect("propagate");
    assert_eq!(reports[0].detail, "branch-not-found");
    assert_eq!(reports[1].status, OutcomeStatus::Success);

    let plan = PropagationPlan::builder()
        .source("source")
        .commits(sc.records())
        .targets(vec!["fresh".to_string()])
        .create_missing(true)
        .base_ref("main")
        .build();
    let reports = propagate(&mut repo, &plan, &CancellationToken::new()).expect("propagate");
    assert_eq!(reports[0].status, OutcomeStatus::Success);
    assert_eq!(subjects(&sc.path, "main..fresh").len(), 3);
}

#[test]
fn test_combine_applies_one_composite_commit() {
    let sc = Scenario::new();
    let mut repo = Repository::open(&sc.path).expect("open");
    let plan = PropagationPlan::builder()
        .source("source")
        .commits(sc.records())
        .combine(true)
        .targets(vec!["b1".to_string()])
        .build();

    let reports = propagate(&mut repo, &plan, &CancellationToken::new()).expect("propagate");
    assert_eq!(reports[0].status, OutcomeStatus::Success);

    let message = git(&sc.path, &["log", "-1", "--format=%B", "b1"]);
    insta::assert_snapshot!(message, @r"
    add a

    add conflict

    add c
    ");
    assert_eq!(subjects(&sc.path, "main..b1").len(), 1);
    assert_eq!(repo.head(), &Head::Branch("main".to_string()));
}

#[test]
fn test_cancelled_run_skips_every_target() {
    let sc = Scenario::new();
    let b1_before = tip(&sc.path, "b1");
    let mut repo = Repository::open(&sc.path).expect("open");
    let cancel = CancellationToken::new();
    cancel.cancel();

    let reports = propagate(&mut repo, &sc.plan(&["b1", "b2"]), &cancel).expect("propagate");
    assert!(reports
        .iter()
        .all(|r| r.status == OutcomeStatus::Skipped && r.detail == "cancelled"));
    assert_eq!(tip(&sc.path, "b1"), b1_before);
}

#[test]
fn test_dirty_tree_is_rejected_before_mutation() {
    let sc = Scenario::new();
    std::fs::write(sc.path.join("wip.txt"), "wip").expect("write");
    let mut repo = Repository::open(&sc.path).expect("open");

    let err = propagate(&mut repo, &sc.plan(&["b1"]), &CancellationToken::new())
        .expect_err("dirty");
    assert_eq!(err.tag(), "dirty");
}

#[test]
fn test_detached_head_is_restored() {
    let sc = Scenario::new();
    let main = tip(&sc.path, "main");
    git(&sc.path, &["checkout", "--quiet", "--detach", "main"]);
    let mut repo = Repository::open(&sc.path).expect("open");

    propagate(&mut repo, &sc.plan(&["b1"]), &CancellationToken::new()).expect("propagate");
    assert_eq!(repo.head(), &Head::Detached(main));
}

#[test]
fn test_auto_push_sets_upstream_and_push_failure_is_reported() {
    let fx = Fixture::new();
    git(&fx.work, &["branch", "release"]);
    git(&fx.work, &["checkout", "--quiet", "-b", "dev"]);
    let pick = commit_file(&fx.work, "fix.txt", "fix\n", "fix");
    git(&fx.work, &["checkout", "--quiet", "main"]);
    let records = lookup(&fx.work, &[pick]).expect("lookup");
    let mut repo = Repository::open(&fx.work).expect("open");

    let plan = PropagationPlan::builder()
        .source("dev")
        .commits(records.clone())
        .targets(vec!["release".to_string()])
        .auto_push(true)
        .build();
    let reports = propagate(&mut repo, &plan, &CancellationToken::new()).expect("propagate");
    assert_eq!(reports[0].detail, "pushed");
    assert_eq!(
        git(&fx.work, &["rev-parse", "--abbrev-ref", "release@{upstream}"]),
        "origin/release"
    );

    git(&fx.work, &["branch", "hotfix"]);
    let plan = PropagationPlan::builder()
        .source("dev")
        .commits(records)
        .targets(vec!["hotfix".to_string()])
        .auto_push(true)
        .remote("nowhere")
        .build();
    let reports = propagate(&mut repo, &plan, &CancellationToken::new()).expect("propagate");
    assert_eq!(reports[0].status, OutcomeStatus::Failed);
    assert_eq!(reports[0].detail, "push-error");
    assert_eq!(subjects(&fx.work, "main..hotfix"), vec!["fix"], "local pick kept");
}

#[test]
fn test_finish_survives_unreadable_repository() {
    let temp = tempfile::tempdir().expect("temp");
    let path = temp.path().join("repo");
    init_repo(&path);
    let mut repo = Repository::open(&path).expect("open");
    let lease = WorktreeLease::acquire(&repo);

    let git_dir = path.join(".git");
    let hidden = path.join("git-hidden");
    std::fs::rename(&git_dir, &hidden).expect("hide .git");
    finish(lease, &mut repo);
    std::fs::rename(&hidden, &git_dir).expect("restore .git");

    assert_eq!(repo.head(), &Head::Branch("main".to_string()));
}
