// ripple-rs: Git commit propagation and branch refresh
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{ConfigError, GitError, PlanError, RippleError, RippleResult};

#[test]
fn test_config_error_display() {
    let err = ConfigError::InvalidValue {
        section: "propagate".to_string(),
        key: "max_commits".to_string(),
        message: "must be at least 1".to_string(),
    };
    insta::assert_snapshot!(err.to_string(), @"invalid value for 'max_commits' in section '[propagate]': must be at least 1");
}

#[test]
fn test_conflict_display_lists_files() {
    let err = GitError::CherryPickConflict {
        commit: "abc1234".to_string(),
        files: vec!["src/a.rs".to_string(), "README.md".to_string()],
    };
    insta::assert_snapshot!(err.to_string(), @"cherry-pick of abc1234 conflicts in: src/a.rs, README.md");
}

#[test]
fn test_tags_follow_taxonomy() {
    let cases: Vec<(&str, RippleError)> = vec![
        (
            "conflict",
            GitError::CherryPickConflict {
                commit: "c".into(),
                files: vec![],
            }
            .into(),
        ),
        (
            "push-error",
            GitError::PushFailed {
                branch: "b".into(),
                remote: "origin".into(),
                message: "rejected".into(),
            }
            .into(),
        ),
        (
            "non-fast-forward",
            GitError::NonFastForward { branch: "b".into() }.into(),
        ),
        (
            "checked-out-elsewhere",
            GitError::CheckedOutElsewhere {
                branch: "b".into(),
                worktree: "/w".into(),
            }
            .into(),
        ),
        (
            "branch-not-found",
            GitError::BranchNotFound { branch: "b".into() }.into(),
        ),
        ("invalid-plan", PlanError::invalid("empty").into()),
        (
            "invalid-parent-selection",
            PlanError::InvalidParentSelection {
                commit: "m".into(),
                index: 2,
                parents: 2,
            }
            .into(),
        ),
    ];

    for (expected, err) in cases {
        assert_eq!(err.tag(), expected, "wrong tag for {err}");
    }
}

#[test]
fn test_ripple_error_size() {
    // Box<str> variant (Other) are 16 bytes (fat pointer: ptr + len)
    // With discriminant + alignment = 24 bytes
    let size = std::mem::size_of::<RippleError>();
    assert!(size <= 24, "RippleError is {size} bytes, expected <= 24");
}

#[test]
fn test_ripple_result_size() {
    let size = std::mem::size_of::<RippleResult<()>>();
    assert!(size <= 24, "RippleResult<()> is {size} bytes, expected <= 24");
}
