// ripple-rs: Git commit propagation and branch refresh
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for configuration loading.
//!
//! Covers TOML parsing, file layering, CLI overrides and the preferences
//! document round trip through the public API.

use std::path::PathBuf;

use clap::Parser;
use ripple_rs::cli::Cli;
use ripple_rs::cmd::config::{build_config_loader, load_config};
use ripple_rs::config::Config;
use ripple_rs::config::prefs::{Preferences, default_path_at};
use ripple_rs::logging::LogLevel;
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

// =============================================================================
// Parsing
// =============================================================================

#[test]
fn config_parse_minimal() {
    let config = Config::parse("").unwrap();
    assert!(!config.global.dry);
    assert_eq!(config.global.output_log_level, LogLevel::INFO);
    assert_eq!(config.git.remote, "origin");
    assert_eq!(config.propagate.max_commits, 50);
    assert!(config.refresh.fetch_first);
    assert!(config.preferences.path.is_none());
}

#[test]
fn config_parse_all_sections() {
    let config = Config::parse(
        r#"
[global]
dry = true
output_log_level = 2
log_file = "/var/log/ripple.log"

[git]
remote = "upstream"

[propagate]
max_commits = 20
auto_push = true
create_missing = true
include_merges = true

[refresh]
fetch_first = false
prune = true
max_parallel = 4

[preferences]
path = "/tmp/ripple-prefs.json"
"#,
    )
    .unwrap();

    assert!(config.global.dry);
    assert_eq!(config.global.output_log_level, LogLevel::WARN);
    assert_eq!(config.global.log_file, Some(PathBuf::from("/var/log/ripple.log")));
    assert_eq!(config.git.remote, "upstream");
    assert_eq!(config.propagate.max_commits, 20);
    assert!(config.propagate.auto_push);
    assert!(config.propagate.create_missing);
    assert!(config.propagate.include_merges);
    assert!(!config.refresh.fetch_first);
    assert!(config.refresh.prune);
    assert_eq!(config.refresh.parallelism(), 4);
    assert_eq!(
        config.preferences.path,
        Some(PathBuf::from("/tmp/ripple-prefs.json"))
    );
}

#[test]
fn config_parse_rejects_zero_max_commits() {
    let err = Config::parse("[propagate]\nmax_commits = 0\n").unwrap_err();
    assert!(format!("{err:#}").contains("max_commits"), "{err:#}");
}

#[test]
fn config_parse_rejects_unknown_section() {
    assert!(Config::parse("[tasks]\nfoo = 1\n").is_err());
}

// =============================================================================
// Layering
// =============================================================================

#[test]
fn config_builder_layered_files() {
    let temp = temp_dir();
    let base = temp.path().join("base.toml");
    let local = temp.path().join("local.toml");
    std::fs::write(&base, "[git]\nremote = \"upstream\"\n\n[propagate]\nmax_commits = 10\n").unwrap();
    std::fs::write(&local, "[propagate]\nmax_commits = 30\n").unwrap();

    let loader = Config::builder().add_toml_file(&base).add_toml_file(&local);
    assert_eq!(loader.loaded_files().len(), 2);
    let config = loader.build().unwrap();

    assert_eq!(config.git.remote, "upstream", "earlier layer survives");
    assert_eq!(config.propagate.max_commits, 30, "later layer wins");
}

#[test]
fn config_builder_missing_required_file_fails() {
    let temp = temp_dir();
    let result = Config::from_file(temp.path().join("absent.toml"));
    assert!(result.is_err());
}

#[test]
fn config_builder_set_override() {
    let config = Config::builder()
        .add_toml_str("[refresh]\nprune = false\n")
        .set("refresh.prune", true)
        .unwrap()
        .build()
        .unwrap();
    assert!(config.refresh.prune);
}

#[test]
fn config_cli_ini_and_set_layering() {
    let temp = temp_dir();
    let ini = temp.path().join("team.toml");
    std::fs::write(&ini, "[git]\nremote = \"team\"\n\n[refresh]\nmax_parallel = 2\n").unwrap();

    let cli = Cli::try_parse_from([
        "ripple",
        "-i",
        ini.to_str().unwrap(),
        "-s",
        "refresh.max_parallel=6",
        "options",
    ])
    .unwrap();
    let loader = build_config_loader(&cli.global).unwrap();
    assert!(
        loader.format_loaded_files().iter().any(|l| l.contains("team.toml")),
        "{:?}",
        loader.format_loaded_files()
    );
    let config = loader.build().unwrap();

    assert_eq!(config.git.remote, "team");
    assert_eq!(config.refresh.max_parallel, 6, "--set beats --ini");
}

#[test]
fn config_cli_log_level_override() {
    let cli = Cli::try_parse_from(["ripple", "-l", "5", "--file-log-level", "1", "options"]).unwrap();
    let config = load_config(&cli.global).unwrap();
    assert_eq!(config.global.output_log_level.as_u8(), 5);
    assert_eq!(config.global.file_log_level.as_u8(), 1);
}

#[test]
fn config_format_options_lists_every_section() {
    let config = Config::default();
    let lines = config.format_options();
    for key in [
        "global.dry",
        "git.remote",
        "propagate.auto_push",
        "refresh.fetch_first",
        "preferences.path",
    ] {
        assert!(lines.iter().any(|l| l.starts_with(key)), "missing {key}");
    }
    let mut sorted = lines.clone();
    sorted.sort();
    assert_eq!(lines, sorted);
}

// =============================================================================
// Preferences
// =============================================================================

#[test]
fn prefs_round_trip_through_disk() {
    let home = temp_dir();
    let repo = home.path().join("repo");
    std::fs::create_dir_all(&repo).unwrap();
    for args in [
        &["init", "--quiet"][..],
        &[
            "-c",
            "user.name=Test",
            "-c",
            "user.email=test@example.com",
            "-c",
            "commit.gpgsign=false",
            "commit",
            "--quiet",
            "--allow-empty",
            "-m",
            "init",
        ][..],
    ] {
        let status = std::process::Command::new("git")
            .args(args)
            .current_dir(&repo)
            .status()
            .unwrap();
        assert!(status.success());
    }

    let path = default_path_at(home.path());
    let mut prefs = Preferences::load(&path).unwrap();
    assert_eq!(prefs, Preferences::default());

    prefs.last_repo_path = Some(repo.clone());
    prefs.propagate.max_commits = 15;
    prefs
        .tracked_repos
        .add(&repo, vec!["main".to_string()])
        .unwrap();
    prefs.save(&path).unwrap();

    let loaded = Preferences::load(&path).unwrap();
    assert_eq!(loaded, prefs);
    assert!(path.ends_with(".ripple/preferences.json"));
}
