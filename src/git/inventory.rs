// ripple-rs: Git commit propagation and branch refresh
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Ref inventory.
//!
//! ```text
//! git for-each-ref refs/heads refs/remotes     (one subprocess)
//!        |
//!        v
//!   parse NUL-separated fields
//!        |
//!        v
//!   drop symrefs (origin/HEAD)
//!   drop upstreams not present in snapshot ("gone", local upstreams)
//!        |
//!        v
//!   RefInventory { local..., remote(filtered)... }
//! ```
//!
//! The cost is one `for-each-ref` call regardless of how many branches the
//! repository has. Either the whole snapshot parses or collection fails.

use std::collections::HashSet;
use std::path::PathBuf;

use serde::Serialize;

use super::cmd::git_command;
use super::repo::Repository;
use crate::error::{GitError, RippleResult};

const HEADS: &str = "refs/heads/";
const REMOTES: &str = "refs/remotes/";

const FORMAT: &str = "--format=%(refname)%00%(objectname)%00%(upstream)%00\
%(upstream:track,nobracket)%00%(symref)%00%(worktreepath)";

/// Local branch or remote-tracking branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RefKind {
    Local,
    RemoteTracking,
}

/// One branch in the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchRef {
    /// `main` for local branches, `origin/main` for remote-tracking ones.
    pub name: String,
    pub kind: RefKind,
    pub tip: String,
    /// Short remote-tracking name (`origin/main`), only if present in the snapshot.
    pub upstream: Option<String>,
    pub ahead: Option<u32>,
    pub behind: Option<u32>,
    /// Work tree that has this branch checked out, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worktree: Option<PathBuf>,
}

impl BranchRef {
    /// Full ref name (`refs/heads/main`, `refs/remotes/origin/main`).
    #[must_use]
    pub fn full_name(&self) -> String {
        match self.kind {
            RefKind::Local => format!("{HEADS}{}", self.name),
            RefKind::RemoteTracking => format!("{REMOTES}{}", self.name),
        }
    }
}

/// Complete snapshot of branch refs for one repository.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RefInventory {
    refs: Vec<BranchRef>,
    #[serde(skip)]
    remote_tips: Vec<(String, String)>,
}

impl RefInventory {
    /// Collect every local branch, plus the remote-tracking branches of
    /// `remote` when given.
    ///
    /// # Errors
    ///
    /// Returns `GitError::RepositoryAccess` if the query cannot run, or
    /// `GitError::CommandFailed` if its output is malformed.
    pub fn collect(repo: &Repository, remote: Option<&str>) -> RippleResult<Self> {
        let output = git_command(&["for-each-ref", FORMAT, "refs/heads", "refs/remotes"], repo.path())
            .map_err(|e| match e.as_git() {
                Some(GitError::CommandFailed { message, .. }) => GitError::RepositoryAccess {
                    path: repo.path().display().to_string(),
                    message: message.clone(),
                }
                .into(),
                _ => e,
            })?;
        Self::parse(&output, remote)
    }

    /// Parse `for-each-ref` output produced with the inventory format.
    ///
    /// # Errors
    ///
    /// Returns `GitError::CommandFailed` on a malformed line.
    pub fn parse(output: &str, remote: Option<&str>) -> RippleResult<Self> {
        let mut rows = Vec::new();
        for line in output.lines().filter(|l| !l.is_empty()) {
            let fields: Vec<&str> = line.split('\0').collect();
            let [refname, tip, upstream, track, symref, worktree] = fields.as_slice() else {
                return Err(GitError::CommandFailed {
                    command: "git for-each-ref".to_string(),
                    message: format!("unexpected output line: {line:?}"),
                }
                .into());
            };
            if !symref.is_empty() {
                continue;
            }
            rows.push((*refname, *tip, *upstream, *track, *worktree));
        }

        let remote_refs: HashSet<&str> = rows
            .iter()
            .map(|(refname, ..)| *refname)
            .filter(|r| r.starts_with(REMOTES))
            .collect();

        let mut locals = Vec::new();
        let mut remotes = Vec::new();
        let mut remote_tips = Vec::new();
        for (refname, tip, upstream, track, worktree) in rows {
            if let Some(name) = refname.strip_prefix(HEADS) {
                let upstream = upstream
                    .strip_prefix(REMOTES)
                    .filter(|_| remote_refs.contains(upstream));
                let (ahead, behind) = match upstream {
                    Some(_) => {
                        let (a, b) = parse_track(track);
                        (Some(a), Some(b))
                    }
                    None => (None, None),
                };
                locals.push(BranchRef {
                    name: name.to_string(),
                    kind: RefKind::Local,
                    tip: tip.to_string(),
                    upstream: upstream.map(str::to_string),
                    ahead,
                    behind,
                    worktree: (!worktree.is_empty()).then(|| PathBuf::from(worktree)),
                });
            } else if let Some(name) = refname.strip_prefix(REMOTES) {
                remote_tips.push((name.to_string(), tip.to_string()));
                let wanted = remote.is_some_and(|r| {
                    name.strip_prefix(r).is_some_and(|rest| rest.starts_with('/'))
                });
                if wanted {
                    remotes.push(BranchRef {
                        name: name.to_string(),
                        kind: RefKind::RemoteTracking,
                        tip: tip.to_string(),
                        upstream: None,
                        ahead: None,
                        behind: None,
                        worktree: None,
                    });
                }
            }
        }

        locals.extend(remotes);
        Ok(Self {
            refs: locals,
            remote_tips,
        })
    }

    /// All refs in the snapshot order: local branches, then remote-tracking.
    #[must_use]
    pub fn refs(&self) -> &[BranchRef] {
        &self.refs
    }

    pub fn local(&self) -> impl Iterator<Item = &BranchRef> {
        self.refs.iter().filter(|r| r.kind == RefKind::Local)
    }

    pub fn remote(&self) -> impl Iterator<Item = &BranchRef> {
        self.refs.iter().filter(|r| r.kind == RefKind::RemoteTracking)
    }

    #[must_use]
    pub fn local_branch(&self, name: &str) -> Option<&BranchRef> {
        self.local().find(|r| r.name == name)
    }

    /// Tip of a remote-tracking ref (`origin/main`), whether or not remote
    /// refs were requested for output.
    #[must_use]
    pub fn remote_tip(&self, name: &str) -> Option<&str> {
        self.remote_tips
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, tip)| tip.as_str())
    }

    /// Tip of a local branch's upstream.
    #[must_use]
    pub fn upstream_tip(&self, branch: &BranchRef) -> Option<&str> {
        branch.upstream.as_deref().and_then(|u| self.remote_tip(u))
    }

    /// Remote-tracking tips under `remote`, keyed by short name.
    #[must_use]
    pub fn remote_tips_of(&self, remote: &str) -> Vec<(&str, &str)> {
        self.remote_tips
            .iter()
            .filter(|(n, _)| n.strip_prefix(remote).is_some_and(|rest| rest.starts_with('/')))
            .map(|(n, t)| (n.as_str(), t.as_str()))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.refs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }
}

/// Parse `%(upstream:track,nobracket)`: `ahead 2, behind 1`, `behind 3`,
/// `gone` or empty.
fn parse_track(track: &str) -> (u32, u32) {
    let mut ahead = 0;
    let mut behind = 0;
    for part in track.split(", ") {
        if let Some(n) = part.strip_prefix("ahead ") {
            ahead = n.trim().parse().unwrap_or(0);
        } else if let Some(n) = part.strip_prefix("behind ") {
            behind = n.trim().parse().unwrap_or(0);
        }
    }
    (ahead, behind)
}
