// ripple-rs: Git commit propagation and branch refresh
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Commit history reader.
//!
//! [`History`] streams `git log` output record by record; dropping it early
//! kills the subprocess, so reading the first page of a long history costs
//! only that page. A `git log` that exits non-zero ends the stream with one
//! `GitError::CommandFailed` carrying its stderr.

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};

use serde::Serialize;
use tracing::{debug, warn};

use super::cmd::{git_command, resolve_commit};
use crate::error::{GitError, RippleError, RippleResult};

/// Unit separator between fields, NUL between records.
const FORMAT: &str = "--format=%H%x1f%P%x1f%an%x1f%ae%x1f%at%x1f%s";

/// One commit as reported by history traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitRecord {
    pub id: String,
    /// Parent ids in git's order; `parents[0]` is the mainline.
    pub parents: Vec<String>,
    pub author_name: String,
    pub author_email: String,
    /// Author time, seconds since the epoch.
    pub timestamp: i64,
    pub subject: String,
}

impl CommitRecord {
    #[must_use]
    pub fn parent_count(&self) -> usize {
        self.parents.len()
    }

    #[must_use]
    pub fn is_merge(&self) -> bool {
        self.parents.len() >= 2
    }

    #[must_use]
    pub fn short_id(&self) -> &str {
        super::repo::short_id(&self.id)
    }

    fn parse(raw: &str) -> RippleResult<Self> {
        let fields: Vec<&str> = raw.trim_start_matches('\n').split('\x1f').collect();
        let [id, parents, name, email, time, subject] = fields.as_slice() else {
            return Err(GitError::CommandFailed {
                command: "git log".to_string(),
                message: format!("unexpected record: {raw:?}"),
            }
            .into());
        };
        Ok(Self {
            id: (*id).to_string(),
            parents: parents.split_whitespace().map(str::to_string).collect(),
            author_name: (*name).to_string(),
            author_email: (*email).to_string(),
            timestamp: time.parse().unwrap_or_default(),
            subject: (*subject).to_string(),
        })
    }
}

/// Lazy, newest-first commit sequence backed by a `git log` subprocess.
pub struct History {
    child: Child,
    reader: BufReader<ChildStdout>,
    /// Unlinked temp file, so a chatty stderr can never block the stdout pipe.
    stderr: File,
    command: String,
    buf: Vec<u8>,
    done: bool,
}

/// Stream the history of `rev`, newest first, at most `limit` commits.
///
/// # Errors
///
/// Returns `GitError::BranchNotFound` if `rev` does not resolve to a commit.
pub fn history(repo_path: &Path, rev: &str, limit: Option<usize>) -> RippleResult<History> {
    let Some(tip) = resolve_commit(repo_path, rev)? else {
        return Err(GitError::BranchNotFound {
            branch: rev.to_string(),
        }
        .into());
    };

    let limit_arg = limit.map(|n| format!("--max-count={n}"));
    let mut args = vec!["log", "-z", FORMAT];
    if let Some(arg) = limit_arg.as_deref() {
        args.push(arg);
    }
    args.extend([tip.as_str(), "--"]);
    let command = format!("git {}", args.join(" "));
    debug!(cwd = %repo_path.display(), "{command}");

    let stderr = tempfile::tempfile()?;
    let mut child = Command::new("git")
        .args(&args)
        .current_dir(repo_path)
        .env("GCM_INTERACTIVE", "never")
        .env("GIT_TERMINAL_PROMPT", "0")
        .stdout(Stdio::piped())
        .stderr(Stdio::from(stderr.try_clone()?))
        .spawn()
        .map_err(|e| std::io::Error::new(e.kind(), format!("failed to execute git: {e}")))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| std::io::Error::other("git log stdout not captured"))?;

    Ok(History {
        child,
        reader: BufReader::new(stdout),
        stderr,
        command,
        buf: Vec::new(),
        done: false,
    })
}

impl Iterator for History {
    type Item = RippleResult<CommitRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        self.buf.clear();
        match self.reader.read_until(b'\0', &mut self.buf) {
            Ok(0) => {
                self.done = true;
                self.exit_error().map(Err)
            }
            Ok(_) => {
                if self.buf.last() == Some(&b'\0') {
                    self.buf.pop();
                }
                let raw = String::from_utf8_lossy(&self.buf);
                let raw = raw.trim_end_matches('\n');
                if raw.is_empty() {
                    self.done = true;
                    return self.exit_error().map(Err);
                }
                Some(CommitRecord::parse(raw))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e.into()))
            }
        }
    }
}

impl History {
    /// Reap the finished child; `Some` if it did not exit cleanly.
    fn exit_error(&mut self) -> Option<RippleError> {
        let status = match self.child.wait() {
            Ok(status) => status,
            Err(e) => return Some(e.into()),
        };
        if status.success() {
            return None;
        }
        let mut stderr = String::new();
        if let Err(e) = self
            .stderr
            .seek(SeekFrom::Start(0))
            .and_then(|_| self.stderr.read_to_string(&mut stderr))
        {
            warn!("failed to read git log stderr: {e}");
        }
        let message = match stderr.trim() {
            "" => format!("exited with {status}"),
            text => text.to_string(),
        };
        Some(
            GitError::CommandFailed {
                command: self.command.clone(),
                message,
            }
            .into(),
        )
    }
}

impl Drop for History {
    fn drop(&mut self) {
        if !self.done {
            let _ = self.child.kill();
        }
        if let Err(e) = self.child.wait() {
            warn!("failed to reap git log: {e}");
        }
    }
}

/// Default consumer view: newest first, merges hidden unless requested, at
/// most `limit` visible commits.
///
/// # Errors
///
/// Returns `GitError::BranchNotFound` if `rev` does not resolve.
pub fn log_view(
    repo_path: &Path,
    rev: &str,
    limit: Option<usize>,
    include_merges: bool,
) -> RippleResult<impl Iterator<Item = RippleResult<CommitRecord>>> {
    let stream = history(repo_path, rev, None)?;
    Ok(stream
        .filter(move |rec| include_merges || rec.as_ref().map_or(true, |c| !c.is_merge()))
        .take(limit.unwrap_or(usize::MAX)))
}

/// Look up records for caller-selected ids (any revision syntax), returned
/// in the order given.
///
/// Uses one `rev-parse` and one `log --no-walk` call regardless of count.
///
/// # Errors
///
/// Returns `GitError::BranchNotFound` naming the first id that does not
/// resolve to a commit.
pub fn lookup(repo_path: &Path, ids: &[String]) -> RippleResult<Vec<CommitRecord>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let specs: Vec<String> = ids.iter().map(|id| format!("{id}^{{commit}}")).collect();
    let mut args = vec!["rev-parse"];
    args.extend(specs.iter().map(String::as_str));
    let resolved: Vec<String> = match git_command(&args, repo_path) {
        Ok(out) => out.lines().map(str::to_string).collect(),
        Err(e) => {
            for id in ids {
                if resolve_commit(repo_path, id)?.is_none() {
                    return Err(GitError::BranchNotFound { branch: id.clone() }.into());
                }
            }
            return Err(e);
        }
    };

    let mut log_args = vec!["log", "-z", "--no-walk=unsorted", FORMAT];
    log_args.extend(resolved.iter().map(String::as_str));
    log_args.push("--");
    let output = git_command(&log_args, repo_path)?;
    let found = output
        .split('\0')
        .map(|raw| raw.trim_matches('\n'))
        .filter(|raw| !raw.is_empty())
        .map(CommitRecord::parse)
        .collect::<RippleResult<Vec<_>>>()?;

    // `--no-walk` collapses repeated ids; expand back to one record per input.
    resolved
        .iter()
        .map(|id| {
            found
                .iter()
                .find(|rec| &rec.id == id)
                .cloned()
                .ok_or_else(|| GitError::BranchNotFound { branch: id.clone() }.into())
        })
        .collect()
}

/// Combined message for a squash: subjects oldest to newest, blank-line
/// separated.
#[must_use]
pub fn combined_message(records: &[CommitRecord]) -> String {
    records
        .iter()
        .map(|c| c.subject.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::{CommitRecord, combined_message, history};
    use crate::git::fixture::{commit_file, init_repo};

    fn record(id: &str, parents: &[&str], subject: &str) -> CommitRecord {
        CommitRecord {
            id: id.to_string(),
            parents: parents.iter().map(|p| (*p).to_string()).collect(),
            author_name: "Test".to_string(),
            author_email: "test@example.com".to_string(),
            timestamp: 0,
            subject: subject.to_string(),
        }
    }

    #[test]
    fn test_parse_record_keeps_parent_order() {
        let raw = "m1\x1fp1 p2 p3\x1fAda\x1fada@example.com\x1f1700000000\x1fMerge branch 'x'";
        let rec = CommitRecord::parse(raw).expect("parse");
        assert_eq!(rec.parents, vec!["p1", "p2", "p3"]);
        assert!(rec.is_merge());
        assert_eq!(rec.timestamp, 1_700_000_000);
        assert_eq!(rec.subject, "Merge branch 'x'");
    }

    #[test]
    fn test_root_commit_has_no_parents() {
        let rec = CommitRecord::parse("r\x1f\x1fA\x1fa@x\x1f1\x1froot").expect("parse");
        assert_eq!(rec.parent_count(), 0);
        assert!(!rec.is_merge());
    }

    #[test]
    fn test_merge_detection_ignores_subject() {
        let rec = record("a", &["p"], "Merge pull request #12");
        assert!(!rec.is_merge());
    }

    #[test]
    fn test_combined_message() {
        let records = vec![
            record("a", &["p"], "Add parser"),
            record("b", &["a"], "Fix off-by-one"),
        ];
        insta::assert_snapshot!(combined_message(&records), @r"
        Add parser

        Fix off-by-one
        ");
    }

    #[test]
    fn test_history_reports_git_failure() {
        let temp = tempfile::tempdir().expect("temp");
        let repo = temp.path().join("repo");
        init_repo(&repo);
        let parent = commit_file(&repo, "a.txt", "a\n", "first");
        commit_file(&repo, "b.txt", "b\n", "second");
        let object = repo
            .join(".git/objects")
            .join(&parent[..2])
            .join(&parent[2..]);
        std::fs::remove_file(object).expect("remove parent object");

        let items: Vec<_> = history(&repo, "HEAD", None).expect("spawn").collect();
        let err = items
            .last()
            .expect("at least one item")
            .as_ref()
            .expect_err("git log failure surfaces");
        assert_eq!(err.tag(), "git-error");
        assert_eq!(items.iter().filter(|item| item.is_err()).count(), 1);
    }
}
