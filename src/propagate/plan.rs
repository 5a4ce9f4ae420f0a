// ripple-rs: Git commit propagation and branch refresh
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Propagation plan and its pure validation.
//!
//! Nothing in this file touches a repository: validation runs before the
//! first checkout so that a bad plan leaves zero side effects.

use std::collections::{BTreeMap, HashSet};

use bon::Builder;

use crate::error::PlanError;
use crate::git::CommitRecord;
use crate::git::history::combined_message;

/// What to pick, where, and how.
#[derive(Debug, Clone, Builder)]
pub struct PropagationPlan {
    /// Ref the commits were selected from. Never modified.
    #[builder(into)]
    source: String,
    /// Selected commits, oldest to newest.
    commits: Vec<CommitRecord>,
    /// Squash the selection into one composite commit.
    #[builder(default)]
    combine: bool,
    /// Message for the composite commit; defaults to the combined subjects.
    #[builder(into)]
    message: Option<String>,
    /// Merge commit id to zero-based mainline parent index.
    #[builder(default)]
    parent_choices: BTreeMap<String, usize>,
    /// Target branches, processed in this order.
    targets: Vec<String>,
    /// Create missing targets at `base_ref` instead of failing them.
    #[builder(default)]
    create_missing: bool,
    /// Base for created targets; defaults to `source`.
    #[builder(into)]
    base_ref: Option<String>,
    /// Push each successful target with `-u`.
    #[builder(default)]
    auto_push: bool,
    #[builder(into, default = String::from("origin"))]
    remote: String,
}

/// One cherry-pick with its resolved git `-m` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickStep {
    pub commit: String,
    /// 1-based mainline for `git cherry-pick -m`, set only for merges.
    pub mainline: Option<usize>,
}

/// Zero-based mainline parent index for `commit`.
///
/// An explicit `choice` must satisfy `0 <= choice < parents`; without one the
/// first parent is used.
///
/// # Errors
///
/// Returns `PlanError::InvalidParentSelection` for an out-of-range choice.
pub fn resolve_parent(commit: &CommitRecord, choice: Option<usize>) -> Result<usize, PlanError> {
    match choice {
        None => Ok(0),
        Some(index) if index < commit.parent_count() => Ok(index),
        Some(index) => Err(PlanError::InvalidParentSelection {
            commit: commit.id.clone(),
            index,
            parents: commit.parent_count(),
        }),
    }
}

impl PropagationPlan {
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn commits(&self) -> &[CommitRecord] {
        &self.commits
    }

    #[must_use]
    pub const fn combine(&self) -> bool {
        self.combine
    }

    #[must_use]
    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    #[must_use]
    pub const fn create_missing(&self) -> bool {
        self.create_missing
    }

    /// Base ref for created targets.
    #[must_use]
    pub fn base_ref(&self) -> &str {
        self.base_ref.as_deref().unwrap_or(&self.source)
    }

    #[must_use]
    pub const fn auto_push(&self) -> bool {
        self.auto_push
    }

    #[must_use]
    pub fn remote(&self) -> &str {
        &self.remote
    }

    /// Message for the composite commit.
    #[must_use]
    pub fn composite_message(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| combined_message(&self.commits))
    }

    /// Check every plan-level rule and resolve the pick sequence.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::InvalidPlan` for an empty selection, repeated
    /// commits or targets, a target equal to the source, a combine request
    /// that spans a merge or starts at a root commit, or a parent choice for
    /// a commit that is not selected. Returns
    /// `PlanError::InvalidParentSelection` for an out-of-range parent index.
    pub fn validate(&self) -> Result<Vec<PickStep>, PlanError> {
        if self.commits.is_empty() {
            return Err(PlanError::invalid("no commits selected"));
        }
        if self.targets.is_empty() {
            return Err(PlanError::invalid("no target branches"));
        }

        let mut seen = HashSet::new();
        if let Some(dup) = self.commits.iter().find(|c| !seen.insert(c.id.as_str())) {
            return Err(PlanError::invalid(format!(
                "commit {} selected twice",
                dup.short_id()
            )));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = self.targets.iter().find(|t| !seen.insert(t.as_str())) {
            return Err(PlanError::invalid(format!("target '{dup}' listed twice")));
        }
        if let Some(target) = self.targets.iter().find(|t| **t == self.source) {
            return Err(PlanError::invalid(format!(
                "target '{target}' is the source ref"
            )));
        }

        if let Some(id) = self
            .parent_choices
            .keys()
            .find(|id| !self.commits.iter().any(|c| &c.id == *id))
        {
            return Err(PlanError::invalid(format!(
                "parent choice given for unselected commit {id}"
            )));
        }

        if self.combine {
            if let Some(merge) = self.commits.iter().find(|c| c.is_merge()) {
                return Err(PlanError::invalid(format!(
                    "cannot combine across merge commit {}",
                    merge.short_id()
                )));
            }
            if self.commits[0].parents.is_empty() {
                return Err(PlanError::invalid("cannot combine starting at a root commit"));
            }
            if self.message.as_deref().is_some_and(|m| m.trim().is_empty()) {
                return Err(PlanError::invalid("empty commit message"));
            }
        }

        self.commits
            .iter()
            .map(|commit| {
                let index = resolve_parent(commit, self.parent_choices.get(&commit.id).copied())?;
                Ok(PickStep {
                    commit: commit.id.clone(),
                    mainline: commit.is_merge().then_some(index + 1),
                })
            })
            .collect()
    }

    /// Human-readable step list for dry runs.
    ///
    /// # Errors
    ///
    /// Returns the validation error if the plan is invalid.
    pub fn describe(&self) -> Result<Vec<String>, PlanError> {
        let steps = self.validate()?;
        let mut lines = Vec::new();
        for target in &self.targets {
            if self.create_missing {
                lines.push(format!("create {target} from {} if missing", self.base_ref()));
            }
            lines.push(format!("checkout {target}"));
            if self.combine {
                lines.push(format!(
                    "cherry-pick composite of {} commit(s) from {}",
                    steps.len(),
                    self.source
                ));
            } else {
                for step in &steps {
                    let short = crate::git::repo::short_id(&step.commit);
                    match step.mainline {
                        Some(m) => lines.push(format!("cherry-pick -m {m} {short}")),
                        None => lines.push(format!("cherry-pick {short}")),
                    }
                }
            }
            if self.auto_push {
                lines.push(format!("push -u {} {target}", self.remote));
            }
        }
        Ok(lines)
    }
}
