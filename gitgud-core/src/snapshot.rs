//! Plain-data view of a [`GitTree`] for integrating applications.
//!
//! A snapshot carries everything needed to rebuild an identical tree,
//! including the ID sequence position, so restored trees keep handing out
//! fresh IDs. Nothing here touches the filesystem.

use crate::core::{BranchId, Commit, CommitId, GitTree, GraphError, IdSequence, Link, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub id: CommitId,
    pub branch: BranchId,
    pub parents: Vec<CommitId>,
    pub children: Vec<CommitId>,
}

impl From<&Commit> for CommitRecord {
    fn from(commit: &Commit) -> Self {
        Self {
            id: commit.id(),
            branch: commit.branch(),
            parents: commit.parent_ids().collect(),
            children: commit.child_ids().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    pub head: CommitId,
    pub next_id: CommitId,
    pub num_branches: BranchId,
    pub commits: Vec<CommitRecord>,
}

impl TreeSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl GitTree {
    pub fn snapshot(&self) -> TreeSnapshot {
        TreeSnapshot {
            head: self.head_id(),
            next_id: self.next_id(),
            num_branches: self.num_branches(),
            commits: self.commits().map(CommitRecord::from).collect(),
        }
    }

    /// Rebuild a tree, checking every structural invariant on the way in
    pub fn from_snapshot(snapshot: &TreeSnapshot) -> Result<Self> {
        if snapshot.commits.is_empty() {
            return Err(GraphError::EmptySnapshot);
        }

        let mut branches = BTreeMap::new();
        for record in &snapshot.commits {
            if record.id >= snapshot.next_id {
                return Err(GraphError::IdOutOfSequence(record.id));
            }
            if branches.insert(record.id, record.branch).is_some() {
                return Err(GraphError::DuplicateCommit(record.id));
            }
            if record.branch >= snapshot.num_branches {
                return Err(GraphError::BranchNotFound(record.branch));
            }
        }
        if !branches.contains_key(&snapshot.head) {
            return Err(GraphError::CommitNotFound(snapshot.head));
        }

        let link = |id: CommitId| -> Result<Link> {
            branches
                .get(&id)
                .map(|&branch| Link { id, branch })
                .ok_or(GraphError::CommitNotFound(id))
        };

        let mut commits = BTreeMap::new();
        for record in &snapshot.commits {
            let mut commit = Commit::with_id(record.branch, record.id);
            for &parent in &record.parents {
                commit.add_parent(link(parent)?)?;
            }
            for &child in &record.children {
                commit.add_child(link(child)?)?;
            }
            commits.insert(record.id, commit);
        }

        verify_links(&commits)?;

        Ok(GitTree::from_parts(
            snapshot.head,
            commits,
            snapshot.num_branches,
            IdSequence::starting_at(snapshot.next_id),
        ))
    }
}

fn occurrences(ids: impl Iterator<Item = CommitId>, target: CommitId) -> usize {
    ids.filter(|&id| id == target).count()
}

/// Every parent link must point to an older commit and be mirrored by a child
/// link, and exactly one commit may lack parents. Parents being older makes
/// ID order a topological order, so the graph is acyclic and its root is the
/// lowest ID.
fn verify_links(commits: &BTreeMap<CommitId, Commit>) -> Result<()> {
    for commit in commits.values() {
        let id = commit.id();
        for parent in commit.parent_ids() {
            if parent >= id {
                return Err(GraphError::ParentNotOlder { commit: id, parent });
            }
            let mirrored = commits.get(&parent).is_some_and(|p| {
                occurrences(p.child_ids(), id) == occurrences(commit.parent_ids(), parent)
            });
            if !mirrored {
                return Err(GraphError::BrokenLink { from: id, to: parent });
            }
        }
        for child in commit.child_ids() {
            let mirrored = commits.get(&child).is_some_and(|c| {
                occurrences(c.parent_ids(), id) == occurrences(commit.child_ids(), child)
            });
            if !mirrored {
                return Err(GraphError::BrokenLink { from: id, to: child });
            }
        }
    }

    if let Some(extra) = commits.values().filter(|c| c.is_root()).nth(1) {
        return Err(GraphError::MultipleRoots(extra.id()));
    }

    Ok(())
}
