use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::error::{GraphError, Result};

/// Sequential commit identifier
pub type CommitId = u64;

/// Branch lineage tag; branch 0 is the one the root commit lives on
pub type BranchId = u32;

/// Monotonic source of fresh commit IDs.
///
/// A tree owns one of these; it is never rewound, so an ID handed out once
/// is never handed out again even after the commit is undone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdSequence {
    next: CommitId,
}

impl IdSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume a sequence whose next ID is `next`
    pub fn starting_at(next: CommitId) -> Self {
        Self { next }
    }

    /// The ID the next call to [`IdSequence::next_id`] will return
    pub fn peek(&self) -> CommitId {
        self.next
    }

    pub fn next_id(&mut self) -> CommitId {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// A non-owning reference from one commit to another.
///
/// The target's branch is carried along with its ID so a commit can classify
/// itself without asking the tree; branch tags never change after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    pub id: CommitId,
    pub branch: BranchId,
}

impl From<&Commit> for Link {
    fn from(commit: &Commit) -> Self {
        Self {
            id: commit.id,
            branch: commit.branch,
        }
    }
}

/// A node of the commit DAG
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Unique within its tree
    id: CommitId,
    /// Branch this commit was created on
    branch: BranchId,
    /// Parent links in the order they were added
    parents: Vec<Link>,
    /// Child links in the order they were added
    children: Vec<Link>,
}

impl Commit {
    /// Create a commit on `branch` with the next ID from `ids`
    pub fn new(branch: BranchId, ids: &mut IdSequence) -> Self {
        Self::with_id(branch, ids.next_id())
    }

    /// Create a commit with a caller-chosen ID.
    ///
    /// Uniqueness is not checked here; the owning tree is responsible for it.
    pub fn with_id(branch: BranchId, id: CommitId) -> Self {
        Self {
            id,
            branch,
            parents: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> CommitId {
        self.id
    }

    pub fn branch(&self) -> BranchId {
        self.branch
    }

    pub fn parents(&self) -> &[Link] {
        &self.parents
    }

    pub fn children(&self) -> &[Link] {
        &self.children
    }

    pub fn parent_ids(&self) -> impl Iterator<Item = CommitId> + '_ {
        self.parents.iter().map(|link| link.id)
    }

    pub fn child_ids(&self) -> impl Iterator<Item = CommitId> + '_ {
        self.children.iter().map(|link| link.id)
    }

    pub fn num_parents(&self) -> usize {
        self.parents.len()
    }

    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    /// Check if this is the root commit (no parents)
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Check if nothing has been built on top of this commit yet
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Check if this is a merge commit (two or more parents)
    pub fn is_merge_commit(&self) -> bool {
        self.parents.len() >= 2
    }

    /// Check if this commit starts a new branch: it has parents and none of
    /// them are on its own branch. The root is never a branch origin.
    pub fn is_new_branch(&self) -> bool {
        !self.parents.is_empty() && self.parents.iter().all(|p| p.branch != self.branch)
    }

    /// Append a parent link. The parent's child list is left untouched.
    pub fn add_parent(&mut self, parent: Link) -> Result<()> {
        if parent.id == self.id {
            return Err(GraphError::SelfParent(self.id));
        }
        trace!(commit = self.id, parent = parent.id, "add parent link");
        self.parents.push(parent);
        Ok(())
    }

    /// Append a child link. The child's parent list is left untouched.
    pub fn add_child(&mut self, child: Link) -> Result<()> {
        if child.id == self.id {
            return Err(GraphError::SelfChild(self.id));
        }
        trace!(commit = self.id, child = child.id, "add child link");
        self.children.push(child);
        Ok(())
    }

    /// Remove the first parent link pointing at `id`
    pub fn remove_parent(&mut self, id: CommitId) -> Result<()> {
        let pos = self
            .parents
            .iter()
            .position(|link| link.id == id)
            .ok_or(GraphError::ParentNotFound {
                commit: self.id,
                parent: id,
            })?;
        self.parents.remove(pos);
        Ok(())
    }

    /// Remove the first child link pointing at `id`
    pub fn remove_child(&mut self, id: CommitId) -> Result<()> {
        let pos = self
            .children
            .iter()
            .position(|link| link.id == id)
            .ok_or(GraphError::ChildNotFound {
                commit: self.id,
                child: id,
            })?;
        self.children.remove(pos);
        Ok(())
    }
}

fn write_ids(f: &mut fmt::Formatter<'_>, links: &[Link]) -> fmt::Result {
    write!(f, "[")?;
    for (i, link) in links.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", link.id)?;
    }
    write!(f, "]")
}

/// Single-line summary: `commit 4 [branch 0] parents: [3, 2] children: []`
impl fmt::Display for Commit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "commit {} [branch {}] parents: ", self.id, self.branch)?;
        write_ids(f, &self.parents)?;
        write!(f, " children: ")?;
        write_ids(f, &self.children)
    }
}
