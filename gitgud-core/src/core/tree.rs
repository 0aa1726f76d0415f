use super::commit::{BranchId, Commit, CommitId, IdSequence, Link};
use super::edge::Edge;
use super::error::{GraphError, Result};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

/// Commit history as an in-memory DAG.
///
/// The tree owns every commit; commits refer to one another by ID only.
/// Commits are keyed by ID, so iteration order is creation order and the
/// last entry is always the most recently created commit.
#[derive(Debug, Clone)]
pub struct GitTree {
    /// Currently checked-out commit, always present in `commits`
    head: CommitId,
    /// All commits indexed by ID
    commits: BTreeMap<CommitId, Commit>,
    /// Branches allocated so far; also the next branch ID
    num_branches: BranchId,
    /// Source of fresh commit IDs
    ids: IdSequence,
}

impl GitTree {
    /// Create a tree holding a single root commit on branch 0
    pub fn new() -> Self {
        let mut ids = IdSequence::new();
        let root = Commit::new(0, &mut ids);
        let head = root.id();
        debug!(commit = head, "created root commit");

        Self {
            head,
            commits: BTreeMap::from([(head, root)]),
            num_branches: 1,
            ids,
        }
    }

    /// Assemble a tree from parts that the caller has already validated
    pub(crate) fn from_parts(
        head: CommitId,
        commits: BTreeMap<CommitId, Commit>,
        num_branches: BranchId,
        ids: IdSequence,
    ) -> Self {
        Self {
            head,
            commits,
            num_branches,
            ids,
        }
    }

    pub fn head(&self) -> &Commit {
        &self.commits[&self.head]
    }

    pub fn head_id(&self) -> CommitId {
        self.head
    }

    pub fn commit(&self, id: CommitId) -> Option<&Commit> {
        self.commits.get(&id)
    }

    /// Like [`GitTree::commit`], but a missing ID is an error
    pub fn get(&self, id: CommitId) -> Result<&Commit> {
        self.commits.get(&id).ok_or(GraphError::CommitNotFound(id))
    }

    pub fn contains(&self, id: CommitId) -> bool {
        self.commits.contains_key(&id)
    }

    /// All commits in creation order
    pub fn commits(&self) -> impl DoubleEndedIterator<Item = &Commit> + '_ {
        self.commits.values()
    }

    pub fn num_commits(&self) -> usize {
        self.commits.len()
    }

    pub fn num_branches(&self) -> BranchId {
        self.num_branches
    }

    /// The ID the next created commit will receive
    pub fn next_id(&self) -> CommitId {
        self.ids.peek()
    }

    /// The commit with the highest ID
    pub fn latest(&self) -> &Commit {
        // A tree is never empty: undo refuses to remove the last commit
        self.commits
            .values()
            .next_back()
            .unwrap_or_else(|| unreachable!("commit tree is empty"))
    }

    /// The commit with the highest ID on `branch`
    pub fn latest_on_branch(&self, branch: BranchId) -> Result<&Commit> {
        self.commits
            .values()
            .rev()
            .find(|commit| commit.branch() == branch)
            .ok_or(GraphError::BranchNotFound(branch))
    }

    /// Extend `head` with a new commit on its branch and check it out.
    ///
    /// Fails if `head` already has a child on its own branch; use
    /// [`GitTree::add_commit_new_branch`] to fork. Children on other branches
    /// are forks off `head` and do not block continuing its mainline.
    pub fn add_commit(&mut self) -> Result<&Commit> {
        self.add_commit_to(self.head)
    }

    /// Extend `parent` with a new commit on its branch and check it out
    pub fn add_commit_to(&mut self, parent: CommitId) -> Result<&Commit> {
        let parent_commit = self.get(parent)?;
        let branch = parent_commit.branch();
        if parent_commit.children().iter().any(|c| c.branch == branch) {
            return Err(GraphError::AlreadyHasChild(parent));
        }
        self.attach(branch, &[parent])
    }

    /// Start a new branch at `head` and check out its first commit
    pub fn add_commit_new_branch(&mut self) -> Result<&Commit> {
        self.add_commit_new_branch_from(self.head)
    }

    /// Start a new branch at `parent` and check out its first commit.
    ///
    /// Unlike [`GitTree::add_commit_to`], `parent` may already have children.
    pub fn add_commit_new_branch_from(&mut self, parent: CommitId) -> Result<&Commit> {
        self.get(parent)?;
        let branch = self.generate_branch_id();
        self.attach(branch, &[parent])
    }

    /// Move `head` to an existing commit
    pub fn checkout(&mut self, id: CommitId) -> Result<()> {
        self.get(id)?;
        debug!(from = self.head, to = id, "checkout");
        self.head = id;
        Ok(())
    }

    /// Move `head` to the tree's copy of `commit`
    pub fn checkout_commit(&mut self, commit: &Commit) -> Result<()> {
        self.checkout(commit.id())
    }

    /// Merge `other` into `head`; the merge commit becomes `head`
    pub fn merge(&mut self, other: CommitId) -> Result<&Commit> {
        self.merge_into(self.head, other)
    }

    /// Create a merge commit on `parent`'s branch with parents
    /// `[parent, other]` and check it out
    pub fn merge_into(&mut self, parent: CommitId, other: CommitId) -> Result<&Commit> {
        let branch = self.get(parent)?.branch();
        self.get(other)?;
        if parent == other {
            return Err(GraphError::SelfMerge(parent));
        }
        self.attach(branch, &[parent, other])
    }

    /// Remove the most recently created commit and check out its first
    /// parent. Returns the removed ID, or `None` when only the root is left.
    pub fn undo(&mut self) -> Result<Option<CommitId>> {
        if self.commits.len() <= 1 {
            debug!("undo ignored: only the root commit remains");
            return Ok(None);
        }

        let latest = self.latest();
        let id = latest.id();
        if !latest.is_leaf() {
            warn!(commit = id, "undo refused: latest commit has children");
            return Err(GraphError::AlreadyHasChild(id));
        }

        let parents: Vec<CommitId> = latest.parent_ids().collect();
        for parent in &parents {
            self.commits
                .get_mut(parent)
                .ok_or(GraphError::CommitNotFound(*parent))?
                .remove_child(id)?;
        }
        self.commits.remove(&id);

        self.head = match parents.first() {
            Some(&parent) => parent,
            None => self.root().id(),
        };
        debug!(commit = id, head = self.head, "undid commit");

        Ok(Some(id))
    }

    /// The first commit ever created (lowest ID)
    pub fn root(&self) -> &Commit {
        self.commits
            .values()
            .next()
            .unwrap_or_else(|| unreachable!("commit tree is empty"))
    }

    /// Get all commits without parents
    pub fn roots(&self) -> Vec<&Commit> {
        self.commits.values().filter(|c| c.is_root()).collect()
    }

    /// Get all commits without children
    pub fn leaves(&self) -> Vec<&Commit> {
        self.commits.values().filter(|c| c.is_leaf()).collect()
    }

    pub fn parents_of(&self, id: CommitId) -> Result<Vec<&Commit>> {
        let commit = self.get(id)?;
        commit.parent_ids().map(|p| self.get(p)).collect()
    }

    pub fn children_of(&self, id: CommitId) -> Result<Vec<&Commit>> {
        let commit = self.get(id)?;
        commit.child_ids().map(|c| self.get(c)).collect()
    }

    /// Every child-to-parent edge, grouped by child in creation order
    pub fn edges(&self) -> Vec<Edge> {
        self.commits.values().flat_map(Edge::from_commit).collect()
    }

    pub fn stats(&self) -> TreeStats {
        TreeStats {
            total_commits: self.commits.len(),
            total_edges: self.commits.values().map(Commit::num_parents).sum(),
            merge_commits: self.commits.values().filter(|c| c.is_merge_commit()).count(),
            branch_origins: self.commits.values().filter(|c| c.is_new_branch()).count(),
            leaf_commits: self.commits.values().filter(|c| c.is_leaf()).count(),
            num_branches: self.num_branches,
        }
    }

    /// Write every commit to stdout, marking HEAD
    pub fn print(&self) {
        print!("{}", self);
    }

    fn generate_branch_id(&mut self) -> BranchId {
        let branch = self.num_branches;
        self.num_branches += 1;
        debug!(branch, "allocated branch");
        branch
    }

    /// Create a commit on `branch` below `parents`, wire both directions of
    /// every link and check the new commit out. Parents must exist.
    fn attach(&mut self, branch: BranchId, parents: &[CommitId]) -> Result<&Commit> {
        let links = parents
            .iter()
            .map(|id| self.get(*id).map(Link::from))
            .collect::<Result<Vec<_>>>()?;

        let mut commit = Commit::new(branch, &mut self.ids);
        for link in links {
            commit.add_parent(link)?;
        }

        let child = Link::from(&commit);
        for parent in parents {
            self.commits
                .get_mut(parent)
                .ok_or(GraphError::CommitNotFound(*parent))?
                .add_child(child)?;
        }

        let id = commit.id();
        debug!(commit = id, branch, ?parents, "created commit");
        self.commits.insert(id, commit);
        self.head = id;

        Ok(&self.commits[&id])
    }
}

impl Default for GitTree {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GitTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for commit in self.commits.values() {
            let marker = if commit.id() == self.head { "* " } else { "  " };
            writeln!(f, "{}{}", marker, commit)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeStats {
    pub total_commits: usize,
    pub total_edges: usize,
    pub merge_commits: usize,
    pub branch_origins: usize,
    pub leaf_commits: usize,
    pub num_branches: BranchId,
}
