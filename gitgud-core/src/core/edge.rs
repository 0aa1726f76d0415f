use super::commit::{Commit, CommitId};

/// An edge connecting two commits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Source commit ID (child)
    pub from: CommitId,
    /// Target commit ID (parent)
    pub to: CommitId,
    pub edge_type: EdgeType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeType {
    /// Parent on the same branch as the child
    Regular,
    /// Child starts a new branch off this parent
    Fork,
    /// Merge edge (from merge commit to one of its parents)
    Merge,
}

impl Edge {
    pub fn new(from: CommitId, to: CommitId) -> Self {
        Self {
            from,
            to,
            edge_type: EdgeType::Regular,
        }
    }

    pub fn fork(from: CommitId, to: CommitId) -> Self {
        Self {
            from,
            to,
            edge_type: EdgeType::Fork,
        }
    }

    pub fn merge(from: CommitId, to: CommitId) -> Self {
        Self {
            from,
            to,
            edge_type: EdgeType::Merge,
        }
    }

    /// Edges from `commit` to each of its parents, in parent order
    pub fn from_commit(commit: &Commit) -> impl Iterator<Item = Edge> + '_ {
        commit.parents().iter().map(move |parent| {
            if commit.is_merge_commit() {
                Edge::merge(commit.id(), parent.id)
            } else if parent.branch != commit.branch() {
                Edge::fork(commit.id(), parent.id)
            } else {
                Edge::new(commit.id(), parent.id)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::commit::Link;

    #[test]
    fn test_edge_types() {
        let root = Commit::with_id(0, 0);
        let mut fork = Commit::with_id(1, 1);
        fork.add_parent(Link::from(&root)).unwrap();
        let mut merge = Commit::with_id(0, 2);
        merge.add_parent(Link::from(&root)).unwrap();
        merge.add_parent(Link::from(&fork)).unwrap();

        assert_eq!(Edge::from_commit(&root).count(), 0);
        assert_eq!(Edge::from_commit(&fork).collect::<Vec<_>>(), vec![Edge::fork(1, 0)]);
        assert_eq!(
            Edge::from_commit(&merge).collect::<Vec<_>>(),
            vec![Edge::merge(2, 0), Edge::merge(2, 1)]
        );
    }
}
