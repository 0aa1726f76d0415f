use crate::core::{BranchId, Commit, CommitId, GitTree};
use std::collections::BTreeMap;

/// A lane represents a vertical column in the graph
pub type LaneIdx = usize;

/// A row in the graph visualization
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub commit_id: CommitId,
    pub branch: BranchId,
    pub parents: Vec<CommitId>,
    /// Lane assignments for this row
    pub lanes: Vec<Lane>,
    /// Lane of the commit's branch
    pub primary_lane: LaneIdx,
    pub is_head: bool,
}

/// Lane information for a row
#[derive(Debug, Clone, PartialEq)]
pub enum Lane {
    /// Empty lane (no line)
    Empty,
    /// Vertical line passing through
    Pass,
    /// This commit occupies this lane
    Commit,
    /// First commit of a branch, forked from another lane
    BranchStart(LaneIdx),
    /// Merge commit pulling in the other parents' lanes
    Merge(Vec<LaneIdx>),
    /// The root commit
    Root,
}

impl Lane {
    /// Get merge targets if this is a merge lane
    pub fn get_merge_targets(&self) -> &[LaneIdx] {
        match self {
            Lane::Merge(targets) => targets,
            _ => &[],
        }
    }

    /// Check if this lane holds the row's commit
    pub fn is_event(&self) -> bool {
        matches!(
            self,
            Lane::Commit | Lane::Merge(_) | Lane::BranchStart(_) | Lane::Root
        )
    }
}

/// Vertical extent of one lane, by commit ID
#[derive(Debug, Clone, Copy)]
struct Span {
    top: CommitId,
    bottom: CommitId,
}

impl Span {
    fn point(id: CommitId) -> Self {
        Self { top: id, bottom: id }
    }

    fn cover(&mut self, id: CommitId) {
        self.top = self.top.max(id);
        self.bottom = self.bottom.min(id);
    }

    fn passes(&self, id: CommitId) -> bool {
        self.bottom < id && id < self.top
    }
}

/// Builds rows from a tree, newest commit first, one lane per branch
pub struct RowBuilder {
    /// Maximum number of lanes to use; later branches share the last one
    max_lanes: usize,
    /// branch -> lane
    branch_lanes: BTreeMap<BranchId, LaneIdx>,
}

impl RowBuilder {
    pub fn new(max_lanes: usize) -> Self {
        Self {
            max_lanes: max_lanes.max(1),
            branch_lanes: BTreeMap::new(),
        }
    }

    pub fn build_rows(&mut self, tree: &GitTree) -> Vec<Row> {
        self.assign_lanes(tree);
        let spans = self.lane_spans(tree);

        tree.commits()
            .rev()
            .map(|commit| self.build_row(commit, tree.head_id(), &spans))
            .collect()
    }

    /// Number of lanes the last build used
    pub fn width(&self) -> usize {
        self.branch_lanes
            .values()
            .max()
            .map_or(0, |&lane| lane + 1)
    }

    fn build_row(&self, commit: &Commit, head: CommitId, spans: &BTreeMap<LaneIdx, Span>) -> Row {
        let primary_lane = self.lane_of(commit.branch());
        let mut lanes = vec![Lane::Empty; self.width()];

        for (&lane, span) in spans {
            if lane != primary_lane && span.passes(commit.id()) {
                lanes[lane] = Lane::Pass;
            }
        }

        lanes[primary_lane] = if commit.is_root() {
            Lane::Root
        } else if commit.is_merge_commit() {
            let targets = commit.parents()[1..]
                .iter()
                .map(|p| self.lane_of(p.branch))
                .filter(|&lane| lane != primary_lane)
                .collect();
            Lane::Merge(targets)
        } else if commit.is_new_branch() {
            Lane::BranchStart(self.lane_of(commit.parents()[0].branch))
        } else {
            Lane::Commit
        };

        Row {
            commit_id: commit.id(),
            branch: commit.branch(),
            parents: commit.parent_ids().collect(),
            lanes,
            primary_lane,
            is_head: commit.id() == head,
        }
    }

    /// Assign lanes to branches in order of first appearance
    fn assign_lanes(&mut self, tree: &GitTree) {
        self.branch_lanes.clear();
        for commit in tree.commits() {
            if !self.branch_lanes.contains_key(&commit.branch()) {
                let lane = self.branch_lanes.len().min(self.max_lanes - 1);
                self.branch_lanes.insert(commit.branch(), lane);
            }
        }
    }

    fn lane_of(&self, branch: BranchId) -> LaneIdx {
        self.branch_lanes.get(&branch).copied().unwrap_or(self.max_lanes - 1)
    }

    /// A lane runs from its oldest commit (or the commit it forked from) up
    /// to its newest commit (or the newest commit that merged it)
    fn lane_spans(&self, tree: &GitTree) -> BTreeMap<LaneIdx, Span> {
        let mut spans: BTreeMap<LaneIdx, Span> = BTreeMap::new();
        let mut cover = |lane: LaneIdx, id: CommitId| {
            spans
                .entry(lane)
                .and_modify(|span| span.cover(id))
                .or_insert_with(|| Span::point(id));
        };

        for commit in tree.commits() {
            let lane = self.lane_of(commit.branch());
            cover(lane, commit.id());
            for parent in commit.parents() {
                let parent_lane = self.lane_of(parent.branch);
                if parent_lane != lane {
                    cover(lane, parent.id);
                    cover(parent_lane, commit.id());
                }
            }
        }

        spans
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_layout() {
        let mut tree = GitTree::new();
        tree.add_commit().unwrap();
        tree.add_commit().unwrap();

        let mut builder = RowBuilder::new(10);
        let rows = builder.build_rows(&tree);

        assert_eq!(rows.len(), 3);
        assert_eq!(builder.width(), 1);
        let ids: Vec<_> = rows.iter().map(|r| r.commit_id).collect();
        assert_eq!(ids, vec![2, 1, 0]);
        assert!(rows[0].is_head);
        assert_eq!(rows[0].lanes, vec![Lane::Commit]);
        assert_eq!(rows[2].lanes, vec![Lane::Root]);
    }

    #[test]
    fn test_merge_layout() {
        let mut tree = GitTree::new();
        let c1 = tree.add_commit().unwrap().id();
        let c2 = tree.add_commit_new_branch_from(0).unwrap().id();
        tree.checkout(c1).unwrap();
        let c3 = tree.add_commit().unwrap().id();
        tree.merge(c2).unwrap();

        let mut builder = RowBuilder::new(10);
        let rows = builder.build_rows(&tree);

        assert_eq!(builder.width(), 2);
        let merge_row = &rows[0];
        assert_eq!(merge_row.parents, vec![c3, c2]);
        assert_eq!(merge_row.lanes[0], Lane::Merge(vec![1]));
        assert!(merge_row.lanes[0].is_event());
        assert_eq!(merge_row.lanes[0].get_merge_targets(), &[1]);

        // branch 1 lane stays open next to commit 3
        let c3_row = rows.iter().find(|r| r.commit_id == c3).unwrap();
        assert_eq!(c3_row.lanes, vec![Lane::Commit, Lane::Pass]);

        let c2_row = rows.iter().find(|r| r.commit_id == c2).unwrap();
        assert_eq!(c2_row.primary_lane, 1);
        assert_eq!(c2_row.lanes, vec![Lane::Pass, Lane::BranchStart(0)]);
    }

    #[test]
    fn test_lane_overflow_shares_last_lane() {
        let mut tree = GitTree::new();
        for _ in 0..3 {
            tree.add_commit_new_branch_from(0).unwrap();
        }

        let mut builder = RowBuilder::new(2);
        let rows = builder.build_rows(&tree);

        assert_eq!(builder.width(), 2);
        assert!(rows.iter().all(|r| r.primary_lane < 2));
    }
}
