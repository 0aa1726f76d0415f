use gitgud_core::{CommitId, GitTree};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Commit,
    CommitTo(CommitId),
    Branch,
    BranchFrom(CommitId),
    Checkout(CommitId),
    Merge(CommitId),
    MergeInto(CommitId, CommitId),
    Undo,
}

fn op() -> impl Strategy<Value = Op> {
    // IDs a little past what a short run can create, so misses happen too
    let id = 0..24u64;
    prop_oneof![
        3 => Just(Op::Commit),
        1 => id.clone().prop_map(Op::CommitTo),
        2 => Just(Op::Branch),
        1 => id.clone().prop_map(Op::BranchFrom),
        2 => id.clone().prop_map(Op::Checkout),
        2 => id.clone().prop_map(Op::Merge),
        1 => (id.clone(), id).prop_map(|(a, b)| Op::MergeInto(a, b)),
        1 => Just(Op::Undo),
    ]
}

fn check_invariants(tree: &GitTree) {
    assert!(tree.contains(tree.head_id()));
    assert_eq!(tree.roots().len(), 1);
    assert_eq!(tree.root().id(), 0);

    for commit in tree.commits() {
        let id = commit.id();
        assert!(commit.branch() < tree.num_branches());
        assert_eq!(commit.is_merge_commit(), commit.num_parents() >= 2);

        for parent in commit.parent_ids() {
            assert_ne!(parent, id);
            let parent = tree.get(parent).expect("parent is in the tree");
            assert!(parent.child_ids().any(|c| c == id));
        }
        for child in commit.child_ids() {
            assert_ne!(child, id);
            let child = tree.get(child).expect("child is in the tree");
            assert!(child.parent_ids().any(|p| p == id));
        }
    }
}

/// Apply one operation, checking its postconditions. Failed operations must
/// leave the tree untouched.
fn apply(tree: &mut GitTree, op: &Op) {
    let before = tree.snapshot();
    let head = tree.head().clone();
    let branches = tree.num_branches();

    let created = match *op {
        Op::Commit => tree.add_commit().map(|c| c.id()),
        Op::CommitTo(parent) => tree.add_commit_to(parent).map(|c| c.id()),
        Op::Branch => tree.add_commit_new_branch().map(|c| c.id()),
        Op::BranchFrom(parent) => tree.add_commit_new_branch_from(parent).map(|c| c.id()),
        Op::Checkout(id) => tree.checkout(id).map(|_| id),
        Op::Merge(other) => tree.merge(other).map(|c| c.id()),
        Op::MergeInto(parent, other) => tree.merge_into(parent, other).map(|c| c.id()),
        Op::Undo => {
            let removed = tree.undo().expect("ids are sequential so the latest is a leaf");
            if removed.is_none() {
                assert_eq!(tree.snapshot(), before);
            }
            return;
        }
    };

    let Ok(id) = created else {
        assert_eq!(tree.snapshot(), before);
        return;
    };
    assert_eq!(tree.head_id(), id);

    let new = tree.head();
    match *op {
        Op::Commit => {
            assert_eq!(new.parent_ids().collect::<Vec<_>>(), vec![head.id()]);
            assert_eq!(new.branch(), head.branch());
            assert_eq!(tree.num_branches(), branches);
        }
        Op::Branch | Op::BranchFrom(_) => {
            assert_eq!(new.branch(), branches);
            assert_eq!(tree.num_branches(), branches + 1);
            assert!(new.is_new_branch());
        }
        Op::Merge(other) => {
            assert_eq!(new.parent_ids().collect::<Vec<_>>(), vec![head.id(), other]);
            assert_eq!(new.branch(), head.branch());
            assert!(new.is_merge_commit());
        }
        _ => {}
    }
}

proptest! {
    #[test]
    fn test_invariants_hold_for_any_sequence(ops in prop::collection::vec(op(), 0..40)) {
        let mut tree = GitTree::new();
        check_invariants(&tree);

        for op in &ops {
            apply(&mut tree, op);
            check_invariants(&tree);
        }
    }

    #[test]
    fn test_undo_everything_returns_to_root(ops in prop::collection::vec(op(), 0..40)) {
        let mut tree = GitTree::new();
        for op in &ops {
            apply(&mut tree, op);
        }

        while tree.undo().unwrap().is_some() {
            check_invariants(&tree);
        }

        prop_assert_eq!(tree.num_commits(), 1);
        prop_assert_eq!(tree.head_id(), 0);
        prop_assert!(tree.head().is_leaf());
    }
}
