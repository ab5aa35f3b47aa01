use bst_rebuild::tree::{Node, Tree};
use quickcheck_macros::quickcheck;

use std::collections::BTreeSet;

use crate::Op;

/// Applies a set of operations to a tree and a set.
/// This way we can ensure that after a random smattering of inserts
/// and deletes we have the same set of keys in both.
fn do_ops<K>(ops: &[Op<K>], bst: &mut Tree<K>, set: &mut BTreeSet<K>)
where
    K: Ord + Clone,
{
    for op in ops {
        match op {
            Op::Insert(k) => {
                bst.insert(k.clone());
                set.insert(k.clone());
            }
            Op::Delete(k) => {
                bst.delete(k);
                set.remove(k);
            }
            Op::Rebalance => bst.rebalance(),
            Op::Traverse => {
                let sorted: Vec<K> = set.iter().cloned().collect();
                for mut keys in [bst.level_order(), bst.preorder(), bst.postorder()] {
                    keys.sort();
                    assert!(keys == sorted);
                }
            }
        }
    }
}

/// Checks the search order below `node` using only the public accessors.
fn is_search_tree(node: Option<&Node<i8>>, low: Option<i8>, high: Option<i8>) -> bool {
    let Some(node) = node else {
        return true;
    };
    let key = *node.key();
    low.map_or(true, |low| low < key)
        && high.map_or(true, |high| key < high)
        && is_search_tree(node.left(), low, Some(key))
        && is_search_tree(node.right(), Some(key), high)
}

#[quickcheck]
fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
    let mut tree = Tree::new();
    let mut set = BTreeSet::new();

    do_ops(&ops, &mut tree, &mut set);
    tree.inorder() == set.into_iter().collect::<Vec<_>>()
        && is_search_tree(tree.root(), None, None)
}

#[quickcheck]
fn inorder_is_strictly_ascending(ops: Vec<Op<i8>>) -> bool {
    let mut tree = Tree::new();
    do_ops(&ops, &mut tree, &mut BTreeSet::new());

    tree.inorder().windows(2).all(|pair| pair[0] < pair[1])
}

#[quickcheck]
fn built_from_duplicates(xs: Vec<i8>) -> bool {
    let tree = Tree::from_keys(xs.iter().copied());
    let distinct: BTreeSet<_> = xs.into_iter().collect();

    tree.is_balanced() && tree.inorder() == distinct.into_iter().collect::<Vec<_>>()
}

#[quickcheck]
fn insert_existing_is_idempotent(xs: Vec<i8>, pick: usize) -> bool {
    let mut tree = Tree::from_keys(xs.iter().copied());
    if xs.is_empty() {
        return true;
    }
    let before = tree.level_order();
    tree.insert(xs[pick % xs.len()]);

    tree.level_order() == before
}

#[quickcheck]
fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        tree.insert(*x);
    }
    let added: BTreeSet<_> = xs.into_iter().collect();
    let nots: BTreeSet<_> = nots.into_iter().collect();
    let mut nots = nots.difference(&added);

    nots.all(|x| tree.find(x).is_none())
}

#[quickcheck]
fn with_deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        tree.insert(*x);
    }

    let mut expected: Vec<i8> = xs.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
    for delete in &deletes {
        tree.delete(delete);
        expected.retain(|x| x != delete);
        if tree.inorder() != expected {
            return false;
        }
    }

    deletes.iter().all(|x| tree.find(x).is_none())
}

#[quickcheck]
fn rebalance_keeps_keys(xs: Vec<i8>, ys: Vec<i8>) -> bool {
    let mut tree = Tree::from_keys(xs);
    for y in ys {
        tree.insert(y);
    }
    let before = tree.inorder();
    tree.rebalance();

    tree.is_balanced() && tree.inorder() == before
}

#[quickcheck]
fn depth_counts_parents(xs: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        tree.insert(*x);
    }

    let mut ok = true;
    tree.level_order_with(|node| {
        let depth = tree.depth(node);
        let expected = match tree.parent(node) {
            Some(parent) => tree.depth(parent).map(|d| d + 1),
            None => Ok(0),
        };
        ok &= depth == expected;
    });
    ok
}
