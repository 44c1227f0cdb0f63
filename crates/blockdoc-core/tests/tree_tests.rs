#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use blockdoc_core::errors::BlockDocError;
use blockdoc_core::rules::validation::validate_tree;
use blockdoc_core::Tree;
use common::dfs_values;

#[test]
fn test_insert_at_root_matches_insert_at_node_end_of_root() {
    let mut via_root = Tree::with_root(1);
    via_root.insert_at_root_end(2);
    via_root.insert_at_root_end(3);

    let mut via_node = Tree::with_root(1);
    let root = via_node.root();
    via_node.insert_at_node_end(root, 2).unwrap();
    via_node.insert_at_node_end(root, 3).unwrap();

    assert_eq!(dfs_values(&via_root), dfs_values(&via_node));
}

#[test]
fn test_move_after_leaf_carries_subtree() {
    let mut tree = Tree::with_root(1);
    let root = tree.root();

    tree.insert_at_node_end(root, 2).unwrap();
    let node1 = tree.insert_at_node_end(root, 3).unwrap();
    tree.insert_at_node_end(root, 8).unwrap();
    let node2 = tree.insert_at_node_end(root, 5).unwrap();

    let node3 = tree.insert_at_node_end(node1, 4).unwrap();
    tree.insert_at_node_end(node2, 6).unwrap();
    tree.insert_at_node_end(node2, 7).unwrap();

    tree.move_after_node(node2, node3).unwrap();

    assert_eq!(dfs_values(&tree), vec![1, 2, 3, 4, 5, 6, 7, 8]);
    assert_eq!(tree.parent(node2), Some(node1));
    validate_tree(&tree).unwrap();
}

#[test]
fn test_move_before_leaf_carries_subtree() {
    let mut tree = Tree::with_root(1);
    let root = tree.root();

    tree.insert_at_node_end(root, 2).unwrap();
    let node1 = tree.insert_at_node_end(root, 3).unwrap();
    tree.insert_at_node_end(root, 8).unwrap();
    let node2 = tree.insert_at_node_end(root, 4).unwrap();

    let node3 = tree.insert_at_node_end(node1, 7).unwrap();
    tree.insert_at_node_end(node2, 5).unwrap();
    tree.insert_at_node_end(node2, 6).unwrap();

    tree.move_before_node(node2, node3).unwrap();

    assert_eq!(dfs_values(&tree), vec![1, 2, 3, 4, 5, 6, 7, 8]);
    validate_tree(&tree).unwrap();
}

#[test]
fn test_move_within_same_parent() {
    let mut tree = Tree::with_root(0);
    let a = tree.insert_at_root_end(1);
    let b = tree.insert_at_root_end(2);
    let c = tree.insert_at_root_end(3);

    tree.move_before_node(c, a).unwrap();
    assert_eq!(dfs_values(&tree), vec![0, 3, 1, 2]);

    tree.move_after_node(c, b).unwrap();
    assert_eq!(dfs_values(&tree), vec![0, 1, 2, 3]);

    tree.move_after_node(b, b).unwrap();
    assert_eq!(dfs_values(&tree), vec![0, 1, 2, 3]);
    validate_tree(&tree).unwrap();
}

#[test]
fn test_insert_after_and_before_nested_node() {
    let mut tree = Tree::with_root(1);
    let root = tree.root();

    tree.insert_at_node_end(root, 2).unwrap();
    let node1 = tree.insert_at_node_end(root, 3).unwrap();
    tree.insert_at_node_end(root, 7).unwrap();

    let five = tree.insert_at_node_end(node1, 5).unwrap();
    tree.insert_before_node(five, 4).unwrap();
    tree.insert_after_node(five, 6).unwrap();

    assert_eq!(dfs_values(&tree), vec![1, 2, 3, 4, 5, 6, 7]);
}

#[test]
fn test_sibling_insert_at_root_is_illegal() {
    let mut tree = Tree::with_root(1);
    let root = tree.root();

    assert_eq!(
        tree.insert_after_node(root, 23),
        Err(BlockDocError::IllegalRootOperation {
            op: "insert after".to_string()
        })
    );
    assert_eq!(
        tree.insert_before_node(root, 23),
        Err(BlockDocError::IllegalRootOperation {
            op: "insert before".to_string()
        })
    );
    assert_eq!(tree.len(), 1);
}

#[test]
fn test_delete_subtree_under_non_root() {
    let mut tree = Tree::with_root(1);
    let root = tree.root();

    tree.insert_at_node_end(root, 2).unwrap();
    let node1 = tree.insert_at_node_end(root, 3).unwrap();
    tree.insert_at_node_end(root, 8).unwrap();
    let node2 = tree.insert_at_node_end(root, 4).unwrap();

    tree.insert_at_node_end(node1, 7).unwrap();
    let five = tree.insert_at_node_end(node2, 5).unwrap();
    tree.insert_at_node_end(node2, 6).unwrap();

    let removed = tree.delete_node(node2).unwrap();

    assert_eq!(removed, vec![4, 5, 6]);
    assert_eq!(dfs_values(&tree), vec![1, 2, 3, 7, 8]);
    assert!(!tree.contains(five));
    assert_eq!(tree.len(), 5);
    validate_tree(&tree).unwrap();
}

#[test]
fn test_delete_root_is_illegal() {
    let mut tree: Tree<i32> = Tree::new();
    let root = tree.root();

    assert_eq!(
        tree.delete_node(root),
        Err(BlockDocError::IllegalRootOperation {
            op: "delete".to_string()
        })
    );
}

#[test]
fn test_rejected_root_operations_leave_tree_untouched() {
    let mut tree = Tree::with_root(1);
    let root = tree.root();
    let two = tree.insert_at_root_end(2);
    tree.insert_at_node_end(two, 3).unwrap();
    tree.insert_at_root_end(4);
    let before = format!("{:?}", tree);

    assert!(matches!(
        tree.insert_before_node(root, 9),
        Err(BlockDocError::IllegalRootOperation { .. })
    ));
    assert!(matches!(
        tree.insert_after_node(root, 9),
        Err(BlockDocError::IllegalRootOperation { .. })
    ));
    assert!(matches!(
        tree.delete_node(root),
        Err(BlockDocError::IllegalRootOperation { .. })
    ));
    assert!(matches!(
        tree.duplicate_node(root),
        Err(BlockDocError::IllegalRootOperation { .. })
    ));
    assert!(matches!(
        tree.move_before_node(root, two),
        Err(BlockDocError::IllegalRootOperation { .. })
    ));
    assert!(matches!(
        tree.move_after_node(two, root),
        Err(BlockDocError::IllegalRootOperation { .. })
    ));

    assert_eq!(format!("{:?}", tree), before);
}

#[test]
fn test_duplicate_whole_subtree() {
    let mut tree = Tree::with_root(1);

    tree.insert_at_root_end(2);
    let node1 = tree.insert_at_root_end(3);
    tree.insert_at_root_end(8);

    let node2 = tree.insert_at_node_end(node1, 4).unwrap();
    tree.insert_at_node_end(node1, 7).unwrap();

    tree.insert_at_node_end(node2, 5).unwrap();
    tree.insert_at_node_end(node2, 6).unwrap();

    let copy = tree.duplicate_node(node1).unwrap();

    assert_eq!(
        dfs_values(&tree),
        vec![1, 2, 3, 4, 5, 6, 7, 3, 4, 5, 6, 7, 8]
    );
    assert_eq!(tree.child_count(copy), 2);
    validate_tree(&tree).unwrap();
}

#[test]
fn test_duplicate_copy_is_structurally_independent() {
    let mut tree = Tree::with_root(0);
    let a = tree.insert_at_root_end(1);
    tree.insert_at_node_end(a, 2).unwrap();

    let copy = tree.duplicate_node(a).unwrap();
    let copied_child = tree.children(copy).next().unwrap();
    tree.delete_node(copied_child).unwrap();

    assert_eq!(tree.child_count(a), 1);
    assert_eq!(tree.child_count(copy), 0);
    assert_eq!(dfs_values(&tree), vec![0, 1, 2, 1]);
}

#[test]
fn test_freed_slots_are_reused_with_new_generation() {
    let mut tree = Tree::new();
    let a = tree.insert_at_root_end(1);
    tree.delete_node(a).unwrap();
    let b = tree.insert_at_root_end(2);

    assert_eq!(a.index(), b.index());
    assert_ne!(a.generation(), b.generation());
    assert!(tree.get(a).is_none());
    assert_eq!(tree.get(b), Some(&2));
}

#[test]
fn test_dfs_from_subtree_is_restartable() {
    let mut tree = Tree::with_root(0);
    let a = tree.insert_at_root_end(1);
    tree.insert_at_node_end(a, 2).unwrap();
    tree.insert_at_root_end(3);

    let first: Vec<_> = tree.dfs_from(a).collect();
    let second: Vec<_> = tree.dfs_from(a).collect();

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
    assert_eq!(first[0], (a, 0));
}
