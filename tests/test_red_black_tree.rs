use balanced_trees::red_black_tree::{Color, RedBlackTree};
use balanced_trees::NodeRef;

fn shape(tree: &RedBlackTree<u32>) -> Vec<(u32, Color)> {
    fn visit(node: Option<NodeRef<'_, u32, Color>>, ret: &mut Vec<(u32, Color)>) {
        if let Some(node) = node {
            ret.push((*node.data(), node.color()));
            visit(node.left(), ret);
            visit(node.right(), ret);
        }
    }
    let mut ret = Vec::new();
    visit(tree.root(), &mut ret);
    ret
}

#[test]
fn int_test_insert_ascending() {
    let mut tree = RedBlackTree::new();
    for value in 1..=7 {
        tree.insert(value).unwrap();
        assert_eq!(tree.root().map(|node| node.color()), Some(Color::Black));
        assert_eq!(tree.validate(), Ok(()));
    }
    assert_eq!(tree.root().map(|node| *node.data()), Some(2));
    assert!(tree.height() <= 4);
}

#[test]
fn int_test_insert_descending() {
    let mut tree = RedBlackTree::new();
    for value in (1..=7).rev() {
        tree.insert(value).unwrap();
        assert_eq!(tree.validate(), Ok(()));
    }
    //             6(B)
    //            /    \
    //          4(R)   7(B)
    //         /    \
    //       2(B)   5(B)
    //      /    \
    //    1(R)   3(R)
    assert_eq!(
        shape(&tree),
        vec![
            (6, Color::Black),
            (4, Color::Red),
            (2, Color::Black),
            (1, Color::Red),
            (3, Color::Red),
            (5, Color::Black),
            (7, Color::Black),
        ],
    );
}

#[test]
fn int_test_remove_black_leaf() {
    let mut tree = RedBlackTree::new();
    for value in 1..=7 {
        tree.insert(value).unwrap();
    }
    // 1 is a black leaf with a red sibling
    assert_eq!(tree.remove(&1), Some(1));
    assert_eq!(tree.validate(), Ok(()));
    assert_eq!(tree.remove(&3), Some(3));
    assert_eq!(tree.validate(), Ok(()));
    assert_eq!(tree.remove(&2), Some(2));
    assert_eq!(tree.validate(), Ok(()));
    assert_eq!(
        tree.iter().cloned().collect::<Vec<u32>>(),
        vec![4, 5, 6, 7],
    );
}
