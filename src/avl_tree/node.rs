use crate::arena::Handle;
use crate::node::NodeRef;
use crate::raw_tree::RawTree;
use log::trace;
use std::cmp;

/// Height of the left subtree minus height of the right subtree.
pub type Balance = i8;

impl<'a, T> NodeRef<'a, T, Balance> {
    /// Returns the balance factor of the node: the height of its left subtree minus the height
    /// of its right subtree.
    pub fn balance(&self) -> i8 {
        *self.meta()
    }
}

fn balance<T>(tree: &RawTree<T, Balance>, handle: Handle) -> Balance {
    tree.node(handle).meta
}

fn set_balances<T>(
    tree: &mut RawTree<T, Balance>,
    a: Handle,
    a_balance: Balance,
    b: Handle,
    b_balance: Balance,
) {
    tree.node_mut(a).meta = a_balance;
    tree.node_mut(b).meta = b_balance;
}

// The balance updates hold for any pair of balances, so the same rotations serve single and
// double rotations after both insertions and removals.
pub fn rotate_left<T>(tree: &mut RawTree<T, Balance>, a: Handle) -> Handle {
    let b = tree.rotate_left(a);
    let a_balance = balance(tree, a) + 1 - cmp::min(balance(tree, b), 0);
    let b_balance = balance(tree, b) + 1 + cmp::max(a_balance, 0);
    set_balances(tree, a, a_balance, b, b_balance);
    b
}

pub fn rotate_right<T>(tree: &mut RawTree<T, Balance>, a: Handle) -> Handle {
    let b = tree.rotate_right(a);
    let a_balance = balance(tree, a) - 1 - cmp::max(balance(tree, b), 0);
    let b_balance = balance(tree, b) - 1 + cmp::min(a_balance, 0);
    set_balances(tree, a, a_balance, b, b_balance);
    b
}

/// Restores the balance of a node whose balance factor reached 2 or -2 and returns the new
/// root of its subtree. Nodes that are not out of balance are returned unchanged.
pub fn rebalance<T>(tree: &mut RawTree<T, Balance>, handle: Handle) -> Handle {
    let node_balance = balance(tree, handle);
    if node_balance > 1 {
        let child = tree
            .node(handle)
            .left
            .expect("Expected a left child under a left-heavy node.");
        if balance(tree, child) < 0 {
            trace!("avl rebalance: left-right case");
            rotate_left(tree, child);
        } else {
            trace!("avl rebalance: left-left case");
        }
        rotate_right(tree, handle)
    } else if node_balance < -1 {
        let child = tree
            .node(handle)
            .right
            .expect("Expected a right child under a right-heavy node.");
        if balance(tree, child) > 0 {
            trace!("avl rebalance: right-left case");
            rotate_right(tree, child);
        } else {
            trace!("avl rebalance: right-right case");
        }
        rotate_left(tree, handle)
    } else {
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::{rebalance, rotate_left, rotate_right, Balance};
    use crate::raw_tree::{RawTree, Side};

    fn chain(values: &[(u32, Balance, Side)]) -> RawTree<u32, Balance> {
        let mut tree = RawTree::new();
        let mut parent = None;
        for &(value, balance, side) in values {
            let handle = tree.allocate(value, balance).unwrap();
            tree.attach(handle, parent, side);
            parent = Some(handle);
        }
        tree
    }

    #[test]
    fn test_rotations_update_balances() {
        // 1
        //  \
        //   2
        //    \
        //     3
        let mut tree = chain(&[(1, -2, Side::Left), (2, -1, Side::Right), (3, 0, Side::Right)]);
        let root = tree.root.unwrap();
        let new_root = rotate_left(&mut tree, root);
        assert_eq!(tree.node(new_root).data, 2);
        assert_eq!(tree.node(new_root).meta, 0);
        assert_eq!(tree.node(root).meta, 0);

        let old_root = rotate_right(&mut tree, new_root);
        assert_eq!(old_root, root);
        assert_eq!(tree.node(root).meta, -2);
        assert_eq!(tree.node(new_root).meta, -1);
    }

    #[test]
    fn test_rebalance_double_rotation() {
        //   3         2
        //  /         / \
        // 1    ->   1   3
        //  \
        //   2
        let mut tree = chain(&[(3, 2, Side::Left), (1, -1, Side::Left), (2, 0, Side::Right)]);
        let root = tree.root.unwrap();
        let new_root = rebalance(&mut tree, root);
        assert_eq!(tree.root, Some(new_root));
        assert_eq!(tree.node(new_root).data, 2);
        assert_eq!(tree.node(new_root).meta, 0);
        assert_eq!(tree.height(), 2);
        assert_eq!(tree.iter().cloned().collect::<Vec<u32>>(), vec![1, 2, 3]);
        let left = tree.node(new_root).left.unwrap();
        let right = tree.node(new_root).right.unwrap();
        assert_eq!(tree.node(left).meta, 0);
        assert_eq!(tree.node(right).meta, 0);
    }

    #[test]
    fn test_rebalance_balanced_node() {
        let mut tree = chain(&[(1, 0, Side::Left)]);
        let root = tree.root.unwrap();
        assert_eq!(rebalance(&mut tree, root), root);
    }
}
