//! Self-balancing binary search tree where the heights of the two child subtrees of any node
//! differ by at most one.

mod node;
mod tree;

pub use self::node::Balance;
pub use self::tree::AvlTree;

use crate::error::Result;
use compare::Compare;

/// Sorts `slice` by building a transient avl tree from clones of its elements and writing them
/// back in order. Equal elements keep their relative order.
///
/// # Examples
///
/// ```
/// use balanced_trees::avl_tree;
/// use compare::natural;
///
/// let mut values = [5, 3, 8, 1, 4];
/// avl_tree::sort(&mut values, natural()).unwrap();
/// assert_eq!(values, [1, 3, 4, 5, 8]);
/// ```
pub fn sort<T, C>(slice: &mut [T], cmp: C) -> Result<()>
where
    T: Clone,
    C: Compare<T>,
{
    crate::sort::sort_with::<AvlTree<T, C>, T, C>(slice, cmp)
}
