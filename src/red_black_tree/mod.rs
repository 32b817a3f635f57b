//! Self-balancing binary search tree that uses a color bit to ensure that the tree remains
//! approximately balanced during insertions and deletions.

mod node;
mod tree;

pub use self::node::Color;
pub use self::tree::RedBlackTree;

use crate::error::Result;
use compare::Compare;

/// Sorts `slice` by building a transient red black tree from clones of its elements and
/// writing them back in order. Equal elements keep their relative order.
///
/// # Examples
///
/// ```
/// use balanced_trees::red_black_tree;
///
/// let mut values = vec!["pear", "apple", "fig"];
/// red_black_tree::sort(&mut values, |l: &&str, r: &&str| l.len().cmp(&r.len())).unwrap();
/// assert_eq!(values, vec!["fig", "pear", "apple"]);
/// ```
pub fn sort<T, C>(slice: &mut [T], cmp: C) -> Result<()>
where
    T: Clone,
    C: Compare<T>,
{
    crate::sort::sort_with::<RedBlackTree<T, C>, T, C>(slice, cmp)
}
