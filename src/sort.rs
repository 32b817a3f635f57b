//! Sorting through an ordered tree.

use crate::error::Result;
use crate::ordered_tree::OrderedTree;
use log::debug;

/// Sorts `slice` with a transient tree of type `B`: every element is cloned into the tree,
/// then the in-order sequence is written back. The tree, and every clone it still holds, is
/// dropped before returning.
///
/// Equal elements keep their relative order because insertion sends them to the right of the
/// ones already present. If an insertion fails the slice is left untouched and the error is
/// returned.
///
/// # Examples
///
/// ```
/// use balanced_trees::red_black_tree::RedBlackTree;
/// use balanced_trees::sort;
/// use compare::natural;
///
/// let mut values = vec![3, 1, 2];
/// sort::sort_with::<RedBlackTree<_, _>, _, _>(&mut values, natural()).unwrap();
/// assert_eq!(values, vec![1, 2, 3]);
/// ```
pub fn sort_with<B, T, C>(slice: &mut [T], cmp: C) -> Result<()>
where
    B: OrderedTree<T, C>,
    T: Clone,
{
    let mut tree = B::with_cmp(cmp);
    for value in slice.iter() {
        if let Err(error) = tree.insert(value.clone()) {
            debug!("{} sort aborted after {} elements: {}", B::NAME, tree.len(), error);
            return Err(error);
        }
    }

    let mut index = 0;
    tree.in_order(|value| {
        slice[index] = value.clone();
        index += 1;
    });
    debug_assert_eq!(index, slice.len());
    Ok(())
}
