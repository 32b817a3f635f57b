use crate::arena::Handle;
use crate::avl_tree::node::{self, Balance};
use crate::error::{InvariantViolation, Result};
use crate::node::{Link, NodeRef};
use crate::ordered_tree::OrderedTree;
use crate::raw_tree::{Iter, RawTree, Side};
use compare::{natural, Compare, Natural};
use log::debug;
use std::cmp;
use std::fmt;
use std::mem;
use std::result;

/// An ordered container implemented using an avl tree.
///
/// An avl tree is a self-balancing binary search tree that maintains the invariant that the
/// heights of the two child subtrees of any node differ by at most one. Every node stores that
/// difference as its balance factor and a link to its parent, and insertions and removals
/// update the balance factors incrementally on the way back to the root.
///
/// Payloads are ordered by a comparator. Payloads comparing equal to ones already in the tree
/// are kept and placed to the right of them.
///
/// # Examples
///
/// ```
/// use balanced_trees::avl_tree::AvlTree;
///
/// let mut tree = AvlTree::new();
/// tree.insert(3).unwrap();
/// tree.insert(1).unwrap();
/// tree.insert(2).unwrap();
///
/// assert_eq!(tree.len(), 3);
/// assert_eq!(tree.height(), 2);
/// assert_eq!(tree.root().map(|node| *node.data()), Some(2));
///
/// assert_eq!(tree.search(&1), Some(&1));
/// assert_eq!(tree.remove(&1), Some(1));
/// assert_eq!(tree.remove(&1), None);
/// ```
pub struct AvlTree<T, C = Natural<T>>
where
    C: Compare<T>,
{
    tree: RawTree<T, Balance>,
    cmp: C,
}

impl<T> AvlTree<T>
where
    T: Ord,
{
    /// Constructs a new, empty `AvlTree<T>` ordered by `T`'s natural ordering.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::avl_tree::AvlTree;
    ///
    /// let tree: AvlTree<u32> = AvlTree::new();
    /// assert!(tree.is_empty());
    /// ```
    pub fn new() -> Self {
        AvlTree::with_cmp(natural())
    }
}

impl<T, C> AvlTree<T, C>
where
    C: Compare<T>,
{
    /// Constructs a new, empty `AvlTree<T, C>` ordered by `cmp`.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::with_cmp(|l: &u32, r: &u32| r.cmp(l));
    /// tree.insert(1).unwrap();
    /// tree.insert(2).unwrap();
    /// assert_eq!(tree.iter().collect::<Vec<&u32>>(), vec![&2, &1]);
    /// ```
    pub fn with_cmp(cmp: C) -> Self {
        AvlTree {
            tree: RawTree::new(),
            cmp,
        }
    }

    /// Constructs a new, empty `AvlTree<T, C>` that holds at most `limit` nodes. Insertions
    /// beyond the limit fail with `Error::CapacityExceeded`.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::avl_tree::AvlTree;
    /// use compare::natural;
    ///
    /// let mut tree = AvlTree::with_node_limit(natural(), 1);
    /// assert!(tree.insert(1).is_ok());
    /// assert!(tree.insert(2).is_err());
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn with_node_limit(cmp: C, limit: usize) -> Self {
        AvlTree {
            tree: RawTree::with_node_limit(limit),
            cmp,
        }
    }

    /// Returns a reference to the tree's comparator.
    pub fn cmp(&self) -> &C {
        &self.cmp
    }

    /// Inserts a payload into the tree. Payloads comparing equal to existing ones are kept.
    ///
    /// The node is allocated before anything is linked, so if allocation fails the tree is
    /// left exactly as it was and the payload is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(1).unwrap();
    /// tree.insert(1).unwrap();
    /// assert_eq!(tree.len(), 2);
    /// ```
    pub fn insert(&mut self, value: T) -> Result<()> {
        let (parent, side) = self.tree.find_insert_pos(&value, &self.cmp);
        let handle = self.tree.allocate(value, 0)?;
        self.tree.attach(handle, parent, side);
        self.retrace_insert(handle);
        Ok(())
    }

    // Walks up from a new leaf. Each ancestor whose subtree grew tilts towards the new leaf;
    // the walk stops once a subtree absorbs the growth or after the first rotation.
    fn retrace_insert(&mut self, mut child: Handle) {
        while let Some(parent) = self.tree.node(child).parent {
            let side = self.tree.side_of(child);
            let balance = {
                let node = self.tree.node_mut(parent);
                node.meta += match side {
                    Side::Left => 1,
                    Side::Right => -1,
                };
                node.meta
            };
            match balance {
                0 => break,
                1 | -1 => child = parent,
                _ => {
                    node::rebalance(&mut self.tree, parent);
                    break;
                },
            }
        }
    }

    /// Removes a payload comparing equal to `key` from the tree and returns it, or `None` if
    /// there is no such payload.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(1).unwrap();
    /// assert_eq!(tree.remove(&1), Some(1));
    /// assert_eq!(tree.remove(&1), None);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<T>
    where
        Q: ?Sized,
        C: Compare<Q, T>,
    {
        let target = self.tree.find(key, &self.cmp)?;
        let node = self.tree.node(target);
        match (node.left, node.right) {
            (Some(_), Some(right)) => {
                let successor = self.tree.minimum(right);
                let data = self.unlink(successor);
                Some(mem::replace(&mut self.tree.node_mut(target).data, data))
            },
            _ => Some(self.unlink(target)),
        }
    }

    // precondition: the node has at most one child
    fn unlink(&mut self, handle: Handle) -> T {
        let (child, parent) = {
            let node = self.tree.node(handle);
            debug_assert!(node.left.is_none() || node.right.is_none());
            (node.left.or(node.right), node.parent)
        };
        let side = parent.map(|_| self.tree.side_of(handle));
        self.tree.transplant(handle, child);
        let data = self.tree.free(handle);
        if let (Some(parent), Some(side)) = (parent, side) {
            self.retrace_remove(parent, side);
        }
        data
    }

    // Walks up from the parent of a removed node. Unlike insertion, a rotation may shorten the
    // rotated subtree, in which case the walk has to continue above it.
    fn retrace_remove(&mut self, mut parent: Handle, mut side: Side) {
        loop {
            let balance = {
                let node = self.tree.node_mut(parent);
                node.meta += match side {
                    Side::Left => -1,
                    Side::Right => 1,
                };
                node.meta
            };
            let subtree = match balance {
                1 | -1 => return,
                0 => parent,
                _ => {
                    let subtree = node::rebalance(&mut self.tree, parent);
                    if self.tree.node(subtree).meta != 0 {
                        return;
                    }
                    subtree
                },
            };
            match self.tree.node(subtree).parent {
                None => return,
                Some(next) => {
                    side = self.tree.side_of(subtree);
                    parent = next;
                },
            }
        }
    }

    /// Returns a reference to the first payload comparing equal to `key` on the search path,
    /// or `None` if there is no such payload.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(1).unwrap();
    /// assert_eq!(tree.search(&1), Some(&1));
    /// assert_eq!(tree.search(&2), None);
    /// ```
    pub fn search<Q>(&self, key: &Q) -> Option<&T>
    where
        Q: ?Sized,
        C: Compare<Q, T>,
    {
        self.tree
            .find(key, &self.cmp)
            .map(|handle| &self.tree.node(handle).data)
    }

    /// Checks if a payload comparing equal to `key` exists in the tree.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized,
        C: Compare<Q, T>,
    {
        self.search(key).is_some()
    }

    /// Replaces the payload comparing equal to `value` and returns the old payload. If no
    /// payload compares equal, `value` is handed back as the error.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::with_cmp(|l: &(u32, &str), r: &(u32, &str)| l.0.cmp(&r.0));
    /// tree.insert((1, "a")).unwrap();
    /// assert_eq!(tree.replace((1, "b")), Ok((1, "a")));
    /// assert_eq!(tree.replace((2, "c")), Err((2, "c")));
    /// assert_eq!(tree.search(&(1, "")), Some(&(1, "b")));
    /// ```
    pub fn replace(&mut self, value: T) -> result::Result<T, T> {
        match self.tree.find(&value, &self.cmp) {
            Some(handle) => Ok(mem::replace(&mut self.tree.node_mut(handle).data, value)),
            None => Err(value),
        }
    }

    /// Returns the number of payloads in the tree.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Counts the nodes by walking the tree. Always equal to `len`.
    pub fn size(&self) -> usize {
        self.tree.size()
    }

    /// Returns the number of nodes on the longest path from the root, or 0 for an empty tree.
    pub fn height(&self) -> usize {
        self.tree.height()
    }

    /// Returns the minimum payload of the tree.
    pub fn min(&self) -> Option<&T> {
        self.tree.min()
    }

    /// Returns the maximum payload of the tree.
    pub fn max(&self) -> Option<&T> {
        self.tree.max()
    }

    /// Calls `visit` on every payload, each node before its subtrees.
    pub fn pre_order<F>(&self, visit: F)
    where
        F: FnMut(&T),
    {
        self.tree.pre_order(visit);
    }

    /// Calls `visit` on every payload in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// for value in &[3, 1, 2] {
    ///     tree.insert(*value).unwrap();
    /// }
    ///
    /// let mut sum = 0;
    /// tree.in_order(|value| sum = sum * 10 + value);
    /// assert_eq!(sum, 123);
    /// ```
    pub fn in_order<F>(&self, visit: F)
    where
        F: FnMut(&T),
    {
        self.tree.in_order(visit);
    }

    /// Calls `visit` on every payload, each node after its subtrees.
    pub fn post_order<F>(&self, visit: F)
    where
        F: FnMut(&T),
    {
        self.tree.post_order(visit);
    }

    /// Returns an iterator over the tree in order.
    pub fn iter(&self) -> Iter<'_, T, Balance> {
        self.tree.iter()
    }

    /// Returns a view of the root node, or `None` if the tree is empty.
    pub fn root(&self) -> Option<NodeRef<'_, T, Balance>> {
        self.tree.root_ref()
    }

    /// Removes every payload from the tree.
    pub fn clear(&mut self) {
        debug!("clearing avl tree of {} nodes", self.len());
        self.tree.clear();
    }

    /// Removes every payload from the tree, passing each one by value to `cleanup` exactly
    /// once, children before parents.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(String::from("a")).unwrap();
    /// tree.insert(String::from("b")).unwrap();
    ///
    /// let mut released = Vec::new();
    /// tree.clear_with(|value| released.push(value));
    /// assert_eq!(released.len(), 2);
    /// assert!(tree.is_empty());
    /// ```
    pub fn clear_with<F>(&mut self, cleanup: F)
    where
        F: FnMut(T),
    {
        debug!("releasing avl tree of {} nodes", self.len());
        self.tree.clear_with(cleanup);
    }

    fn check_balance(&self, link: Link) -> result::Result<usize, InvariantViolation> {
        match link {
            None => Ok(0),
            Some(handle) => {
                let node = self.tree.node(handle);
                let left = self.check_balance(node.left)?;
                let right = self.check_balance(node.right)?;
                let actual = left as isize - right as isize;
                if actual != node.meta as isize {
                    return Err(InvariantViolation::StaleBalance {
                        stored: node.meta,
                        actual,
                    });
                }
                if actual.abs() > 1 {
                    return Err(InvariantViolation::Unbalanced { balance: actual });
                }
                Ok(1 + cmp::max(left, right))
            },
        }
    }

    /// Checks every structural invariant of the tree: parent links, order, node count, and
    /// balance factors.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// for value in 0..100 {
    ///     tree.insert(value).unwrap();
    /// }
    /// assert_eq!(tree.validate(), Ok(()));
    /// ```
    pub fn validate(&self) -> result::Result<(), InvariantViolation> {
        self.tree.check_structure(&self.cmp)?;
        self.check_balance(self.tree.root).map(|_| ())
    }
}

impl<T, C> OrderedTree<T, C> for AvlTree<T, C>
where
    C: Compare<T>,
{
    const NAME: &'static str = "avl";

    fn with_cmp(cmp: C) -> Self {
        AvlTree::with_cmp(cmp)
    }

    fn insert(&mut self, value: T) -> Result<()> {
        AvlTree::insert(self, value)
    }

    fn remove(&mut self, key: &T) -> Option<T> {
        AvlTree::remove(self, key)
    }

    fn search(&self, key: &T) -> Option<&T> {
        AvlTree::search(self, key)
    }

    fn len(&self) -> usize {
        AvlTree::len(self)
    }

    fn height(&self) -> usize {
        AvlTree::height(self)
    }

    fn in_order<F>(&self, visit: F)
    where
        F: FnMut(&T),
    {
        AvlTree::in_order(self, visit);
    }
}

impl<'a, T, C> IntoIterator for &'a AvlTree<T, C>
where
    C: Compare<T>,
{
    type IntoIter = Iter<'a, T, Balance>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, C> Default for AvlTree<T, C>
where
    C: Compare<T> + Default,
{
    fn default() -> Self {
        AvlTree::with_cmp(C::default())
    }
}

impl<T, C> fmt::Debug for AvlTree<T, C>
where
    T: fmt::Debug,
    C: Compare<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::AvlTree;
    use crate::error::Error;
    use compare::natural;

    fn shape(tree: &AvlTree<u32>) -> Vec<(u32, i8)> {
        let mut ret = Vec::new();
        fn visit(node: Option<crate::NodeRef<'_, u32, i8>>, ret: &mut Vec<(u32, i8)>) {
            if let Some(node) = node {
                ret.push((*node.data(), node.balance()));
                visit(node.left(), ret);
                visit(node.right(), ret);
            }
        }
        visit(tree.root(), &mut ret);
        ret
    }

    #[test]
    fn test_len_empty() {
        let tree: AvlTree<u32> = AvlTree::new();
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.size(), 0);
        assert_eq!(tree.height(), 0);
        assert!(tree.root().is_none());
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn test_rebalance() {
        // 3 -> 2 -> 1 triggers a right rotation
        let mut tree = AvlTree::new();
        tree.insert(3).unwrap();
        tree.insert(2).unwrap();
        tree.insert(1).unwrap();
        assert_eq!(shape(&tree), vec![(2, 0), (1, 0), (3, 0)]);

        // 1 -> 3 -> 2 triggers a right-left rotation
        let mut tree = AvlTree::new();
        tree.insert(1).unwrap();
        tree.insert(3).unwrap();
        tree.insert(2).unwrap();
        assert_eq!(shape(&tree), vec![(2, 0), (1, 0), (3, 0)]);
    }

    #[test]
    fn test_remove_rebalance() {
        //   1     -> 1     ->    2
        //  / \        \         / \
        // 0   2        2       1   3
        //      \        \
        //       3        3
        let mut tree = AvlTree::new();
        for value in &[1, 0, 2, 3] {
            tree.insert(*value).unwrap();
        }
        assert_eq!(tree.height(), 3);
        assert_eq!(tree.remove(&0), Some(0));
        assert_eq!(shape(&tree), vec![(2, 0), (1, 0), (3, 0)]);
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn test_remove_two_children_keeps_node() {
        let mut tree = AvlTree::new();
        for value in &[2, 1, 3] {
            tree.insert(*value).unwrap();
        }
        let root = tree.tree.root;
        assert_eq!(tree.remove(&2), Some(2));
        assert_eq!(tree.tree.root, root);
        assert_eq!(shape(&tree), vec![(3, 1), (1, 0)]);
    }

    #[test]
    fn test_node_limit() {
        let mut tree = AvlTree::with_node_limit(natural(), 3);
        for value in &[1, 2, 3] {
            tree.insert(*value).unwrap();
        }
        let before = shape(&tree);
        match tree.insert(4) {
            Err(Error::CapacityExceeded(3)) => {},
            _ => panic!("Expected the insertion to fail."),
        }
        assert_eq!(shape(&tree), before);
        assert_eq!(tree.validate(), Ok(()));

        tree.remove(&1);
        assert!(tree.insert(4).is_ok());
    }

    #[test]
    fn test_replace() {
        let mut tree = AvlTree::with_cmp(|l: &(u32, u32), r: &(u32, u32)| l.0.cmp(&r.0));
        tree.insert((1, 1)).unwrap();
        tree.insert((2, 2)).unwrap();
        assert_eq!(tree.replace((2, 20)), Ok((2, 2)));
        assert_eq!(tree.search(&(2, 0)), Some(&(2, 20)));
        assert_eq!(tree.replace((3, 30)), Err((3, 30)));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_search_custom_key() {
        let mut tree = AvlTree::with_cmp(|l: &String, r: &String| l.cmp(r));
        tree.insert(String::from("b")).unwrap();
        tree.insert(String::from("a")).unwrap();
        assert!(tree.contains(&String::from("a")));
        assert!(!tree.contains(&String::from("c")));
        assert_eq!(tree.min().map(|s| s.as_str()), Some("a"));
        assert_eq!(tree.max().map(|s| s.as_str()), Some("b"));
    }

    #[test]
    fn test_debug() {
        let mut tree = AvlTree::new();
        tree.insert(2).unwrap();
        tree.insert(1).unwrap();
        assert_eq!(format!("{:?}", tree), "{1, 2}");
    }
}
