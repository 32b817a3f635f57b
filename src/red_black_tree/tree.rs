use crate::error::{InvariantViolation, Result};
use crate::node::{Link, NodeRef};
use crate::ordered_tree::OrderedTree;
use crate::raw_tree::{Iter, RawTree, Side};
use crate::red_black_tree::node::{self, Color};
use compare::{natural, Compare, Natural};
use log::debug;
use std::fmt;
use std::mem;
use std::result;

/// An ordered container implemented using a red black tree.
///
/// A red black tree is a self-balancing binary search tree where every node is colored red or
/// black. The root is black, a red node never has a red child, and every path from a node down
/// to an absent child passes through the same number of black nodes. Together these bound the
/// height by twice the logarithm of the number of nodes.
///
/// Payloads comparing equal to ones already in the tree are kept and placed to the right of
/// them.
///
/// # Examples
///
/// ```
/// use balanced_trees::red_black_tree::{Color, RedBlackTree};
///
/// let mut tree = RedBlackTree::new();
/// for value in 1..=3 {
///     tree.insert(value).unwrap();
/// }
///
/// let root = tree.root().unwrap();
/// assert_eq!(*root.data(), 2);
/// assert_eq!(root.color(), Color::Black);
/// assert_eq!(root.left().map(|node| node.color()), Some(Color::Red));
///
/// assert_eq!(tree.remove(&2), Some(2));
/// assert_eq!(tree.iter().collect::<Vec<&u32>>(), vec![&1, &3]);
/// ```
pub struct RedBlackTree<T, C = Natural<T>>
where
    C: Compare<T>,
{
    tree: RawTree<T, Color>,
    cmp: C,
}

impl<T> RedBlackTree<T>
where
    T: Ord,
{
    /// Constructs a new, empty `RedBlackTree<T>` ordered by `T`'s natural ordering.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::red_black_tree::RedBlackTree;
    ///
    /// let tree: RedBlackTree<u32> = RedBlackTree::new();
    /// assert!(tree.is_empty());
    /// ```
    pub fn new() -> Self {
        RedBlackTree::with_cmp(natural())
    }
}

impl<T, C> RedBlackTree<T, C>
where
    C: Compare<T>,
{
    /// Constructs a new, empty `RedBlackTree<T, C>` ordered by `cmp`.
    pub fn with_cmp(cmp: C) -> Self {
        RedBlackTree {
            tree: RawTree::new(),
            cmp,
        }
    }

    /// Constructs a new, empty `RedBlackTree<T, C>` that holds at most `limit` nodes.
    /// Insertions beyond the limit fail with `Error::CapacityExceeded`.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::red_black_tree::RedBlackTree;
    /// use compare::natural;
    ///
    /// let mut tree = RedBlackTree::with_node_limit(natural(), 1);
    /// assert!(tree.insert(1).is_ok());
    /// assert!(tree.insert(2).is_err());
    /// ```
    pub fn with_node_limit(cmp: C, limit: usize) -> Self {
        RedBlackTree {
            tree: RawTree::with_node_limit(limit),
            cmp,
        }
    }

    /// Returns a reference to the tree's comparator.
    pub fn cmp(&self) -> &C {
        &self.cmp
    }

    /// Inserts a payload into the tree as a red leaf and recolors or rotates on the way up.
    /// Payloads comparing equal to existing ones are kept. If allocation fails the tree is
    /// unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1).unwrap();
    /// tree.insert(1).unwrap();
    /// assert_eq!(tree.len(), 2);
    /// ```
    pub fn insert(&mut self, value: T) -> Result<()> {
        let (parent, side) = self.tree.find_insert_pos(&value, &self.cmp);
        let handle = self.tree.allocate(value, Color::Red)?;
        self.tree.attach(handle, parent, side);
        node::insert_fixup(&mut self.tree, handle);
        Ok(())
    }

    /// Removes a payload comparing equal to `key` from the tree and returns it, or `None` if
    /// there is no such payload.
    ///
    /// A node with two children is replaced by its in-order successor node, which is relinked
    /// into its place and takes its color.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
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
        let (left, right, parent, color) = {
            let node = self.tree.node(target);
            (node.left, node.right, node.parent, node.meta)
        };

        let mut removed_color = color;
        let (child, child_parent): (Link, Link) = match (left, right) {
            (None, _) => {
                self.tree.transplant(target, right);
                (right, parent)
            },
            (_, None) => {
                self.tree.transplant(target, left);
                (left, parent)
            },
            (Some(left), Some(right)) => {
                let successor = self.tree.minimum(right);
                removed_color = self.tree.node(successor).meta;
                let child = self.tree.node(successor).right;
                let child_parent = if successor == right {
                    Some(successor)
                } else {
                    let successor_parent = self.tree.node(successor).parent;
                    self.tree.transplant(successor, child);
                    self.tree.link_child(successor, Side::Right, Some(right));
                    successor_parent
                };
                self.tree.transplant(target, Some(successor));
                self.tree.link_child(successor, Side::Left, Some(left));
                self.tree.node_mut(successor).meta = color;
                (child, child_parent)
            },
        };

        let data = self.tree.free(target);
        if removed_color == Color::Black {
            node::remove_fixup(&mut self.tree, child, child_parent);
        }
        Some(data)
    }

    /// Returns a reference to the first payload comparing equal to `key` on the search path,
    /// or `None` if there is no such payload.
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

    pub fn pre_order<F>(&self, visit: F)
    where
        F: FnMut(&T),
    {
        self.tree.pre_order(visit);
    }

    pub fn in_order<F>(&self, visit: F)
    where
        F: FnMut(&T),
    {
        self.tree.in_order(visit);
    }

    pub fn post_order<F>(&self, visit: F)
    where
        F: FnMut(&T),
    {
        self.tree.post_order(visit);
    }

    /// Returns an iterator over the tree in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(2).unwrap();
    /// tree.insert(1).unwrap();
    ///
    /// let mut iterator = tree.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next(), Some(&2));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> Iter<'_, T, Color> {
        self.tree.iter()
    }

    /// Returns a view of the root node, or `None` if the tree is empty.
    pub fn root(&self) -> Option<NodeRef<'_, T, Color>> {
        self.tree.root_ref()
    }

    /// Removes every payload from the tree.
    pub fn clear(&mut self) {
        debug!("clearing red black tree of {} nodes", self.len());
        self.tree.clear();
    }

    /// Removes every payload from the tree, passing each one by value to `cleanup` exactly
    /// once, children before parents.
    pub fn clear_with<F>(&mut self, cleanup: F)
    where
        F: FnMut(T),
    {
        debug!("releasing red black tree of {} nodes", self.len());
        self.tree.clear_with(cleanup);
    }

    // Returns the black height of the subtree, counting absent children as one black node.
    fn check_colors(&self, link: Link) -> result::Result<usize, InvariantViolation> {
        match link {
            None => Ok(1),
            Some(handle) => {
                let curr = self.tree.node(handle);
                let red_child =
                    node::is_red(&self.tree, curr.left) || node::is_red(&self.tree, curr.right);
                if curr.meta == Color::Red && red_child {
                    return Err(InvariantViolation::RedViolation);
                }
                let left = self.check_colors(curr.left)?;
                let right = self.check_colors(curr.right)?;
                if left != right {
                    return Err(InvariantViolation::BlackHeightMismatch { left, right });
                }
                Ok(left + if curr.meta == Color::Black { 1 } else { 0 })
            },
        }
    }

    /// Checks every structural invariant of the tree: parent links, order, node count, root
    /// color, red nodes without red children, and equal black heights.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// for value in 0..100 {
    ///     tree.insert(value).unwrap();
    /// }
    /// for value in 0..50 {
    ///     tree.remove(&value);
    /// }
    /// assert_eq!(tree.validate(), Ok(()));
    /// ```
    pub fn validate(&self) -> result::Result<(), InvariantViolation> {
        self.tree.check_structure(&self.cmp)?;
        if node::is_red(&self.tree, self.tree.root) {
            return Err(InvariantViolation::RedRoot);
        }
        self.check_colors(self.tree.root).map(|_| ())
    }
}

impl<T, C> OrderedTree<T, C> for RedBlackTree<T, C>
where
    C: Compare<T>,
{
    const NAME: &'static str = "rbt";

    fn with_cmp(cmp: C) -> Self {
        RedBlackTree::with_cmp(cmp)
    }

    fn insert(&mut self, value: T) -> Result<()> {
        RedBlackTree::insert(self, value)
    }

    fn remove(&mut self, key: &T) -> Option<T> {
        RedBlackTree::remove(self, key)
    }

    fn search(&self, key: &T) -> Option<&T> {
        RedBlackTree::search(self, key)
    }

    fn len(&self) -> usize {
        RedBlackTree::len(self)
    }

    fn height(&self) -> usize {
        RedBlackTree::height(self)
    }

    fn in_order<F>(&self, visit: F)
    where
        F: FnMut(&T),
    {
        RedBlackTree::in_order(self, visit);
    }
}

impl<'a, T, C> IntoIterator for &'a RedBlackTree<T, C>
where
    C: Compare<T>,
{
    type IntoIter = Iter<'a, T, Color>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, C> Default for RedBlackTree<T, C>
where
    C: Compare<T> + Default,
{
    fn default() -> Self {
        RedBlackTree::with_cmp(C::default())
    }
}

impl<T, C> fmt::Debug for RedBlackTree<T, C>
where
    T: fmt::Debug,
    C: Compare<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
