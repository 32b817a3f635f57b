use crate::arena::Handle;
use crate::raw_tree::RawTree;
use std::fmt;

pub type Link = Option<Handle>;

/// A struct representing an internal node of a balanced tree. `M` is the per-node bookkeeping
/// of the balancing scheme: the balance factor for avl trees and the color for red black
/// trees.
pub struct Node<T, M> {
    pub data: T,
    pub meta: M,
    pub left: Link,
    pub right: Link,
    pub parent: Link,
}

impl<T, M> Node<T, M> {
    pub fn new(data: T, meta: M) -> Self {
        Node {
            data,
            meta,
            left: None,
            right: None,
            parent: None,
        }
    }
}

/// A read-only view of a node and its position inside a tree.
///
/// Obtained from the `root` method of a tree and navigated with `left`, `right`, and
/// `parent`. Avl nodes additionally expose their balance factor and red black nodes their
/// color.
pub struct NodeRef<'a, T, M> {
    tree: &'a RawTree<T, M>,
    handle: Handle,
}

impl<'a, T, M> NodeRef<'a, T, M> {
    pub(crate) fn new(tree: &'a RawTree<T, M>, handle: Handle) -> Self {
        NodeRef { tree, handle }
    }

    fn node(&self) -> &'a Node<T, M> {
        self.tree.node(self.handle)
    }

    fn follow(&self, link: Link) -> Option<NodeRef<'a, T, M>> {
        link.map(|handle| NodeRef::new(self.tree, handle))
    }

    /// Returns the payload stored in the node.
    pub fn data(&self) -> &'a T {
        &self.node().data
    }

    pub fn left(&self) -> Option<NodeRef<'a, T, M>> {
        self.follow(self.node().left)
    }

    pub fn right(&self) -> Option<NodeRef<'a, T, M>> {
        self.follow(self.node().right)
    }

    /// Returns the structural parent of the node, or `None` for the root.
    pub fn parent(&self) -> Option<NodeRef<'a, T, M>> {
        self.follow(self.node().parent)
    }

    pub(crate) fn meta(&self) -> &'a M {
        &self.node().meta
    }
}

impl<'a, T, M> Clone for NodeRef<'a, T, M> {
    fn clone(&self) -> Self {
        NodeRef::new(self.tree, self.handle)
    }
}

impl<'a, T, M> Copy for NodeRef<'a, T, M> {}

impl<'a, T, M> fmt::Debug for NodeRef<'a, T, M>
where
    T: fmt::Debug,
    M: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("data", self.data())
            .field("meta", self.meta())
            .finish()
    }
}
