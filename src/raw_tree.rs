use crate::arena::{Handle, TypedArena};
use crate::error::{InvariantViolation, Result};
use crate::node::{Link, Node, NodeRef};
use compare::Compare;
use std::cmp::{self, Ordering};
use std::result;

const CHUNK_SIZE: usize = 256;

/// Which child slot of a parent a node occupies.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Order {
    Pre,
    In,
    Post,
}

/// Node storage, root link, and every operation that does not depend on the balancing scheme.
///
/// All structural mutations go through `attach`, `link_child`, `transplant`, and the rotations,
/// which update the parent link of every node whose parent changes.
pub struct RawTree<T, M> {
    arena: TypedArena<Node<T, M>>,
    pub root: Link,
}

impl<T, M> RawTree<T, M> {
    pub fn new() -> Self {
        RawTree {
            arena: TypedArena::new(CHUNK_SIZE),
            root: None,
        }
    }

    pub fn with_node_limit(limit: usize) -> Self {
        RawTree {
            arena: TypedArena::with_limit(cmp::min(CHUNK_SIZE, cmp::max(limit, 1)), limit),
            root: None,
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn node(&self, handle: Handle) -> &Node<T, M> {
        &self.arena[handle]
    }

    pub fn node_mut(&mut self, handle: Handle) -> &mut Node<T, M> {
        &mut self.arena[handle]
    }

    pub fn root_ref(&self) -> Option<NodeRef<'_, T, M>> {
        self.root.map(|handle| NodeRef::new(self, handle))
    }

    /// Allocates a detached node. Nothing is linked, so a failure leaves the tree untouched.
    pub fn allocate(&mut self, data: T, meta: M) -> Result<Handle> {
        self.arena.allocate(Node::new(data, meta))
    }

    /// Links a detached node below `parent`, or as the root if `parent` is `None`.
    pub fn attach(&mut self, child: Handle, parent: Link, side: Side) {
        match parent {
            None => {
                debug_assert!(self.root.is_none());
                self.arena[child].parent = None;
                self.root = Some(child);
            },
            Some(parent) => {
                debug_assert!(self.child(parent, side).is_none());
                self.link_child(parent, side, Some(child));
            },
        }
    }

    pub fn child(&self, handle: Handle, side: Side) -> Link {
        match side {
            Side::Left => self.arena[handle].left,
            Side::Right => self.arena[handle].right,
        }
    }

    /// Overwrites a child slot of `parent` and points the new child back at `parent`.
    pub fn link_child(&mut self, parent: Handle, side: Side, child: Link) {
        match side {
            Side::Left => self.arena[parent].left = child,
            Side::Right => self.arena[parent].right = child,
        }
        if let Some(child) = child {
            self.arena[child].parent = Some(parent);
        }
    }

    /// Releases a node that is no longer linked and returns its payload.
    pub fn free(&mut self, handle: Handle) -> T {
        self.arena.free(handle).data
    }

    pub fn side_of(&self, handle: Handle) -> Side {
        match self.arena[handle].parent {
            Some(parent) if self.arena[parent].left == Some(handle) => Side::Left,
            Some(_) => Side::Right,
            None => unreachable!("Expected a node with a parent."),
        }
    }

    /// Puts `replacement` into the slot `target` occupies under its parent.
    pub fn transplant(&mut self, target: Handle, replacement: Link) {
        let parent = self.arena[target].parent;
        match parent {
            None => self.root = replacement,
            Some(parent) => {
                if self.arena[parent].left == Some(target) {
                    self.arena[parent].left = replacement;
                } else {
                    self.arena[parent].right = replacement;
                }
            },
        }
        if let Some(replacement) = replacement {
            self.arena[replacement].parent = parent;
        }
    }

    //     x               y
    //    / \             / \
    //   a   y    ->     x   c
    //      / \         / \
    //     b   c       a   b
    pub fn rotate_left(&mut self, x: Handle) -> Handle {
        let y = self.arena[x]
            .right
            .expect("Expected right child node to be `Some`.");
        let b = self.arena[y].left;
        self.arena[x].right = b;
        if let Some(b) = b {
            self.arena[b].parent = Some(x);
        }
        self.transplant(x, Some(y));
        self.arena[y].left = Some(x);
        self.arena[x].parent = Some(y);
        y
    }

    //       x           y
    //      / \         / \
    //     y   c  ->   a   x
    //    / \             / \
    //   a   b           b   c
    pub fn rotate_right(&mut self, x: Handle) -> Handle {
        let y = self.arena[x]
            .left
            .expect("Expected left child node to be `Some`.");
        let b = self.arena[y].right;
        self.arena[x].left = b;
        if let Some(b) = b {
            self.arena[b].parent = Some(x);
        }
        self.transplant(x, Some(y));
        self.arena[y].right = Some(x);
        self.arena[x].parent = Some(y);
        y
    }

    /// Rotates `handle` down towards `side`; its child on the opposite side takes its place.
    pub fn rotate(&mut self, handle: Handle, side: Side) -> Handle {
        match side {
            Side::Left => self.rotate_left(handle),
            Side::Right => self.rotate_right(handle),
        }
    }

    pub fn minimum(&self, mut handle: Handle) -> Handle {
        while let Some(left) = self.arena[handle].left {
            handle = left;
        }
        handle
    }

    pub fn maximum(&self, mut handle: Handle) -> Handle {
        while let Some(right) = self.arena[handle].right {
            handle = right;
        }
        handle
    }

    fn successor(&self, handle: Handle) -> Link {
        if let Some(right) = self.arena[handle].right {
            return Some(self.minimum(right));
        }
        let mut child = handle;
        let mut parent = self.arena[handle].parent;
        while let Some(curr) = parent {
            if self.arena[curr].left == Some(child) {
                return Some(curr);
            }
            child = curr;
            parent = self.arena[curr].parent;
        }
        None
    }

    /// Returns the first node comparing equal to `key` on the path from the root.
    pub fn find<Q, C>(&self, key: &Q, cmp: &C) -> Link
    where
        Q: ?Sized,
        C: Compare<Q, T>,
    {
        let mut curr = self.root;
        while let Some(handle) = curr {
            let node = &self.arena[handle];
            match cmp.compare(key, &node.data) {
                Ordering::Less => curr = node.left,
                Ordering::Greater => curr = node.right,
                Ordering::Equal => return Some(handle),
            }
        }
        None
    }

    /// Returns the parent and the side an insertion of `data` should attach to. Equal payloads
    /// descend to the right.
    pub fn find_insert_pos<C>(&self, data: &T, cmp: &C) -> (Link, Side)
    where
        C: Compare<T>,
    {
        let mut parent = None;
        let mut side = Side::Left;
        let mut curr = self.root;
        while let Some(handle) = curr {
            parent = Some(handle);
            let node = &self.arena[handle];
            if cmp.compares_lt(data, &node.data) {
                side = Side::Left;
                curr = node.left;
            } else {
                side = Side::Right;
                curr = node.right;
            }
        }
        (parent, side)
    }

    pub fn min(&self) -> Option<&T> {
        self.root.map(|root| &self.arena[self.minimum(root)].data)
    }

    pub fn max(&self) -> Option<&T> {
        self.root.map(|root| &self.arena[self.maximum(root)].data)
    }

    fn walk<F>(&self, link: Link, order: Order, visit: &mut F)
    where
        F: FnMut(&T),
    {
        if let Some(handle) = link {
            let node = &self.arena[handle];
            if order == Order::Pre {
                visit(&node.data);
            }
            self.walk(node.left, order, visit);
            if order == Order::In {
                visit(&node.data);
            }
            self.walk(node.right, order, visit);
            if order == Order::Post {
                visit(&node.data);
            }
        }
    }

    pub fn pre_order<F>(&self, mut visit: F)
    where
        F: FnMut(&T),
    {
        self.walk(self.root, Order::Pre, &mut visit);
    }

    pub fn in_order<F>(&self, mut visit: F)
    where
        F: FnMut(&T),
    {
        self.walk(self.root, Order::In, &mut visit);
    }

    pub fn post_order<F>(&self, mut visit: F)
    where
        F: FnMut(&T),
    {
        self.walk(self.root, Order::Post, &mut visit);
    }

    pub fn subtree_height(&self, link: Link) -> usize {
        match link {
            None => 0,
            Some(handle) => {
                let node = &self.arena[handle];
                1 + cmp::max(
                    self.subtree_height(node.left),
                    self.subtree_height(node.right),
                )
            },
        }
    }

    pub fn height(&self) -> usize {
        self.subtree_height(self.root)
    }

    fn subtree_size(&self, link: Link) -> usize {
        match link {
            None => 0,
            Some(handle) => {
                let node = &self.arena[handle];
                1 + self.subtree_size(node.left) + self.subtree_size(node.right)
            },
        }
    }

    pub fn size(&self) -> usize {
        self.subtree_size(self.root)
    }

    pub fn iter(&self) -> Iter<'_, T, M> {
        Iter {
            tree: self,
            next: self.root.map(|root| self.minimum(root)),
            remaining: self.len(),
        }
    }

    fn release<F>(&mut self, link: Link, cleanup: &mut F)
    where
        F: FnMut(T),
    {
        if let Some(handle) = link {
            let (left, right) = {
                let node = &self.arena[handle];
                (node.left, node.right)
            };
            self.release(left, cleanup);
            self.release(right, cleanup);
            cleanup(self.free(handle));
        }
    }

    /// Frees every node in post-order, handing each payload to `cleanup` exactly once.
    pub fn clear_with<F>(&mut self, mut cleanup: F)
    where
        F: FnMut(T),
    {
        let root = self.root.take();
        self.release(root, &mut cleanup);
        debug_assert!(self.arena.is_empty());
        self.arena.clear();
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.arena.clear();
    }

    fn check_links(&self, link: Link, parent: Link) -> result::Result<usize, InvariantViolation> {
        match link {
            None => Ok(0),
            Some(handle) => {
                let node = &self.arena[handle];
                if node.parent != parent {
                    return Err(InvariantViolation::BrokenParentLink);
                }
                let left = self.check_links(node.left, link)?;
                let right = self.check_links(node.right, link)?;
                Ok(1 + left + right)
            },
        }
    }

    /// Checks the parent links, the in-order sequence, and the node count.
    pub fn check_structure<C>(&self, cmp: &C) -> result::Result<(), InvariantViolation>
    where
        C: Compare<T>,
    {
        let reachable = self.check_links(self.root, None)?;
        if reachable != self.len() {
            return Err(InvariantViolation::SizeMismatch {
                reachable,
                allocated: self.len(),
            });
        }

        let mut prev: Option<&T> = None;
        for curr in self.iter() {
            if let Some(prev) = prev {
                if cmp.compares_gt(prev, curr) {
                    return Err(InvariantViolation::OutOfOrder);
                }
            }
            prev = Some(curr);
        }
        Ok(())
    }
}

/// An iterator over the payloads of a tree in order, following parent links instead of
/// keeping a stack.
pub struct Iter<'a, T, M> {
    tree: &'a RawTree<T, M>,
    next: Link,
    remaining: usize,
}

impl<'a, T, M> Iterator for Iter<'a, T, M> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.next?;
        self.next = self.tree.successor(handle);
        self.remaining -= 1;
        Some(&self.tree.arena[handle].data)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T, M> ExactSizeIterator for Iter<'a, T, M> {}
