use crate::arena::Handle;
use crate::node::{Link, NodeRef};
use crate::raw_tree::{RawTree, Side};
use log::trace;

/// An enum representing the color of a node in a red black tree.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Color {
    Red,
    Black,
}

impl<'a, T> NodeRef<'a, T, Color> {
    /// Returns the color of the node.
    pub fn color(&self) -> Color {
        *self.meta()
    }
}

/// Absent children count as black.
pub fn is_red<T>(tree: &RawTree<T, Color>, link: Link) -> bool {
    match link {
        None => false,
        Some(handle) => tree.node(handle).meta == Color::Red,
    }
}

fn set_color<T>(tree: &mut RawTree<T, Color>, handle: Handle, color: Color) {
    tree.node_mut(handle).meta = color;
}

/// Restores the red black invariants after `node` was linked as a red leaf.
pub fn insert_fixup<T>(tree: &mut RawTree<T, Color>, mut node: Handle) {
    while let Some(parent) = tree.node(node).parent {
        if !is_red(tree, Some(parent)) {
            break;
        }
        let grandparent = tree
            .node(parent)
            .parent
            .expect("Expected a red node to have a parent.");
        let parent_side = tree.side_of(parent);
        let uncle = tree.child(grandparent, parent_side.opposite());

        if let (true, Some(uncle)) = (is_red(tree, uncle), uncle) {
            trace!("red black insert: red uncle");
            set_color(tree, parent, Color::Black);
            set_color(tree, uncle, Color::Black);
            set_color(tree, grandparent, Color::Red);
            node = grandparent;
            continue;
        }

        let mut parent = parent;
        if tree.side_of(node) != parent_side {
            trace!("red black insert: inner grandchild");
            tree.rotate(parent, parent_side);
            node = parent;
            parent = tree
                .node(node)
                .parent
                .expect("Expected rotated node to have a parent.");
        }
        trace!("red black insert: outer grandchild");
        set_color(tree, parent, Color::Black);
        set_color(tree, grandparent, Color::Red);
        tree.rotate(grandparent, parent_side.opposite());
        break;
    }

    if let Some(root) = tree.root {
        set_color(tree, root, Color::Black);
    }
}

/// Restores the red black invariants after a black node was spliced out. `node` is the
/// position that lost a black node (absent if the slot is now empty) and `parent` its parent,
/// tracked separately because an absent position has no node to ask.
pub fn remove_fixup<T>(tree: &mut RawTree<T, Color>, mut node: Link, mut parent: Link) {
    while node != tree.root && !is_red(tree, node) {
        let curr_parent = parent.expect("Expected a non-root position to have a parent.");
        let side = if tree.node(curr_parent).left == node {
            Side::Left
        } else {
            Side::Right
        };
        let mut sibling = tree
            .child(curr_parent, side.opposite())
            .expect("Expected a doubly black position to have a sibling.");

        if is_red(tree, Some(sibling)) {
            trace!("red black remove: red sibling");
            set_color(tree, sibling, Color::Black);
            set_color(tree, curr_parent, Color::Red);
            tree.rotate(curr_parent, side);
            sibling = tree
                .child(curr_parent, side.opposite())
                .expect("Expected a doubly black position to have a sibling.");
        }

        let near = tree.child(sibling, side);
        let far = tree.child(sibling, side.opposite());
        if !is_red(tree, near) && !is_red(tree, far) {
            trace!("red black remove: black sibling with black children");
            set_color(tree, sibling, Color::Red);
            node = Some(curr_parent);
            parent = tree.node(curr_parent).parent;
            continue;
        }

        if !is_red(tree, far) {
            trace!("red black remove: black sibling with red near child");
            let near = near.expect("Expected the red near child to be `Some`.");
            set_color(tree, near, Color::Black);
            set_color(tree, sibling, Color::Red);
            tree.rotate(sibling, side.opposite());
            sibling = tree
                .child(curr_parent, side.opposite())
                .expect("Expected a doubly black position to have a sibling.");
        }

        trace!("red black remove: black sibling with red far child");
        let parent_color = tree.node(curr_parent).meta;
        set_color(tree, sibling, parent_color);
        set_color(tree, curr_parent, Color::Black);
        if let Some(far) = tree.child(sibling, side.opposite()) {
            set_color(tree, far, Color::Black);
        }
        tree.rotate(curr_parent, side);
        node = tree.root;
        parent = None;
    }

    if let Some(node) = node {
        set_color(tree, node, Color::Black);
    }
}

#[cfg(test)]
mod tests {
    use super::{insert_fixup, is_red, Color};
    use crate::raw_tree::{RawTree, Side};

    #[test]
    fn test_is_red() {
        let mut tree = RawTree::new();
        let handle = tree.allocate(1, Color::Red).unwrap();
        tree.attach(handle, None, Side::Left);
        assert!(is_red(&tree, Some(handle)));
        assert!(!is_red(&tree, None));
    }

    #[test]
    fn test_insert_fixup_inner_grandchild() {
        //     3(B)          2(B)
        //    /             /   \
        //   1(R)    ->   1(R)  3(R)
        //    \
        //     2(R)
        let mut tree = RawTree::new();
        let grandparent = tree.allocate(3, Color::Black).unwrap();
        tree.attach(grandparent, None, Side::Left);
        let parent = tree.allocate(1, Color::Red).unwrap();
        tree.attach(parent, Some(grandparent), Side::Left);
        let node = tree.allocate(2, Color::Red).unwrap();
        tree.attach(node, Some(parent), Side::Right);

        insert_fixup(&mut tree, node);
        assert_eq!(tree.root, Some(node));
        assert_eq!(tree.node(node).meta, Color::Black);
        assert_eq!(tree.node(parent).meta, Color::Red);
        assert_eq!(tree.node(grandparent).meta, Color::Red);
        assert_eq!(tree.iter().cloned().collect::<Vec<u32>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_insert_fixup_red_uncle() {
        //     2(B)          2(B)
        //    /   \         /   \
        //   1(R)  3(R) -> 1(B)  3(B)
        //          \             \
        //           4(R)          4(R)
        let mut tree = RawTree::new();
        let root = tree.allocate(2, Color::Black).unwrap();
        tree.attach(root, None, Side::Left);
        let left = tree.allocate(1, Color::Red).unwrap();
        tree.attach(left, Some(root), Side::Left);
        let right = tree.allocate(3, Color::Red).unwrap();
        tree.attach(right, Some(root), Side::Right);
        let node = tree.allocate(4, Color::Red).unwrap();
        tree.attach(node, Some(right), Side::Right);

        insert_fixup(&mut tree, node);
        assert_eq!(tree.root, Some(root));
        assert_eq!(tree.node(root).meta, Color::Black);
        assert_eq!(tree.node(left).meta, Color::Black);
        assert_eq!(tree.node(right).meta, Color::Black);
        assert_eq!(tree.node(node).meta, Color::Red);
    }
}
