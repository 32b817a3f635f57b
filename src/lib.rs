//! Self-balancing binary search trees with parent links, stored in a typed arena.
//!
//! The avl tree and the red black tree share one query layer for searching, traversals, and
//! structural checks, and differ only in how they rebalance after insertions and removals.
//! Both implement `OrderedTree`, which the sorting and benchmark drivers are generic over.

pub mod arena;
pub mod avl_tree;
pub mod benchmark;
mod error;
mod node;
mod ordered_tree;
mod raw_tree;
pub mod red_black_tree;
pub mod sort;

pub use self::error::{Error, InvariantViolation, Result};
pub use self::node::NodeRef;
pub use self::ordered_tree::OrderedTree;
pub use self::raw_tree::Iter;
